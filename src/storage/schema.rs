//! Database schema definitions
//!
//! All SQL schema definitions for the Burrow database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawl jobs
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    status TEXT NOT NULL,
    start_url TEXT NOT NULL,
    host TEXT NOT NULL,
    max_links INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    started_at TEXT,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);

-- Pages fetched by jobs; insertion order is fetch-completion order
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id INTEGER NOT NULL REFERENCES jobs(id),
    url TEXT NOT NULL,
    title TEXT,
    content TEXT,
    status_code INTEGER NOT NULL,
    fetched_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(job_id, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_job ON pages(job_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
