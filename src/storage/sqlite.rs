//! SQLite storage implementation

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::crawler::PageData;
use crate::job::{JobSpec, JobStatus};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{JobRecord, PageRecord};
use crate::BurrowError;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a database at `path`
    pub fn new(path: &Path) -> Result<Self, BurrowError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, BurrowError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        id: row.get(0)?,
        status: JobStatus::parse(&row.get::<_, String>(1)?).unwrap_or(JobStatus::Failed),
        start_url: row.get(2)?,
        host: row.get(3)?,
        max_links: row.get::<_, i64>(4)? as usize,
        created_at: row.get(5)?,
        started_at: row.get(6)?,
        completed_at: row.get(7)?,
    })
}

fn row_to_page(row: &rusqlite::Row<'_>) -> rusqlite::Result<PageRecord> {
    Ok(PageRecord {
        id: row.get(0)?,
        job_id: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        content: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        status_code: row.get(5)?,
        fetched_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const JOB_COLUMNS: &str =
    "id, status, start_url, host, max_links, created_at, started_at, completed_at";
const PAGE_COLUMNS: &str = "id, job_id, url, title, content, status_code, fetched_at, created_at";

impl Storage for SqliteStorage {
    // ===== Job Management =====

    fn create_job(&mut self, spec: &JobSpec, host: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO jobs (status, start_url, host, max_links, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                JobStatus::Queued.as_str(),
                spec.start_url,
                host,
                spec.max_links as i64,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_job(&self, job_id: i64) -> StorageResult<JobRecord> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM jobs WHERE id = ?1", JOB_COLUMNS))?;

        stmt.query_row(params![job_id], row_to_job)
            .optional()?
            .ok_or(StorageError::JobNotFound(job_id))
    }

    fn get_all_jobs(&self) -> StorageResult<Vec<JobRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM jobs ORDER BY id DESC", JOB_COLUMNS))?;

        let jobs = stmt
            .query_map([], row_to_job)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    fn update_job_status(&mut self, job_id: i64, status: JobStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = if status == JobStatus::InProgress {
            self.conn.execute(
                "UPDATE jobs SET status = ?1, started_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, job_id],
            )?
        } else if status.is_terminal() {
            self.conn.execute(
                "UPDATE jobs SET status = ?1, completed_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, job_id],
            )?
        } else {
            self.conn.execute(
                "UPDATE jobs SET status = ?1 WHERE id = ?2",
                params![status.as_str(), job_id],
            )?
        };

        if changed == 0 {
            return Err(StorageError::JobNotFound(job_id));
        }
        Ok(())
    }

    fn delete_job(&mut self, job_id: i64) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM pages WHERE job_id = ?1", params![job_id])?;
        tx.execute("DELETE FROM jobs WHERE id = ?1", params![job_id])?;
        tx.commit()?;
        Ok(())
    }

    // ===== Page Management =====

    fn create_page(&mut self, job_id: i64, page: &PageData) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO pages (job_id, url, title, content, status_code, fetched_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                job_id,
                page.url,
                page.title,
                page.content,
                page.status_code,
                page.fetched_at.to_rfc3339(),
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_pages(&self, job_id: i64) -> StorageResult<Vec<PageRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pages WHERE job_id = ?1 ORDER BY id",
            PAGE_COLUMNS
        ))?;

        let pages = stmt
            .query_map(params![job_id], row_to_page)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pages)
    }

    fn count_pages(&self, job_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE job_id = ?1",
            params![job_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn test_spec() -> JobSpec {
        JobSpec {
            start_url: "https://example.com/".to_string(),
            max_links: 16,
            request_delay: Duration::ZERO,
            custom_headers: HashMap::new(),
            pool_size: 2,
        }
    }

    fn test_page(url: &str) -> PageData {
        PageData {
            url: url.to_string(),
            title: Some("Title".to_string()),
            content: "Body text".to_string(),
            hrefs: vec![],
            status_code: 200,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_and_get_job() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let job_id = storage.create_job(&test_spec(), "example.com").unwrap();

        let job = storage.get_job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.start_url, "https://example.com/");
        assert_eq!(job.host, "example.com");
        assert_eq!(job.max_links, 16);
        assert!(job.started_at.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_get_missing_job() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            storage.get_job(42),
            Err(StorageError::JobNotFound(42))
        ));
    }

    #[test]
    fn test_status_transitions_stamp_timestamps() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let job_id = storage.create_job(&test_spec(), "example.com").unwrap();

        storage
            .update_job_status(job_id, JobStatus::InProgress)
            .unwrap();
        let job = storage.get_job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::InProgress);
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_none());

        storage
            .update_job_status(job_id, JobStatus::Completed)
            .unwrap();
        let job = storage.get_job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_update_missing_job() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            storage.update_job_status(7, JobStatus::Completed),
            Err(StorageError::JobNotFound(7))
        ));
    }

    #[test]
    fn test_pages_round_trip_in_order() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let job_id = storage.create_job(&test_spec(), "example.com").unwrap();

        storage
            .create_page(job_id, &test_page("https://example.com/"))
            .unwrap();
        storage
            .create_page(job_id, &test_page("https://example.com/b"))
            .unwrap();
        storage
            .create_page(job_id, &test_page("https://example.com/a"))
            .unwrap();

        let pages = storage.get_pages(job_id).unwrap();
        let urls: Vec<_> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/b",
                "https://example.com/a"
            ]
        );
        assert_eq!(storage.count_pages(job_id).unwrap(), 3);
    }

    #[test]
    fn test_duplicate_page_url_rejected() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let job_id = storage.create_job(&test_spec(), "example.com").unwrap();

        storage
            .create_page(job_id, &test_page("https://example.com/"))
            .unwrap();
        assert!(storage
            .create_page(job_id, &test_page("https://example.com/"))
            .is_err());
    }

    #[test]
    fn test_same_url_allowed_across_jobs() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.create_job(&test_spec(), "example.com").unwrap();
        let second = storage.create_job(&test_spec(), "example.com").unwrap();

        storage
            .create_page(first, &test_page("https://example.com/"))
            .unwrap();
        assert!(storage
            .create_page(second, &test_page("https://example.com/"))
            .is_ok());
    }

    #[test]
    fn test_delete_job_removes_pages() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let job_id = storage.create_job(&test_spec(), "example.com").unwrap();
        storage
            .create_page(job_id, &test_page("https://example.com/"))
            .unwrap();

        storage.delete_job(job_id).unwrap();

        assert!(storage.get_job(job_id).is_err());
        assert_eq!(storage.count_pages(job_id).unwrap(), 0);
    }

    #[test]
    fn test_get_all_jobs_newest_first() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.create_job(&test_spec(), "example.com").unwrap();
        let second = storage.create_job(&test_spec(), "example.com").unwrap();

        let jobs = storage.get_all_jobs().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, second);
        assert_eq!(jobs[1].id, first);
    }
}
