//! Storage module for persisting jobs and pages
//!
//! This module handles all database operations for the crawl engine:
//! - SQLite database initialization and schema management
//! - Job records and their status transitions
//! - Page persistence in fetch-completion order

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::job::JobStatus;
use crate::BurrowError;

/// Storage handle shared between the engine and the job registry
pub type SharedStorage = Arc<Mutex<dyn Storage + Send>>;

/// Opens a SQLite-backed shared storage handle
pub fn open_storage(path: &Path) -> Result<SharedStorage, BurrowError> {
    let storage = SqliteStorage::new(path)?;
    Ok(Arc::new(Mutex::new(storage)))
}

/// Represents a job in the database
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: i64,
    pub status: JobStatus,
    pub start_url: String,
    pub host: String,
    pub max_links: usize,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Represents a fetched page in the database
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: i64,
    pub job_id: i64,
    pub url: String,
    pub title: Option<String>,
    pub content: String,
    pub status_code: u16,
    pub fetched_at: String,
    pub created_at: String,
}
