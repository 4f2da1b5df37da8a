//! Storage traits and error types

use thiserror::Error;

use crate::crawler::PageData;
use crate::job::{JobSpec, JobStatus};
use crate::storage::{JobRecord, PageRecord};

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Job not found: {0}")]
    JobNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Defines the persistence operations the engine needs: job records with
/// their status transitions, and the pages a job fetched. Failures here
/// are logged by the engine and never abort a crawl.
pub trait Storage {
    // ===== Job Management =====

    /// Creates a new queued job and returns its ID
    fn create_job(&mut self, spec: &JobSpec, host: &str) -> StorageResult<i64>;

    /// Gets a job by ID
    fn get_job(&self, job_id: i64) -> StorageResult<JobRecord>;

    /// Gets all jobs, newest first
    fn get_all_jobs(&self) -> StorageResult<Vec<JobRecord>>;

    /// Updates the status of a job
    ///
    /// Stamps `started_at` when the job moves to in_progress and
    /// `completed_at` when it reaches a terminal status.
    fn update_job_status(&mut self, job_id: i64, status: JobStatus) -> StorageResult<()>;

    /// Removes a job and its pages in one transaction
    fn delete_job(&mut self, job_id: i64) -> StorageResult<()>;

    // ===== Page Management =====

    /// Persists one fetched page; rows are immutable after creation
    fn create_page(&mut self, job_id: i64, page: &PageData) -> StorageResult<i64>;

    /// Gets a job's pages in insertion (fetch-completion) order
    fn get_pages(&self, job_id: i64) -> StorageResult<Vec<PageRecord>>;

    /// Counts a job's persisted pages
    fn count_pages(&self, job_id: i64) -> StorageResult<u64>;
}
