//! Job controller - crawl lifecycle orchestration
//!
//! The controller owns one crawl from creation to its terminal status:
//! - validates the spec and persists the queued job
//! - transitions the status machine and persists each transition
//! - seeds the frontier and worker pool and waits for the pool to finish
//! - emits progress events at the lifecycle edges
//!
//! Per-URL failures never reach the controller; only configuration
//! failures at creation time are crawl-ending.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::validate_spec;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::pool::CrawlPool;
use crate::crawler::resolver::host_of;
use crate::job::{JobSnapshot, JobSpec, JobStatus};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::storage::SharedStorage;
use crate::{BurrowError, ConfigError};

/// Owns one crawl job's lifecycle
pub struct JobController {
    job_id: i64,
    spec: JobSpec,
    start_url: Url,
    host: String,
    status: Mutex<JobStatus>,
    frontier: Arc<Frontier>,
    store: SharedStorage,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

impl JobController {
    /// Validates the spec and persists a new queued job.
    ///
    /// Fails fast, before any worker starts: an unparseable start URL, a
    /// non-positive budget or pool size, or invalid headers are surfaced
    /// to the caller synchronously.
    pub fn new(
        spec: JobSpec,
        store: SharedStorage,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Self, BurrowError> {
        let start_url = validate_spec(&spec)?;
        let host = host_of(&start_url).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("start URL has no host: {}", spec.start_url))
        })?;

        let job_id = {
            let mut store = store.lock().unwrap();
            store.create_job(&spec, &host)?
        };

        tracing::info!("Created job {} for URL: {}", job_id, spec.start_url);

        let frontier = Arc::new(Frontier::new(spec.max_links));

        Ok(Self {
            job_id,
            spec,
            start_url,
            host,
            status: Mutex::new(JobStatus::Queued),
            frontier,
            store,
            sink,
            cancel: CancellationToken::new(),
        })
    }

    pub fn job_id(&self) -> i64 {
        self.job_id
    }

    /// Runs the job to a terminal status.
    ///
    /// Blocks until the worker pool signals done or cancellation has
    /// drained it, then persists the terminal status and emits the final
    /// progress event.
    pub async fn run(&self) -> JobStatus {
        tracing::info!("Starting crawl job {} for URL: {}", self.job_id, self.start_url);
        self.transition(JobStatus::InProgress);
        self.emit("Job started");

        let fetcher = match Fetcher::new(&self.spec) {
            Ok(fetcher) => Arc::new(fetcher),
            Err(e) => {
                tracing::error!("Failed to build HTTP client for job {}: {}", self.job_id, e);
                self.transition(JobStatus::Failed);
                self.emit("Job failed");
                return JobStatus::Failed;
            }
        };

        let pool = CrawlPool {
            job_id: self.job_id,
            host: self.host.clone(),
            pool_size: self.spec.pool_size,
            frontier: self.frontier.clone(),
            fetcher,
            store: self.store.clone(),
            sink: self.sink.clone(),
            cancel: self.cancel.clone(),
            emit_gate: Arc::new(Mutex::new(())),
        };

        pool.run(self.start_url.clone()).await;

        let terminal = if self.cancel.is_cancelled() {
            JobStatus::Canceled
        } else {
            JobStatus::Completed
        };
        self.transition(terminal);
        self.emit(match terminal {
            JobStatus::Canceled => "Job canceled",
            _ => "Job completed",
        });

        terminal
    }

    /// Requests cancellation.
    ///
    /// Idempotent and non-blocking; a no-op once the job is terminal.
    /// Callers observe the eventual `canceled` status asynchronously.
    pub fn cancel(&self) {
        if self.status.lock().unwrap().is_terminal() {
            return;
        }
        tracing::info!("Cancellation requested for job {}", self.job_id);
        self.cancel.cancel();
    }

    /// Non-blocking status read, safe from any task at any time.
    pub fn status(&self) -> JobSnapshot {
        let status = *self.status.lock().unwrap();
        let (processed, budget) = self.frontier.snapshot();
        let total = if status.is_terminal() { processed } else { budget };
        JobSnapshot {
            job_id: self.job_id,
            status,
            processed,
            total,
        }
    }

    /// Moves the status machine forward and persists the new status.
    ///
    /// Terminal states are sticky. Persistence failures are logged and do
    /// not affect the in-memory state.
    fn transition(&self, next: JobStatus) {
        {
            let mut status = self.status.lock().unwrap();
            if status.is_terminal() {
                return;
            }
            *status = next;
        }

        let mut store = self.store.lock().unwrap();
        if let Err(e) = store.update_job_status(self.job_id, next) {
            tracing::error!("Failed to persist status for job {}: {}", self.job_id, e);
        }
    }

    fn emit(&self, message: &str) {
        let snapshot = self.status();
        self.sink.emit(ProgressEvent {
            job_id: self.job_id,
            message: message.to_string(),
            processed: snapshot.processed,
            total: snapshot.total,
        });
    }
}
