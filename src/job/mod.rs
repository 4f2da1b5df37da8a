//! Job lifecycle types and the active-job registry
//!
//! A job is one crawl: a start URL, a visitation budget, and the engine
//! state that lives only for the duration of the run. The [`JobManager`]
//! keeps the live controllers addressable by ID so an external API layer
//! can start, observe, cancel, and delete jobs without reaching into the
//! engine internals.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use crate::crawler::JobController;
use crate::progress::ProgressSink;
use crate::storage::{PageRecord, SharedStorage};
use crate::BurrowError;

/// Input for creating a crawl job
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// URL the crawl starts from; its host becomes the scope boundary
    pub start_url: String,

    /// Maximum number of pages this job may visit (must be >= 1)
    pub max_links: usize,

    /// Delay applied by each worker before issuing a request
    pub request_delay: Duration,

    /// Extra HTTP headers sent with every request
    pub custom_headers: HashMap<String, String>,

    /// Number of concurrent fetch workers (must be >= 1)
    pub pool_size: usize,
}

/// Lifecycle status of a crawl job
///
/// Transitions are `Queued -> InProgress -> {Completed | Canceled | Failed}`.
/// Terminal states never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Canceled,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "canceled" => Some(Self::Canceled),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a job for status reporting
///
/// While a job is in progress `total` is the visitation budget; once the
/// job is terminal both counters collapse to the number of pages actually
/// fetched.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub job_id: i64,
    pub status: JobStatus,
    pub processed: usize,
    pub total: usize,
}

/// Registry of running crawl jobs
///
/// Live jobs answer status queries from memory; finished jobs are answered
/// from storage. Jobs run independently: each owns its frontier and worker
/// pool, and the only shared resource is the store.
pub struct JobManager {
    store: SharedStorage,
    active: Arc<Mutex<HashMap<i64, Arc<JobController>>>>,
}

impl JobManager {
    pub fn new(store: SharedStorage) -> Self {
        Self {
            store,
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Validates the spec, persists a queued job, and spawns its run.
    ///
    /// Returns the job ID synchronously; configuration problems surface
    /// here, before any worker starts. The job is deregistered from the
    /// active map when its run finishes.
    pub fn start_job(
        &self,
        spec: JobSpec,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<i64, BurrowError> {
        let controller = Arc::new(JobController::new(spec, self.store.clone(), sink)?);
        let job_id = controller.job_id();

        self.active
            .lock()
            .unwrap()
            .insert(job_id, controller.clone());

        let active = self.active.clone();
        tokio::spawn(async move {
            let status = controller.run().await;
            tracing::info!("Job {} finished with status {}", job_id, status);
            active.lock().unwrap().remove(&job_id);
        });

        Ok(job_id)
    }

    /// Requests cancellation of a running job.
    ///
    /// Safe to call for unknown or already-terminal jobs; returns whether
    /// a live job was signaled. Does not wait for in-flight fetches.
    pub fn cancel_job(&self, job_id: i64) -> bool {
        match self.active.lock().unwrap().get(&job_id) {
            Some(controller) if !controller.status().status.is_terminal() => {
                controller.cancel();
                true
            }
            _ => false,
        }
    }

    /// Returns the current status of a job, live or persisted.
    pub fn job_status(&self, job_id: i64) -> Result<JobSnapshot, BurrowError> {
        if let Some(controller) = self.active.lock().unwrap().get(&job_id) {
            return Ok(controller.status());
        }

        let store = self.store.lock().unwrap();
        let job = store.get_job(job_id)?;
        let pages = store.count_pages(job_id)? as usize;
        Ok(JobSnapshot {
            job_id,
            status: job.status,
            processed: pages,
            total: pages,
        })
    }

    /// Lists all jobs: active ones with live counters, then stored ones.
    pub fn list_jobs(&self) -> Result<Vec<JobSnapshot>, BurrowError> {
        let mut snapshots = Vec::new();
        let mut active_ids = Vec::new();

        {
            let active = self.active.lock().unwrap();
            for (job_id, controller) in active.iter() {
                snapshots.push(controller.status());
                active_ids.push(*job_id);
            }
        }

        let store = self.store.lock().unwrap();
        for job in store.get_all_jobs()? {
            if active_ids.contains(&job.id) {
                continue;
            }
            let pages = store.count_pages(job.id)? as usize;
            snapshots.push(JobSnapshot {
                job_id: job.id,
                status: job.status,
                processed: pages,
                total: pages,
            });
        }

        Ok(snapshots)
    }

    /// Returns the pages a job has persisted, in fetch-completion order.
    pub fn job_results(&self, job_id: i64) -> Result<Vec<PageRecord>, BurrowError> {
        let store = self.store.lock().unwrap();
        Ok(store.get_pages(job_id)?)
    }

    /// Cancels a job if it is running, then removes it and its pages.
    pub fn delete_job(&self, job_id: i64) -> Result<(), BurrowError> {
        if let Some(controller) = self.active.lock().unwrap().remove(&job_id) {
            controller.cancel();
            tracing::info!("Job {} canceled before deletion", job_id);
        }

        let mut store = self.store.lock().unwrap();
        store.delete_job(job_id)?;
        Ok(())
    }
}
