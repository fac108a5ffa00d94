//! Bounded-concurrency copy scheduler.
//!
//! Jobs are spawned onto an owned tokio runtime as they are discovered. A
//! semaphore of `limit` permits gates job start, so at most `limit` jobs touch
//! the file system at once. The permit is released when a job settles, win or
//! lose. The first failure closes the gate: jobs still waiting for a permit
//! are abandoned and the failure is returned from `close_and_wait`.

use crate::executor::copy::execute_job;
use crate::types::{CopyJob, CopyResult, CpignoreError};
use crate::ui::ProgressReporter;
use std::sync::{Arc, Mutex};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

/// Runs copy jobs with at most `limit` in flight.
pub struct CopyScheduler {
    runtime: Runtime,
    gate: Arc<Semaphore>,
    limit: usize,
    keep_empty_folders: bool,
    reporter: ProgressReporter,
    handles: Vec<JoinHandle<Option<CopyResult>>>,
    failure: Arc<Mutex<Option<CpignoreError>>>,
}

impl CopyScheduler {
    /// Create a scheduler. `limit` is floored at 1.
    ///
    /// Worker threads are capped at the available parallelism; the permit
    /// count alone bounds concurrency.
    pub fn new(
        limit: usize,
        keep_empty_folders: bool,
        reporter: ProgressReporter,
    ) -> Result<Self, CpignoreError> {
        let limit = limit.clamp(1, Semaphore::MAX_PERMITS);
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(limit);
        let runtime = Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name("cpignore-copy")
            .enable_all()
            .build()
            .map_err(CpignoreError::Io)?;

        Ok(Self {
            runtime,
            gate: Arc::new(Semaphore::new(limit)),
            limit,
            keep_empty_folders,
            reporter,
            handles: Vec::new(),
            failure: Arc::new(Mutex::new(None)),
        })
    }

    /// Maximum number of jobs in flight
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of jobs enqueued so far
    pub fn enqueued(&self) -> usize {
        self.handles.len()
    }

    /// True once any job has failed
    pub fn has_failed(&self) -> bool {
        self.gate.is_closed()
    }

    /// Schedule a job. It starts as soon as a permit is free.
    pub fn enqueue(&mut self, job: CopyJob) {
        self.reporter.queued();
        let handle = self.runtime.spawn(run_job(
            job,
            Arc::clone(&self.gate),
            Arc::clone(&self.failure),
            self.keep_empty_folders,
            self.reporter.clone(),
        ));
        self.handles.push(handle);
    }

    /// Wait for every job to settle.
    ///
    /// # Returns
    /// * `Ok(Vec<CopyResult>)` - Results in enqueue order; directory jobs that
    ///   created nothing are left out
    /// * `Err(CpignoreError)` - The first job failure
    pub fn close_and_wait(self) -> Result<Vec<CopyResult>, CpignoreError> {
        let Self {
            runtime,
            handles,
            failure,
            ..
        } = self;

        let manifest = runtime.block_on(async move {
            let mut manifest = Vec::with_capacity(handles.len());
            for handle in handles {
                if let Some(result) = handle.await.map_err(map_join_error)? {
                    manifest.push(result);
                }
            }
            Ok::<_, CpignoreError>(manifest)
        })?;

        let first_failure = match failure.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(CpignoreError::Validation(
                "copy scheduler state lock poisoned".to_string(),
            )),
        };

        match first_failure {
            Some(err) => Err(err),
            None => Ok(manifest),
        }
    }
}

async fn run_job(
    job: CopyJob,
    gate: Arc<Semaphore>,
    failure: Arc<Mutex<Option<CpignoreError>>>,
    keep_empty_folders: bool,
    reporter: ProgressReporter,
) -> Option<CopyResult> {
    // Closed gate means an earlier job failed.
    let _permit = Arc::clone(&gate).acquire_owned().await.ok()?;

    reporter.copying(&job.display);
    match execute_job(&job, keep_empty_folders).await {
        Ok(true) => {
            debug!("Copied {}", job.display);
            Some(job.into_result())
        }
        Ok(false) => None,
        Err(err) => {
            if let Ok(mut slot) = failure.lock() {
                if slot.is_none() {
                    *slot = Some(err);
                }
            }
            gate.close();
            None
        }
    }
}

fn map_join_error(error: tokio::task::JoinError) -> CpignoreError {
    CpignoreError::Validation(format!("copy task failed: {}", error))
}
