// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Background AML pre-screening worker pool.
//!
//! ## Job lifecycle
//!
//! ```text
//! Queued -> LockAcquired -> Running -> Succeeded
//!                                   -> FailedRetriable (re-enqueued after retry_delay)
//!                                   -> FailedTerminal
//! ```
//!
//! A job that cannot take its per-address lock within `lock_wait` is dropped
//! and only logged. Retries are new queue entries, so a waiting retry never
//! occupies a worker or holds the lock.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    config::ScreeningTaskConfig,
    providers::{AddressScreeningClient, PrescreeningRecord},
    screening::lock::LockManager,
};

const LOCK_KEY_PREFIX: &str = "tasks:aml_prescreening_task-";
const QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningJob {
    pub id: Uuid,
    pub address: String,
    pub asset: String,
    pub user_id: String,
    pub retry: bool,
    /// 1-based provider attempt this queue entry will make.
    pub attempt: u32,
}

impl ScreeningJob {
    pub fn new(address: String, asset: String, user_id: String, retry: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
            asset,
            user_id,
            retry,
            attempt: 1,
        }
    }

    pub fn lock_key(&self) -> String {
        format!("{LOCK_KEY_PREFIX}{}", self.address)
    }

    fn next_attempt(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreeningTaskState {
    Queued,
    LockAcquired,
    Running,
    Succeeded,
    FailedRetriable,
    FailedTerminal,
}

#[derive(Debug, Clone)]
pub enum ScreeningOutcome {
    /// Verdicts are handed to observers unchanged.
    Succeeded { records: Vec<PrescreeningRecord> },
    RetryScheduled { error: String, next_attempt: u32 },
    Failed { error: String },
}

impl ScreeningOutcome {
    pub fn state(&self) -> ScreeningTaskState {
        match self {
            ScreeningOutcome::Succeeded { .. } => ScreeningTaskState::Succeeded,
            ScreeningOutcome::RetryScheduled { .. } => ScreeningTaskState::FailedRetriable,
            ScreeningOutcome::Failed { .. } => ScreeningTaskState::FailedTerminal,
        }
    }
}

/// Result of one executed attempt, emitted to the observer channel.
#[derive(Debug, Clone)]
pub struct ScreeningReport {
    pub job: ScreeningJob,
    pub outcome: ScreeningOutcome,
}

#[derive(Debug, thiserror::Error)]
#[error("screening queue is closed")]
pub struct QueueClosed;

/// Cloneable producer side of the runner.
#[derive(Debug, Clone)]
pub struct ScreeningQueue {
    tx: mpsc::Sender<ScreeningJob>,
}

impl ScreeningQueue {
    pub async fn enqueue(&self, job: ScreeningJob) -> Result<(), QueueClosed> {
        debug!(
            job_id = %job.id,
            address = %job.address,
            attempt = job.attempt,
            state = ?ScreeningTaskState::Queued,
            "Screening job queued"
        );
        self.tx.send(job).await.map_err(|_| QueueClosed)
    }
}

pub struct ScreeningRunner {
    rx: mpsc::Receiver<ScreeningJob>,
    worker: Arc<Worker>,
    workers: usize,
}

struct Worker {
    queue: ScreeningQueue,
    client: Arc<dyn AddressScreeningClient>,
    locks: Arc<LockManager>,
    config: ScreeningTaskConfig,
    reports: Option<mpsc::UnboundedSender<ScreeningReport>>,
}

impl ScreeningRunner {
    pub fn new(
        client: Arc<dyn AddressScreeningClient>,
        locks: Arc<LockManager>,
        config: ScreeningTaskConfig,
        reports: Option<mpsc::UnboundedSender<ScreeningReport>>,
    ) -> (Self, ScreeningQueue) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let queue = ScreeningQueue { tx };
        let workers = config.workers.max(1);
        let runner = Self {
            rx,
            worker: Arc::new(Worker {
                queue: queue.clone(),
                client,
                locks,
                config,
                reports,
            }),
            workers,
        };
        (runner, queue)
    }

    /// Dispatch queued jobs until `shutdown` is cancelled.
    ///
    /// Jobs already running are left to finish on their own tasks.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        info!(workers = self.workers, "Screening runner started");

        loop {
            let job = tokio::select! {
                _ = shutdown.cancelled() => break,
                job = self.rx.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            let permit = tokio::select! {
                _ = shutdown.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let worker = Arc::clone(&self.worker);
            tokio::spawn(async move {
                worker.execute(job).await;
                drop(permit);
            });
        }

        info!("Screening runner stopped");
    }
}

impl Worker {
    async fn execute(&self, job: ScreeningJob) {
        let key = job.lock_key();
        let guard = match self
            .locks
            .acquire(&key, self.config.lock_timeout, self.config.lock_wait)
            .await
        {
            Ok(guard) => guard,
            Err(_) => {
                info!(job_id = %job.id, address = %job.address, "{key} is locked, skipping");
                return;
            }
        };
        debug!(job_id = %job.id, state = ?ScreeningTaskState::LockAcquired, "Screening lock acquired");

        debug!(
            job_id = %job.id,
            attempt = job.attempt,
            state = ?ScreeningTaskState::Running,
            "Running address pre-screening"
        );
        let result = self
            .client
            .post_prescreening(&job.address, &job.asset, &job.user_id)
            .await;
        drop(guard);

        let outcome = match result {
            Ok(records) => {
                info!(
                    job_id = %job.id,
                    address = %job.address,
                    attempt = job.attempt,
                    records = records.len(),
                    "Address pre-screening succeeded"
                );
                ScreeningOutcome::Succeeded { records }
            }
            Err(e)
                if e.is_failed_request()
                    && job.retry
                    && job.attempt < self.config.max_attempts =>
            {
                let next = job.next_attempt();
                warn!(
                    job_id = %job.id,
                    address = %job.address,
                    attempt = job.attempt,
                    error = %e,
                    "Address pre-screening failed, retrying"
                );
                self.schedule_retry(next);
                ScreeningOutcome::RetryScheduled {
                    error: e.to_string(),
                    next_attempt: job.attempt + 1,
                }
            }
            Err(e) => {
                error!(
                    job_id = %job.id,
                    address = %job.address,
                    attempt = job.attempt,
                    error = %e,
                    "Address pre-screening failed"
                );
                ScreeningOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        if let Some(reports) = &self.reports {
            let _ = reports.send(ScreeningReport { job, outcome });
        }
    }

    fn schedule_retry(&self, job: ScreeningJob) {
        let queue = self.queue.clone();
        let delay = self.config.retry_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if queue.enqueue(job).await.is_err() {
                warn!("Screening queue closed, retry dropped");
            }
        });
    }
}
