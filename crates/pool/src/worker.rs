// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection executor task.
//!
//! Each worker owns one database connection and executes at most one job at
//! a time. The scheduler hands a job over with [`Worker::give_job`]; the
//! worker records the outcome in the store and goes idle again. A worker
//! that hits an unrecoverable fault marks itself dead and exits, leaving
//! its job assigned for the scheduler to reclaim.

use crate::stats::PoolStats;
use crate::store::JobStore;
use parking_lot::Mutex;
use qp_adapters::{Connection, Connector, QueryError};
use qp_core::{Clock, ConnectionDetails, Job, JobResult, WaitMode, WorkerId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Pause between idle iterations in sleep mode.
const IDLE_WAIT: Duration = Duration::from_millis(1);

/// Everything a worker task needs at spawn time.
pub struct WorkerLaunch<X: Connector, C: Clock> {
    pub wait_mode: WaitMode,
    pub reconnect_wait: Duration,
    pub details: ConnectionDetails,
    pub connector: X,
    pub store: Arc<JobStore>,
    pub stats: Arc<PoolStats>,
    pub clock: C,
}

struct WorkerShared {
    busy: AtomicBool,
    dead: AtomicBool,
    shutting_down: AtomicBool,
    current: Mutex<Option<Arc<Job>>>,
    wake: Notify,
}

/// Handle to a spawned worker task.
pub struct Worker {
    id: WorkerId,
    shared: Arc<WorkerShared>,
    stats: Arc<PoolStats>,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Spawn a worker task and return its handle.
    pub fn spawn<X: Connector, C: Clock>(id: WorkerId, launch: WorkerLaunch<X, C>) -> Self {
        let shared = Arc::new(WorkerShared {
            busy: AtomicBool::new(false),
            dead: AtomicBool::new(false),
            shutting_down: AtomicBool::new(false),
            current: Mutex::new(None),
            wake: Notify::new(),
        });
        let stats = Arc::clone(&launch.stats);
        let handle = tokio::spawn(run(id, Arc::clone(&shared), launch));
        Self {
            id,
            shared,
            stats,
            handle,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::Acquire)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.shutting_down.load(Ordering::Acquire)
    }

    /// True when the worker can no longer execute jobs.
    ///
    /// Covers both the worker declaring itself dead and its task ending
    /// without being asked to shut down.
    pub fn is_dead(&self) -> bool {
        self.shared.dead.load(Ordering::Acquire)
            || (self.handle.is_finished() && !self.is_shut_down())
    }

    /// The job this worker currently holds, if any.
    pub fn current_job(&self) -> Option<Arc<Job>> {
        self.shared.current.lock().clone()
    }

    /// Hand a job to an idle worker.
    ///
    /// The caller must have checked the worker is idle and alive; the
    /// scheduler is the only caller and assigns under its own iteration.
    pub fn give_job(&self, job: Arc<Job>) {
        debug_assert!(!self.is_busy() && !self.is_dead() && !self.is_shut_down());
        job.assign_to(self.id);
        *self.shared.current.lock() = Some(job);
        self.shared.busy.store(true, Ordering::Release);
        self.stats.worker_busy();
        self.shared.wake.notify_one();
    }

    /// Ask the worker task to exit after its current statement.
    pub fn shutdown(&self) {
        self.shared.shutting_down.store(true, Ordering::Release);
        self.shared.wake.notify_one();
    }

    /// Wait for the worker task to finish.
    pub async fn join(self) {
        // A panicked task already shows up through is_dead.
        let _ = self.handle.await;
    }
}

async fn run<X: Connector, C: Clock>(id: WorkerId, shared: Arc<WorkerShared>, launch: WorkerLaunch<X, C>) {
    let WorkerLaunch {
        wait_mode,
        reconnect_wait,
        details,
        connector,
        store,
        stats,
        clock,
    } = launch;
    let mut conn: Option<X::Conn> = None;

    tracing::debug!(worker_id = %id, "worker started");
    loop {
        if shared.shutting_down.load(Ordering::Acquire) {
            break;
        }

        if conn.is_none() {
            tokio::select! {
                established = connector.connect(&details) => match established {
                    Ok(c) => conn = Some(c),
                    Err(err) => {
                        tracing::warn!(worker_id = %id, error = %err, "connect failed");
                        interruptible_sleep(&shared, reconnect_wait).await;
                    }
                },
                _ = shared.wake.notified() => {}
            }
            continue;
        }

        let current = shared.current.lock().clone();
        let Some(job) = current else {
            idle_wait(&shared, wait_mode).await;
            continue;
        };
        let Some(active) = conn.as_mut() else {
            continue;
        };

        let started_at_ms = clock.epoch_ms();
        match active.execute(&job.text, job.settings.use_transaction).await {
            Ok(rows) => {
                let finished_at_ms = clock.epoch_ms();
                let result =
                    JobResult::success(&job, rows, started_at_ms, finished_at_ms, finished_at_ms);
                finish(&shared, &store, &stats, &job, result);
            }
            Err(QueryError::Query(message)) => {
                let finished_at_ms = clock.epoch_ms();
                tracing::debug!(worker_id = %id, job_id = %job.id, error = %message, "query rejected");
                let result = JobResult::execution_error(
                    &job,
                    message,
                    started_at_ms,
                    finished_at_ms,
                    finished_at_ms,
                );
                finish(&shared, &store, &stats, &job, result);
            }
            Err(QueryError::ConnectionLost(message)) => {
                // Keep the job; reconnect and run it again.
                tracing::warn!(worker_id = %id, job_id = %job.id, error = %message, "connection lost, retrying job");
                conn = None;
                interruptible_sleep(&shared, reconnect_wait).await;
            }
            Err(QueryError::Fatal(message)) => {
                // Leave the job assigned; the scheduler reclaims it.
                tracing::error!(worker_id = %id, job_id = %job.id, error = %message, "fatal executor fault, worker exiting");
                shared.dead.store(true, Ordering::Release);
                break;
            }
        }
    }
    tracing::debug!(worker_id = %id, "worker stopped");
}

/// Record the terminal result and release the job.
fn finish(
    shared: &WorkerShared,
    store: &JobStore,
    stats: &PoolStats,
    job: &Arc<Job>,
    result: JobResult,
) {
    if store.try_insert_result(result) {
        job.mark_finished();
    }
    *shared.current.lock() = None;
    shared.busy.store(false, Ordering::Release);
    stats.worker_idle();
}

async fn idle_wait(shared: &WorkerShared, wait_mode: WaitMode) {
    match wait_mode {
        WaitMode::Yield => tokio::task::yield_now().await,
        WaitMode::Sleep => interruptible_sleep(shared, IDLE_WAIT).await,
    }
}

async fn interruptible_sleep(shared: &WorkerShared, wait: Duration) {
    tokio::select! {
        _ = tokio::time::sleep(wait) => {}
        _ = shared.wake.notified() => {}
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
