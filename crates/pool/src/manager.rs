// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pool scheduler.
//!
//! One manager task per pool. Each iteration it sweeps TTL-expired jobs and
//! results, reclaims jobs held by dead workers, assigns pending jobs to
//! idle workers (spawning new ones up to the configured maximum), and
//! compacts finished jobs out of the queue. Between iterations it sleeps
//! briefly, or less when woken by a submission.

use crate::stats::PoolStats;
use crate::store::JobStore;
use crate::worker::{Worker, WorkerLaunch};
use parking_lot::Mutex;
use qp_adapters::Connector;
use qp_core::{Clock, ConnectionDetails, PoolSettings, WorkerId};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Pause between scheduler iterations when nothing wakes it sooner.
const MANAGER_TICK: Duration = Duration::from_millis(5);

/// State the scheduler shares with the pool front end.
///
/// Settings and connection details sit behind mutexes so the host can
/// change them while the scheduler is running; new workers pick up the
/// values current at spawn time.
pub struct ManagerContext<X: Connector, C: Clock> {
    pub store: Arc<JobStore>,
    pub roster: Arc<Mutex<Vec<Worker>>>,
    pub stats: Arc<PoolStats>,
    pub settings: Arc<Mutex<PoolSettings>>,
    pub details: Arc<Mutex<ConnectionDetails>>,
    pub next_worker_id: Arc<AtomicU64>,
    pub connector: X,
    pub clock: C,
}

impl<X: Connector, C: Clock> Clone for ManagerContext<X, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            roster: Arc::clone(&self.roster),
            stats: Arc::clone(&self.stats),
            settings: Arc::clone(&self.settings),
            details: Arc::clone(&self.details),
            next_worker_id: Arc::clone(&self.next_worker_id),
            connector: self.connector.clone(),
            clock: self.clock.clone(),
        }
    }
}

struct ManagerShared {
    shutting_down: AtomicBool,
    wake: Notify,
}

/// Handle to a spawned scheduler task.
pub struct Manager {
    shared: Arc<ManagerShared>,
    handle: JoinHandle<()>,
}

impl Manager {
    /// Spawn the scheduler task and return its handle.
    pub fn spawn<X: Connector, C: Clock>(ctx: ManagerContext<X, C>) -> Self {
        let shared = Arc::new(ManagerShared {
            shutting_down: AtomicBool::new(false),
            wake: Notify::new(),
        });
        let handle = tokio::spawn(run(Arc::clone(&shared), ctx));
        Self { shared, handle }
    }

    /// Nudge the scheduler to iterate now instead of at the next tick.
    pub fn wake(&self) {
        self.shared.wake.notify_one();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.shutting_down.load(Ordering::Acquire)
    }

    /// True when the scheduler task ended without being asked to.
    pub fn is_dead(&self) -> bool {
        self.handle.is_finished() && !self.is_shut_down()
    }

    /// Ask the scheduler task to exit after its current iteration.
    pub fn shutdown(&self) {
        self.shared.shutting_down.store(true, Ordering::Release);
        self.shared.wake.notify_one();
    }

    /// Wait for the scheduler task to finish.
    pub async fn join(self) {
        let _ = self.handle.await;
    }

    /// Kill the scheduler task without the shutdown handshake, so tests
    /// can exercise the dead-scheduler recovery path.
    #[cfg(test)]
    pub(crate) fn abort(&self) {
        self.handle.abort();
    }
}

async fn run<X: Connector, C: Clock>(shared: Arc<ManagerShared>, ctx: ManagerContext<X, C>) {
    tracing::debug!("scheduler started");
    loop {
        if shared.shutting_down.load(Ordering::Acquire) {
            break;
        }
        iterate(&ctx);
        tokio::select! {
            _ = tokio::time::sleep(MANAGER_TICK) => {}
            _ = shared.wake.notified() => {}
        }
    }
    tracing::debug!("scheduler stopped");
}

fn iterate<X: Connector, C: Clock>(ctx: &ManagerContext<X, C>) {
    let now_ms = ctx.clock.epoch_ms();
    ctx.store.sweep_expired_jobs(now_ms);
    ctx.store.sweep_expired_results(now_ms);
    reclaim_dead_workers(ctx);
    assign_pending(ctx);
    ctx.store.compact_finished();
}

/// Drop dead or shut-down workers from the roster, freeing any job they
/// held.
fn reclaim_dead_workers<X: Connector, C: Clock>(ctx: &ManagerContext<X, C>) {
    let mut roster = ctx.roster.lock();
    roster.retain(|worker| {
        if !worker.is_dead() && !worker.is_shut_down() {
            return true;
        }
        tracing::warn!(worker_id = %worker.id(), "reclaiming stopped worker");
        if let Some(job) = worker.current_job() {
            if !job.is_finished() {
                tracing::info!(job_id = %job.id, "freeing job held by dead worker");
                job.clear_assignment();
            }
        }
        if worker.is_busy() {
            ctx.stats.worker_idle();
        }
        false
    });
}

/// Hand pending jobs to idle workers, spawning up to the configured
/// maximum. Stops at the first job it cannot place so queue order holds.
fn assign_pending<X: Connector, C: Clock>(ctx: &ManagerContext<X, C>) {
    let pending = ctx.store.unassigned();
    if pending.is_empty() {
        return;
    }
    let max_size = ctx.settings.lock().max_size;
    let mut roster = ctx.roster.lock();
    for job in pending {
        let idle = roster
            .iter()
            .find(|w| !w.is_busy() && !w.is_dead() && !w.is_shut_down());
        if let Some(worker) = idle {
            tracing::debug!(job_id = %job.id, worker_id = %worker.id(), "job assigned");
            worker.give_job(job);
        } else if roster.len() < max_size {
            let worker = spawn_worker(ctx);
            tracing::debug!(job_id = %job.id, worker_id = %worker.id(), "job assigned to new worker");
            worker.give_job(job);
            roster.push(worker);
        } else {
            break;
        }
    }
}

/// Spawn a worker using the settings current right now.
pub(crate) fn spawn_worker<X: Connector, C: Clock>(ctx: &ManagerContext<X, C>) -> Worker {
    let id = WorkerId::new(ctx.next_worker_id.fetch_add(1, Ordering::SeqCst));
    let wait_mode = ctx.settings.lock().wait_mode;
    let details = ctx.details.lock().clone();
    let reconnect_wait = Duration::from_millis(details.reconnect_wait_ms);
    tracing::debug!(worker_id = %id, "spawning worker");
    Worker::spawn(
        id,
        WorkerLaunch {
            wait_mode,
            reconnect_wait,
            details,
            connector: ctx.connector.clone(),
            store: Arc::clone(&ctx.store),
            stats: Arc::clone(&ctx.stats),
            clock: ctx.clock.clone(),
        },
    )
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
