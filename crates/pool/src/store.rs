// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared job queue and result map.
//!
//! The store is the only state shared between callers, the scheduler, and
//! the workers. All access goes through one mutex held for short critical
//! sections; nothing slow runs under the lock.

use crate::stats::PoolStats;
use parking_lot::Mutex;
use qp_core::{Job, JobId, JobResult, QuerySettings};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

struct StoreState {
    next_job_id: u64,
    queue: VecDeque<Arc<Job>>,
    results: HashMap<JobId, JobResult>,
}

/// Thread-safe home for the pending-job queue and the completed-result map.
pub struct JobStore {
    state: Mutex<StoreState>,
    stats: Arc<PoolStats>,
}

impl JobStore {
    pub fn new(stats: Arc<PoolStats>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_job_id: 1,
                queue: VecDeque::new(),
                results: HashMap::new(),
            }),
            stats,
        }
    }

    /// Append a job to the queue tail and return its id.
    pub fn enqueue(
        &self,
        text: impl Into<String>,
        settings: QuerySettings,
        now_ms: u64,
    ) -> JobId {
        let mut state = self.state.lock();
        let id = JobId::new(state.next_job_id);
        state.next_job_id += 1;
        state
            .queue
            .push_back(Arc::new(Job::new(id, text, settings, now_ms)));
        self.stats.count_job();
        tracing::debug!(job_id = %id, "job enqueued");
        id
    }

    /// Record a result unless one already exists for the job.
    ///
    /// First writer wins: a reclaimed-then-rerun job racing a stale
    /// in-flight worker keeps whichever result landed first.
    pub fn try_insert_result(&self, result: JobResult) -> bool {
        let mut state = self.state.lock();
        Self::insert_if_absent(&mut state, &self.stats, result)
    }

    fn insert_if_absent(state: &mut StoreState, stats: &PoolStats, result: JobResult) -> bool {
        if state.results.contains_key(&result.job_id) {
            return false;
        }
        state.results.insert(result.job_id, result);
        stats.count_result();
        true
    }

    pub fn fetch(&self, id: JobId) -> Option<JobResult> {
        self.state.lock().results.get(&id).cloned()
    }

    /// Remove a result. Idempotent; absent ids are ignored.
    pub fn remove(&self, id: JobId) {
        let mut state = self.state.lock();
        if state.results.remove(&id).is_some() {
            tracing::debug!(job_id = %id, "result removed");
        }
    }

    /// Expire unassigned queued jobs that outlived their TTL, synthesizing
    /// a `TtlExpired` result for each. Returns the number expired.
    ///
    /// Jobs already handed to a worker are left alone; there is no
    /// mid-execution cancellation.
    pub fn sweep_expired_jobs(&self, now_ms: u64) -> usize {
        let mut state = self.state.lock();
        let mut expired = Vec::new();
        state.queue.retain(|job| {
            let expire = job.assigned_worker().is_none()
                && !job.is_finished()
                && job.queue_expired(now_ms);
            if expire {
                expired.push(Arc::clone(job));
            }
            !expire
        });
        for job in &expired {
            tracing::info!(job_id = %job.id, "job TTL expired");
            if Self::insert_if_absent(&mut state, &self.stats, JobResult::ttl_expired(job, now_ms))
            {
                job.mark_finished();
            }
        }
        expired.len()
    }

    /// Evict results that outlived their TTL. Nothing replaces them.
    pub fn sweep_expired_results(&self, now_ms: u64) -> usize {
        let mut state = self.state.lock();
        let before = state.results.len();
        state.results.retain(|id, result| {
            let expire = result.expired(now_ms);
            if expire {
                tracing::info!(job_id = %id, "result TTL expired");
            }
            !expire
        });
        before - state.results.len()
    }

    /// Jobs awaiting assignment, in queue order.
    pub fn unassigned(&self) -> Vec<Arc<Job>> {
        self.state
            .lock()
            .queue
            .iter()
            .filter(|job| job.assigned_worker().is_none() && !job.is_finished())
            .map(Arc::clone)
            .collect()
    }

    /// Drop finished jobs from the queue; their terminal state now lives
    /// only in the result map. Returns the number removed.
    pub fn compact_finished(&self) -> usize {
        let mut state = self.state.lock();
        let before = state.queue.len();
        state.queue.retain(|job| !job.is_finished());
        before - state.queue.len()
    }

    /// Result ids needing advertisement, marked advertised as they are
    /// taken so each result is reported at most once.
    pub fn take_advertisable(&self) -> Vec<JobId> {
        let mut state = self.state.lock();
        let mut ready = Vec::new();
        for (id, result) in state.results.iter_mut() {
            if result.settings.advertise_result && !result.advertised {
                result.advertised = true;
                ready.push(*id);
            }
        }
        ready.sort_unstable();
        ready
    }

    /// Drop all queue and result state and reset the id counter.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.queue.clear();
        state.results.clear();
        state.next_job_id = 1;
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn result_len(&self) -> usize {
        self.state.lock().results.len()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
