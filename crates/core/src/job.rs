// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and assignment state.

use crate::id::{JobId, WorkerId};
use crate::settings::QuerySettings;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Sentinel worker id meaning "not assigned".
const UNASSIGNED: u64 = 0;

/// A unit of submitted work awaiting execution.
///
/// Jobs are shared between the store, the scheduler, and at most one worker
/// at a time. `assigned_worker` and `finished` are the only fields mutated
/// after creation; both are atomics so the job can be shared without a
/// lock.
#[derive(Debug)]
pub struct Job {
    pub id: JobId,
    /// The query text. Opaque to the pool core.
    pub text: String,
    pub settings: QuerySettings,
    /// When the job was enqueued, in epoch milliseconds.
    pub created_at_ms: u64,
    assigned_worker: AtomicU64,
    finished: AtomicBool,
}

impl Job {
    pub fn new(id: JobId, text: impl Into<String>, settings: QuerySettings, now_ms: u64) -> Self {
        Self {
            id,
            text: text.into(),
            settings,
            created_at_ms: now_ms,
            assigned_worker: AtomicU64::new(UNASSIGNED),
            finished: AtomicBool::new(false),
        }
    }

    /// Worker currently holding this job, if any.
    pub fn assigned_worker(&self) -> Option<WorkerId> {
        match self.assigned_worker.load(Ordering::Acquire) {
            UNASSIGNED => None,
            id => Some(WorkerId::new(id)),
        }
    }

    /// Record which worker holds this job. Called from `give_job` only.
    pub fn assign_to(&self, worker: WorkerId) {
        self.assigned_worker.store(worker.as_u64(), Ordering::Release);
    }

    /// Free the job so the scheduler can hand it to another worker.
    ///
    /// Only the scheduler calls this, and only when the owning worker has
    /// been found dead or shut down.
    pub fn clear_assignment(&self) {
        self.assigned_worker.store(UNASSIGNED, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Mark the job finished. Set once, after its result has been recorded.
    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    /// True when the job has outlived its queue TTL.
    ///
    /// A TTL of 0 disables expiry; the job remains eligible for assignment
    /// indefinitely.
    pub fn queue_expired(&self, now_ms: u64) -> bool {
        self.settings.query_ttl_ms != 0
            && now_ms.saturating_sub(self.created_at_ms) > self.settings.query_ttl_ms
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
