// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool telemetry counters.

use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Thread-safe counters for pool activity.
///
/// Adjusted by the store, the workers, and the scheduler; read by callers
/// through [`PoolStats::snapshot`].
#[derive(Debug, Default)]
pub struct PoolStats {
    jobs_submitted: AtomicU64,
    results_recorded: AtomicU64,
    busy_workers: AtomicI64,
    max_busy_workers: AtomicI64,
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// One more job entered the queue.
    pub fn count_job(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// One more result landed in the result map.
    pub fn count_result(&self) {
        self.results_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// One more worker went busy. Tracks the overall high-water mark.
    pub fn worker_busy(&self) {
        let busy = self.busy_workers.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_busy_workers.fetch_max(busy, Ordering::SeqCst);
    }

    /// One fewer busy worker.
    pub fn worker_idle(&self) {
        self.busy_workers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn busy_workers(&self) -> i64 {
        self.busy_workers.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            results_recorded: self.results_recorded.load(Ordering::Relaxed),
            busy_workers: self.busy_workers.load(Ordering::SeqCst),
            max_busy_workers: self.max_busy_workers.load(Ordering::SeqCst),
        }
    }

    /// Zero all counters. Used when the pool is stopped.
    pub fn reset(&self) {
        self.jobs_submitted.store(0, Ordering::SeqCst);
        self.results_recorded.store(0, Ordering::SeqCst);
        self.busy_workers.store(0, Ordering::SeqCst);
        self.max_busy_workers.store(0, Ordering::SeqCst);
    }
}

/// Point-in-time view of the pool counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub jobs_submitted: u64,
    pub results_recorded: u64,
    pub busy_workers: i64,
    pub max_busy_workers: i64,
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
