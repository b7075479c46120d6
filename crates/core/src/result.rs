// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job result record and execution payload.

use crate::id::JobId;
use crate::job::Job;
use crate::settings::QuerySettings;
use serde::{Deserialize, Serialize};

/// Tabular payload produced by an executed query.
///
/// Opaque to the pool core: columns and values are carried as text exactly
/// as the executor produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rows {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<String>>>,
}

impl Rows {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Classification of a terminal job outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The job executed successfully.
    None,
    /// The executor rejected the query.
    Execution,
    /// The job outlived its queue TTL before being executed.
    TtlExpired,
}

/// The terminal outcome of a job.
///
/// Created by the worker that executed the job, or by the scheduler when a
/// queued job's TTL expires. Lives in the result map until the caller
/// removes it or its result TTL evicts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: JobId,
    pub rows: Rows,
    pub error_kind: ErrorKind,
    /// Empty unless `error_kind` is not `None`.
    pub error_message: String,
    /// When the originating job was enqueued.
    pub created_at_ms: u64,
    /// When a worker began executing the job. 0 for TTL expiries.
    pub started_at_ms: u64,
    /// When execution finished. 0 for TTL expiries.
    pub finished_at_ms: u64,
    /// When this result record was created.
    pub result_created_at_ms: u64,
    /// Set once a ready notification has been emitted for this result.
    pub advertised: bool,
    /// Copy of the originating job's settings.
    pub settings: QuerySettings,
}

impl JobResult {
    /// Result for a successfully executed job.
    pub fn success(
        job: &Job,
        rows: Rows,
        started_at_ms: u64,
        finished_at_ms: u64,
        now_ms: u64,
    ) -> Self {
        Self {
            job_id: job.id,
            rows,
            error_kind: ErrorKind::None,
            error_message: String::new(),
            created_at_ms: job.created_at_ms,
            started_at_ms,
            finished_at_ms,
            result_created_at_ms: now_ms,
            advertised: false,
            settings: job.settings.clone(),
        }
    }

    /// Result for a job the executor rejected.
    pub fn execution_error(
        job: &Job,
        message: impl Into<String>,
        started_at_ms: u64,
        finished_at_ms: u64,
        now_ms: u64,
    ) -> Self {
        Self {
            job_id: job.id,
            rows: Rows::default(),
            error_kind: ErrorKind::Execution,
            error_message: message.into(),
            created_at_ms: job.created_at_ms,
            started_at_ms,
            finished_at_ms,
            result_created_at_ms: now_ms,
            advertised: false,
            settings: job.settings.clone(),
        }
    }

    /// Result for a job that expired in the queue before being executed.
    pub fn ttl_expired(job: &Job, now_ms: u64) -> Self {
        Self {
            job_id: job.id,
            rows: Rows::default(),
            error_kind: ErrorKind::TtlExpired,
            error_message: "query TTL expired".to_string(),
            created_at_ms: job.created_at_ms,
            started_at_ms: 0,
            finished_at_ms: 0,
            result_created_at_ms: now_ms,
            advertised: false,
            settings: job.settings.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_kind != ErrorKind::None
    }

    /// True when the result has outlived its TTL. A TTL of 0 disables
    /// expiry.
    pub fn expired(&self, now_ms: u64) -> bool {
        self.settings.result_ttl_ms != 0
            && now_ms.saturating_sub(self.result_created_at_ms) > self.settings.result_ttl_ms
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
