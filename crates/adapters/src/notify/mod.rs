// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result notification adapters

mod noop;
pub use noop::NoOpNotify;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotify;

use async_trait::async_trait;
use qp_core::JobId;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notify failed: {0}")]
    Failed(String),
}

/// Adapter receiving ready-result notifications.
///
/// Fired at most once per result, and only for results whose settings
/// request advertisement. Always invoked from the coordinator's tick, never
/// from a worker.
#[async_trait]
pub trait ResultNotify: Clone + Send + Sync + 'static {
    async fn result_ready(&self, job_id: JobId) -> Result<(), NotifyError>;
}
