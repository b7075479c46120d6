// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification adapter

use super::{NotifyError, ResultNotify};
use async_trait::async_trait;
use qp_core::JobId;

/// Notification adapter that discards every notification.
///
/// Used by hosts that poll for results instead of subscribing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotify;

impl NoOpNotify {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResultNotify for NoOpNotify {
    async fn result_ready(&self, _job_id: JobId) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
