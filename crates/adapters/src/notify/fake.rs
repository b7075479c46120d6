// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NotifyError, ResultNotify};
use async_trait::async_trait;
use parking_lot::Mutex;
use qp_core::JobId;
use std::sync::Arc;

struct FakeNotifyState {
    notified: Vec<JobId>,
    fail: bool,
}

/// Fake notification adapter recording every notified job id.
#[derive(Clone)]
pub struct FakeNotify {
    inner: Arc<Mutex<FakeNotifyState>>,
}

impl Default for FakeNotify {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeNotifyState {
                notified: Vec::new(),
                fail: false,
            })),
        }
    }
}

impl FakeNotify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent notification fail.
    pub fn fail_all(&self) {
        self.inner.lock().fail = true;
    }

    /// Job ids notified so far, in order.
    pub fn notified(&self) -> Vec<JobId> {
        self.inner.lock().notified.clone()
    }
}

#[async_trait]
impl ResultNotify for FakeNotify {
    async fn result_ready(&self, job_id: JobId) -> Result<(), NotifyError> {
        let mut state = self.inner.lock();
        state.notified.push(job_id);
        if state.fail {
            return Err(NotifyError::Failed("scripted notify failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
