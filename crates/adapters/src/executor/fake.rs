// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable fake executor for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ConnectError, Connection, Connector, QueryError};
use async_trait::async_trait;
use parking_lot::Mutex;
use qp_core::{ConnectionDetails, Rows};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Scripted outcome for a single execute call.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    /// Return these rows.
    Rows(Rows),
    /// Fail the statement. Completes the job with an execution error.
    QueryError(String),
    /// Simulate the connection dropping mid-statement.
    DropConnection(String),
    /// Simulate an unrecoverable executor fault.
    Fatal(String),
}

struct FakeState {
    connect_failures: u32,
    connects: u32,
    outcomes: VecDeque<FakeOutcome>,
    executed: Vec<String>,
    transactional: Vec<bool>,
    latency: Duration,
}

/// Deterministic executor for tests.
///
/// Scripted outcomes are consumed in order; once the script runs out every
/// statement succeeds, echoing the statement text as a one-cell row.
#[derive(Clone)]
pub struct FakeConnector {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeConnector {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                connect_failures: 0,
                connects: 0,
                outcomes: VecDeque::new(),
                executed: Vec::new(),
                transactional: Vec::new(),
                latency: Duration::ZERO,
            })),
        }
    }
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the next `n` connection attempts.
    pub fn fail_connects(&self, n: u32) {
        self.inner.lock().connect_failures = n;
    }

    /// Queue an outcome for the next unscripted execute call.
    pub fn push_outcome(&self, outcome: FakeOutcome) {
        self.inner.lock().outcomes.push_back(outcome);
    }

    /// Add fixed latency to every execute call.
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().latency = latency;
    }

    /// Statements executed so far, in order (retries appear again).
    pub fn executed(&self) -> Vec<String> {
        self.inner.lock().executed.clone()
    }

    /// The `use_transaction` flag seen by each execute call, in order.
    pub fn transactional(&self) -> Vec<bool> {
        self.inner.lock().transactional.clone()
    }

    /// Number of connections successfully established.
    pub fn connects(&self) -> u32 {
        self.inner.lock().connects
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Conn = FakeConnection;

    async fn connect(&self, _details: &ConnectionDetails) -> Result<FakeConnection, ConnectError> {
        let mut state = self.inner.lock();
        if state.connect_failures > 0 {
            state.connect_failures -= 1;
            return Err(ConnectError::Failed("scripted connect failure".to_string()));
        }
        state.connects += 1;
        Ok(FakeConnection {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Connection handle produced by [`FakeConnector`].
pub struct FakeConnection {
    inner: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl Connection for FakeConnection {
    async fn execute(&mut self, query: &str, use_transaction: bool) -> Result<Rows, QueryError> {
        let (latency, outcome) = {
            let mut state = self.inner.lock();
            state.executed.push(query.to_string());
            state.transactional.push(use_transaction);
            (state.latency, state.outcomes.pop_front())
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match outcome {
            None => Ok(echo(query)),
            Some(FakeOutcome::Rows(rows)) => Ok(rows),
            Some(FakeOutcome::QueryError(message)) => Err(QueryError::Query(message)),
            Some(FakeOutcome::DropConnection(message)) => {
                Err(QueryError::ConnectionLost(message))
            }
            Some(FakeOutcome::Fatal(message)) => Err(QueryError::Fatal(message)),
        }
    }
}

fn echo(query: &str) -> Rows {
    Rows {
        columns: vec!["echo".to_string()],
        values: vec![vec![Some(query.to_string())]],
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
