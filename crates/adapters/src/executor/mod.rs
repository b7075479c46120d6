// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database executor adapters.

mod postgres;
pub use postgres::{PgConnection, PgConnector};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeConnection, FakeConnector, FakeOutcome};

use async_trait::async_trait;
use qp_core::{ConnectionDetails, Rows};
use thiserror::Error;

/// Errors from establishing a connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connection failed: {0}")]
    Failed(String),
}

/// Errors from executing a statement.
///
/// The split matters to the worker's retry policy: `ConnectionLost` is
/// recoverable (reconnect and retry the same job), `Query` completes the
/// job with an execution error, `Fatal` kills the worker.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("fatal executor fault: {0}")]
    Fatal(String),
}

/// Factory for database connections.
#[async_trait]
pub trait Connector: Clone + Send + Sync + 'static {
    type Conn: Connection;

    /// Establish a new connection.
    async fn connect(&self, details: &ConnectionDetails) -> Result<Self::Conn, ConnectError>;
}

/// A live database connection executing one statement at a time.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Execute a statement, optionally inside a transaction block.
    async fn execute(&mut self, query: &str, use_transaction: bool) -> Result<Rows, QueryError>;
}
