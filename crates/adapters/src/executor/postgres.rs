// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tokio-postgres` executor backend.

use super::{ConnectError, Connection, Connector, QueryError};
use async_trait::async_trait;
use qp_core::{ConnectionDetails, Rows};
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

/// Connector backed by `tokio-postgres`.
///
/// TLS negotiation is left to the driver connector (`NoTls` here); an
/// `ssl_mode` that demands encryption still travels in the conninfo and is
/// enforced by the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl PgConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Conn = PgConnection;

    async fn connect(&self, details: &ConnectionDetails) -> Result<PgConnection, ConnectError> {
        let (client, connection) = tokio_postgres::connect(&details.conninfo(), NoTls)
            .await
            .map_err(|e| ConnectError::Failed(e.to_string()))?;

        // The connection object drives the socket; it must be polled on its
        // own task for the client to make progress.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "postgres connection task ended");
            }
        });

        Ok(PgConnection { client })
    }
}

/// A live postgres connection.
pub struct PgConnection {
    client: Client,
}

#[async_trait]
impl Connection for PgConnection {
    async fn execute(&mut self, query: &str, use_transaction: bool) -> Result<Rows, QueryError> {
        if self.client.is_closed() {
            return Err(QueryError::ConnectionLost("connection closed".to_string()));
        }

        if use_transaction {
            self.client
                .batch_execute("BEGIN")
                .await
                .map_err(map_error)?;
            match self.run(query).await {
                Ok(rows) => {
                    self.client
                        .batch_execute("COMMIT")
                        .await
                        .map_err(map_error)?;
                    Ok(rows)
                }
                Err(e) => {
                    // Best effort: the connection may already be gone.
                    let _ = self.client.batch_execute("ROLLBACK").await;
                    Err(e)
                }
            }
        } else {
            self.run(query).await
        }
    }
}

impl PgConnection {
    async fn run(&mut self, query: &str) -> Result<Rows, QueryError> {
        let messages = self.client.simple_query(query).await.map_err(map_error)?;
        Ok(collect_rows(messages))
    }
}

fn collect_rows(messages: Vec<SimpleQueryMessage>) -> Rows {
    let mut rows = Rows::default();
    for message in messages {
        if let SimpleQueryMessage::Row(row) = message {
            if rows.columns.is_empty() {
                rows.columns = row
                    .columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect();
            }
            let values = (0..row.len())
                .map(|i| row.get(i).map(|v| v.to_string()))
                .collect();
            rows.values.push(values);
        }
    }
    rows
}

fn map_error(e: tokio_postgres::Error) -> QueryError {
    if e.is_closed() {
        QueryError::ConnectionLost(e.to_string())
    } else if e.as_db_error().is_some() {
        QueryError::Query(e.to_string())
    } else {
        // Driver faults without a server error usually mean the socket
        // dropped mid-request.
        QueryError::ConnectionLost(e.to_string())
    }
}
