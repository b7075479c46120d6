// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration loading.
//!
//! The file surface accepts plain integers and keyword strings and is
//! checked at the boundary: negative durations and sizes, out-of-range
//! ports, and unknown keywords are all rejected before they reach the
//! typed settings.

use qp_core::{
    ConnectionDetails, PoolSettings, Priority, QuerySettings, SslMode, ValidationError, WaitMode,
};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Validated pool configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolConfig {
    pub connection: ConnectionDetails,
    pub pool: PoolSettings,
    pub query: QuerySettings,
}

impl PoolConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Ok(raw.validated()?)
    }

    /// Load a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    connection: RawConnection,
    pool: RawPool,
    query: RawQuery,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConnection {
    host: String,
    port: i64,
    database: String,
    username: String,
    password: String,
    reconnect_wait_ms: i64,
    connect_timeout_secs: i64,
    ssl_mode: String,
}

impl Default for RawConnection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: String::new(),
            username: String::new(),
            password: String::new(),
            reconnect_wait_ms: 200,
            connect_timeout_secs: 0,
            ssl_mode: "prefer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawPool {
    min_size: i64,
    max_size: i64,
    wait_mode: String,
    manager_priority: String,
    worker_priority: String,
}

impl Default for RawPool {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: 8,
            wait_mode: "sleep".to_string(),
            manager_priority: "normal".to_string(),
            worker_priority: "normal".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawQuery {
    advertise_result: bool,
    query_ttl_ms: i64,
    result_ttl_ms: i64,
    use_transaction: bool,
}

impl Default for RawQuery {
    fn default() -> Self {
        Self {
            advertise_result: true,
            query_ttl_ms: 0,
            result_ttl_ms: 0,
            use_transaction: true,
        }
    }
}

impl RawConfig {
    fn validated(self) -> Result<PoolConfig, ValidationError> {
        let connection = ConnectionDetails {
            port: parse_port(self.connection.port)?,
            ssl_mode: parse_ssl_mode(&self.connection.ssl_mode)?,
            reconnect_wait_ms: non_negative(
                self.connection.reconnect_wait_ms,
                "connection.reconnect_wait_ms",
            )?,
            connect_timeout_secs: non_negative(
                self.connection.connect_timeout_secs,
                "connection.connect_timeout_secs",
            )?,
            host: self.connection.host,
            database: self.connection.database,
            username: self.connection.username,
            password: self.connection.password,
        };
        let pool = PoolSettings {
            min_size: non_negative_size(self.pool.min_size, "pool.min_size")?,
            max_size: non_negative_size(self.pool.max_size, "pool.max_size")?,
            wait_mode: parse_wait_mode(&self.pool.wait_mode)?,
            manager_priority: parse_priority(&self.pool.manager_priority, "pool.manager_priority")?,
            worker_priority: parse_priority(&self.pool.worker_priority, "pool.worker_priority")?,
        }
        .validated()?;
        let query = QuerySettings {
            advertise_result: self.query.advertise_result,
            query_ttl_ms: non_negative(self.query.query_ttl_ms, "query.query_ttl_ms")?,
            result_ttl_ms: non_negative(self.query.result_ttl_ms, "query.result_ttl_ms")?,
            use_transaction: self.query.use_transaction,
        };
        Ok(PoolConfig {
            connection,
            pool,
            query,
        })
    }
}

fn non_negative(value: i64, field: &'static str) -> Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::NegativeValue { field })
}

fn non_negative_size(value: i64, field: &'static str) -> Result<usize, ValidationError> {
    usize::try_from(value).map_err(|_| ValidationError::NegativeValue { field })
}

fn parse_port(value: i64) -> Result<u16, ValidationError> {
    u16::try_from(value).map_err(|_| ValidationError::InvalidValue {
        field: "connection.port",
        reason: format!("{value} is not a valid port number"),
    })
}

fn parse_ssl_mode(value: &str) -> Result<SslMode, ValidationError> {
    match value {
        "disable" => Ok(SslMode::Disable),
        "allow" => Ok(SslMode::Allow),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        "verify-ca" | "verify_ca" => Ok(SslMode::VerifyCa),
        "verify-full" | "verify_full" => Ok(SslMode::VerifyFull),
        other => Err(ValidationError::InvalidValue {
            field: "connection.ssl_mode",
            reason: format!("unknown mode {other:?}"),
        }),
    }
}

fn parse_wait_mode(value: &str) -> Result<WaitMode, ValidationError> {
    match value {
        "yield" => Ok(WaitMode::Yield),
        "sleep" => Ok(WaitMode::Sleep),
        other => Err(ValidationError::InvalidValue {
            field: "pool.wait_mode",
            reason: format!("unknown mode {other:?}"),
        }),
    }
}

fn parse_priority(value: &str, field: &'static str) -> Result<Priority, ValidationError> {
    match value {
        "normal" => Ok(Priority::Normal),
        "below_normal" => Ok(Priority::BelowNormal),
        "idle" => Ok(Priority::Idle),
        other => Err(ValidationError::InvalidValue {
            field,
            reason: format!("unknown priority {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
