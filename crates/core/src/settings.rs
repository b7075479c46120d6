// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query, pool, and connection settings.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Per-query execution settings.
///
/// A copy travels with the job and, once finished, with its result, so TTL
/// and advertisement behavior stay attached to the work they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Advertise the finished result through the notification adapter?
    pub advertise_result: bool,
    /// Time (ms) a job may wait in the queue before being expired.
    /// 0 disables the TTL.
    pub query_ttl_ms: u64,
    /// Time (ms) a result may sit unread before being evicted.
    /// 0 disables the TTL.
    pub result_ttl_ms: u64,
    /// Wrap execution in a transaction block?
    pub use_transaction: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            advertise_result: true,
            query_ttl_ms: 0,
            result_ttl_ms: 0,
            use_transaction: true,
        }
    }
}

/// How idle pool loops defer to other tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitMode {
    /// Yield to the scheduler between iterations.
    Yield,
    /// Sleep briefly between iterations.
    Sleep,
}

/// Advisory scheduling priority for pool tasks.
///
/// Retained from the configuration surface; tokio tasks carry no priority,
/// so the pool records the value but does not act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
    BelowNormal,
    Idle,
}

/// Worker pool sizing and scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Workers spawned when the pool starts.
    pub min_size: usize,
    /// Hard cap on concurrently live workers.
    pub max_size: usize,
    pub wait_mode: WaitMode,
    pub manager_priority: Priority,
    pub worker_priority: Priority,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: 8,
            wait_mode: WaitMode::Sleep,
            manager_priority: Priority::Normal,
            worker_priority: Priority::Normal,
        }
    }
}

impl PoolSettings {
    /// Check sizes and return a copy with min/max swapped if reversed.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if self.min_size < 1 {
            return Err(ValidationError::ZeroPoolSize {
                field: "pool.min_size",
            });
        }
        if self.max_size < 1 {
            return Err(ValidationError::ZeroPoolSize {
                field: "pool.max_size",
            });
        }
        if self.min_size > self.max_size {
            tracing::warn!(
                min_size = self.min_size,
                max_size = self.max_size,
                "minimum pool size exceeds maximum, swapping values"
            );
            std::mem::swap(&mut self.min_size, &mut self.max_size);
        }
        Ok(self)
    }
}

/// TLS negotiation mode, matching libpq `sslmode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SslMode {
    Disable,
    Allow,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    /// The libpq keyword for this mode.
    pub fn as_conninfo(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

/// Database connection details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Wait (ms) between reconnection attempts after a connection failure.
    pub reconnect_wait_ms: u64,
    /// Connect timeout in seconds. 0 defers to the driver default.
    pub connect_timeout_secs: u64,
    pub ssl_mode: SslMode,
}

impl Default for ConnectionDetails {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: String::new(),
            username: String::new(),
            password: String::new(),
            reconnect_wait_ms: 200,
            connect_timeout_secs: 0,
            ssl_mode: SslMode::Prefer,
        }
    }
}

impl ConnectionDetails {
    /// Build a libpq-style keyword/value connection string.
    ///
    /// Empty parameters are omitted and a connect timeout of 0 defers to
    /// the driver default.
    pub fn conninfo(&self) -> String {
        let mut parts = vec![
            format!("host={}", quote(&self.host)),
            format!("port={}", self.port),
        ];
        if !self.database.is_empty() {
            parts.push(format!("dbname={}", quote(&self.database)));
        }
        if !self.username.is_empty() {
            parts.push(format!("user={}", quote(&self.username)));
        }
        if !self.password.is_empty() {
            parts.push(format!("password={}", quote(&self.password)));
        }
        if self.connect_timeout_secs > 0 {
            parts.push(format!("connect_timeout={}", self.connect_timeout_secs));
        }
        parts.push(format!("sslmode={}", self.ssl_mode.as_conninfo()));
        parts.join(" ")
    }
}

/// Quote a conninfo value if it contains whitespace, quotes, or backslashes.
fn quote(value: &str) -> String {
    let needs_quoting = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if needs_quoting {
        let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{}'", escaped)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
