// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boundary validation errors.

use thiserror::Error;

/// Errors raised when settings are rejected at the pool boundary.
///
/// Validation is synchronous and local to the caller; nothing invalid ever
/// reaches the queue or a worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be negative")]
    NegativeValue { field: &'static str },
    #[error("{field} must be at least 1")]
    ZeroPoolSize { field: &'static str },
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
