// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qp-adapters: boundary adapters for the querypool core.
//!
//! The executor adapters wrap the external database; the notify adapters
//! deliver ready-result notifications to the host.

pub mod executor;
pub mod notify;

pub use executor::{ConnectError, Connection, Connector, PgConnection, PgConnector, QueryError};
pub use notify::{NoOpNotify, NotifyError, ResultNotify};

#[cfg(any(test, feature = "test-support"))]
pub use executor::{FakeConnection, FakeConnector, FakeOutcome};
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotify;
