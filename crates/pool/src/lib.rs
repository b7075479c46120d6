// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qp-pool: the querypool scheduler and worker-pool core.
//!
//! Callers submit queries into a shared store, a scheduler assigns them to
//! a dynamically sized pool of connection executors, and finished results
//! are fetched (and removed) by job id.

pub mod config;
pub mod manager;
pub mod pool;
pub mod stats;
pub mod store;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{ConfigError, PoolConfig};
pub use manager::{Manager, ManagerContext};
pub use pool::Pool;
pub use stats::{PoolStats, StatsSnapshot};
pub use store::JobStore;
pub use worker::{Worker, WorkerLaunch};
