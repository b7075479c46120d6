// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qp-core: data records, identifiers, and settings for the querypool
//! worker-pool core.

pub mod clock;
pub mod error;
pub mod id;
pub mod job;
pub mod result;
pub mod settings;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::ValidationError;
pub use id::{JobId, WorkerId};
pub use job::Job;
pub use result::{ErrorKind, JobResult, Rows};
pub use settings::{
    ConnectionDetails, PoolSettings, Priority, QuerySettings, SslMode, WaitMode,
};
