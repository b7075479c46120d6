//! Test helpers for the pool behavioral specs.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use qp_adapters::{FakeConnector, FakeNotify};
use qp_core::{ConnectionDetails, FakeClock, PoolSettings};
use qp_pool::Pool;
use std::time::Duration;

pub type TestPool = Pool<FakeConnector, FakeNotify, FakeClock>;

/// A started pool over fake adapters and a manually advanced clock.
pub struct Harness {
    pub connector: FakeConnector,
    pub notify: FakeNotify,
    pub clock: FakeClock,
    pub pool: TestPool,
}

pub fn harness(min_size: usize, max_size: usize) -> Harness {
    // RUST_LOG=qp_pool=debug shows scheduler activity during a run.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let connector = FakeConnector::new();
    let notify = FakeNotify::new();
    let clock = FakeClock::new(1_000);
    let pool = Pool::with_clock(
        connector.clone(),
        notify.clone(),
        PoolSettings {
            min_size,
            max_size,
            ..PoolSettings::default()
        },
        ConnectionDetails {
            reconnect_wait_ms: 1,
            ..ConnectionDetails::default()
        },
        clock.clone(),
    )
    .unwrap();
    pool.start();
    Harness {
        connector,
        notify,
        clock,
        pool,
    }
}

/// Poll `condition` until it holds, panicking after two seconds.
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
