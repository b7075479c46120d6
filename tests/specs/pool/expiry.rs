//! TTL expiry specs
//!
//! Verify queue and result TTL behavior under a manually advanced clock.

use crate::prelude::*;
use qp_core::{ErrorKind, QuerySettings};
use std::time::Duration;

#[tokio::test]
async fn a_waiting_job_expires_before_it_runs() {
    let h = harness(1, 1);
    h.connector.set_latency(Duration::from_millis(100));

    let slow = h.pool.submit("SELECT slow");
    let doomed = h.pool.submit_with(
        "SELECT doomed",
        QuerySettings {
            query_ttl_ms: 10,
            ..QuerySettings::default()
        },
    );
    wait_until("worker occupied", || h.pool.stats().busy_workers == 1).await;
    h.clock.advance_ms(20);

    wait_until("expired result", || h.pool.fetch(doomed).is_some()).await;
    let result = h.pool.fetch(doomed).unwrap();
    assert_eq!(result.error_kind, ErrorKind::TtlExpired);
    assert_eq!(result.error_message, "query TTL expired");
    assert_eq!(result.started_at_ms, 0);

    wait_until("slow result", || h.pool.fetch(slow).is_some()).await;
    // The expired statement never reached the executor.
    assert_eq!(h.connector.executed(), vec!["SELECT slow"]);
    h.pool.stop().await;
}

#[tokio::test]
async fn an_unread_result_is_evicted_after_its_ttl() {
    let h = harness(1, 1);
    let id = h.pool.submit_with(
        "SELECT 1",
        QuerySettings {
            result_ttl_ms: 50,
            ..QuerySettings::default()
        },
    );

    wait_until("result", || h.pool.fetch(id).is_some()).await;
    h.clock.advance_ms(51);
    wait_until("eviction", || h.pool.fetch(id).is_none()).await;
    h.pool.stop().await;
}

#[tokio::test]
async fn zero_ttls_disable_expiry() {
    let h = harness(1, 1);
    let id = h.pool.submit("SELECT 1");
    wait_until("result", || h.pool.fetch(id).is_some()).await;

    // A year on the clock changes nothing.
    h.clock.advance_ms(365 * 24 * 60 * 60 * 1000);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(h.pool.fetch(id).is_some());
    h.pool.stop().await;
}
