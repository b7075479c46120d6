//! Failure recovery specs
//!
//! Verify connection loss, connect failures, and dead-worker reclamation
//! as seen through the public pool API.

use crate::prelude::*;
use qp_adapters::FakeOutcome;
use qp_core::ErrorKind;

#[tokio::test]
async fn a_dropped_connection_is_invisible_to_the_caller() {
    let h = harness(1, 1);
    h.connector
        .push_outcome(FakeOutcome::DropConnection("server closed".to_string()));

    let id = h.pool.submit("SELECT 1");
    wait_until("result", || h.pool.fetch(id).is_some()).await;

    let result = h.pool.fetch(id).unwrap();
    assert_eq!(result.error_kind, ErrorKind::None);
    // Reconnected and reran the same statement.
    assert_eq!(h.connector.connects(), 2);
    assert_eq!(h.connector.executed(), vec!["SELECT 1", "SELECT 1"]);
    h.pool.stop().await;
}

#[tokio::test]
async fn a_dead_worker_is_replaced_and_its_job_rerun() {
    let h = harness(1, 1);
    h.connector
        .push_outcome(FakeOutcome::Fatal("executor corrupted".to_string()));

    let id = h.pool.submit("SELECT 1");
    wait_until("result", || h.pool.fetch(id).is_some()).await;

    assert_eq!(h.pool.fetch(id).unwrap().error_kind, ErrorKind::None);
    assert_eq!(h.connector.executed(), vec!["SELECT 1", "SELECT 1"]);
    // The replacement carries a fresh worker id, so the pool stays at one.
    assert_eq!(h.pool.worker_count(), 1);
    h.pool.stop().await;
}

#[tokio::test]
async fn connect_failures_delay_but_do_not_lose_jobs() {
    let h = harness(1, 1);
    h.connector.fail_connects(3);

    let id = h.pool.submit("SELECT 1");
    wait_until("result", || h.pool.fetch(id).is_some()).await;

    assert_eq!(h.pool.fetch(id).unwrap().error_kind, ErrorKind::None);
    assert_eq!(h.connector.connects(), 1);
    h.pool.stop().await;
}
