//! Query execution specs
//!
//! Verify submission, ordering, sizing, and error reporting through the
//! public pool API.

use crate::prelude::*;
use qp_adapters::FakeOutcome;
use qp_core::{ErrorKind, JobId, QuerySettings};
use std::time::Duration;

#[tokio::test]
async fn sequential_jobs_share_a_single_worker() {
    let h = harness(1, 1);
    let ids: Vec<JobId> = ["SELECT a", "SELECT b", "SELECT c"]
        .iter()
        .map(|text| h.pool.submit(*text))
        .collect();

    wait_until("all results", || {
        ids.iter().all(|id| h.pool.fetch(*id).is_some())
    })
    .await;

    assert_eq!(
        h.connector.executed(),
        vec!["SELECT a", "SELECT b", "SELECT c"]
    );
    assert_eq!(h.pool.worker_count(), 1);
    assert_eq!(h.connector.connects(), 1);
    h.pool.stop().await;
}

#[tokio::test]
async fn a_burst_never_exceeds_the_maximum_pool_size() {
    let h = harness(1, 3);
    h.connector.set_latency(Duration::from_millis(20));
    let ids: Vec<JobId> = (0..9).map(|n| h.pool.submit(format!("SELECT {n}"))).collect();

    wait_until("all results", || {
        ids.iter().all(|id| h.pool.fetch(*id).is_some())
    })
    .await;

    assert!(h.pool.worker_count() <= 3);
    assert!(h.pool.stats().max_busy_workers <= 3);
    assert_eq!(h.pool.stats().results_recorded, 9);
    h.pool.stop().await;
}

#[tokio::test]
async fn execution_errors_complete_the_job_without_killing_the_worker() {
    let h = harness(1, 1);
    h.connector
        .push_outcome(FakeOutcome::QueryError("relation does not exist".to_string()));

    let bad = h.pool.submit("SELECT * FROM missing");
    let good = h.pool.submit("SELECT 1");
    wait_until("both results", || {
        h.pool.fetch(bad).is_some() && h.pool.fetch(good).is_some()
    })
    .await;

    let failure = h.pool.fetch(bad).unwrap();
    assert_eq!(failure.error_kind, ErrorKind::Execution);
    assert_eq!(failure.error_message, "relation does not exist");
    assert!(failure.rows.is_empty());

    let success = h.pool.fetch(good).unwrap();
    assert_eq!(success.error_kind, ErrorKind::None);
    // Same worker served both statements.
    assert_eq!(h.connector.connects(), 1);
    h.pool.stop().await;
}

#[tokio::test]
async fn transaction_wrapping_follows_the_query_settings() {
    let h = harness(1, 1);
    let wrapped = h.pool.submit("INSERT INTO t VALUES (1)");
    let bare = h.pool.submit_with(
        "VACUUM",
        QuerySettings {
            use_transaction: false,
            ..QuerySettings::default()
        },
    );
    wait_until("both results", || {
        h.pool.fetch(wrapped).is_some() && h.pool.fetch(bare).is_some()
    })
    .await;

    assert_eq!(h.connector.transactional(), vec![true, false]);
    h.pool.stop().await;
}

#[tokio::test]
async fn results_carry_the_executor_payload() {
    let h = harness(1, 1);
    let id = h.pool.submit("SELECT version()");
    wait_until("result", || h.pool.fetch(id).is_some()).await;

    let result = h.pool.fetch(id).unwrap();
    assert_eq!(result.rows.columns, vec!["echo"]);
    assert_eq!(
        result.rows.values,
        vec![vec![Some("SELECT version()".to_string())]]
    );
    assert!(result.started_at_ms >= result.created_at_ms);
    h.pool.stop().await;
}
