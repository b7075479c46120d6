//! Pool lifecycle specs
//!
//! Verify start/stop behavior, state reset, and result advertisement.

use crate::prelude::*;
use qp_core::QuerySettings;

#[tokio::test]
async fn stop_discards_results_and_restarts_id_numbering() {
    let h = harness(1, 2);
    let first = h.pool.submit("SELECT 1");
    wait_until("result", || h.pool.fetch(first).is_some()).await;

    h.pool.stop().await;
    assert!(h.pool.fetch(first).is_none());
    assert_eq!(h.pool.worker_count(), 0);
    assert_eq!(h.pool.stats().jobs_submitted, 0);

    h.pool.start();
    let second = h.pool.submit("SELECT 2");
    assert_eq!(second, 1);
    wait_until("result after restart", || h.pool.fetch(second).is_some()).await;
    h.pool.stop().await;
}

#[tokio::test]
async fn a_result_stays_available_until_removed() {
    let h = harness(1, 1);
    let id = h.pool.submit("SELECT 1");
    wait_until("result", || h.pool.fetch(id).is_some()).await;

    // Fetching is non-destructive.
    assert!(h.pool.fetch(id).is_some());
    assert!(h.pool.fetch(id).is_some());

    h.pool.remove(id);
    assert!(h.pool.fetch(id).is_none());
    h.pool.stop().await;
}

#[tokio::test]
async fn tick_notifies_ready_results_exactly_once() {
    let h = harness(1, 1);
    let loud = h.pool.submit("SELECT 1");
    let quiet = h.pool.submit_with(
        "SELECT 2",
        QuerySettings {
            advertise_result: false,
            ..QuerySettings::default()
        },
    );
    wait_until("both results", || {
        h.pool.fetch(loud).is_some() && h.pool.fetch(quiet).is_some()
    })
    .await;

    h.pool.tick().await;
    h.pool.tick().await;
    assert_eq!(h.notify.notified(), vec![loud]);
    h.pool.stop().await;
}

#[tokio::test]
async fn results_serialize_for_host_consumption() {
    let h = harness(1, 1);
    let id = h.pool.submit("SELECT 1");
    wait_until("result", || h.pool.fetch(id).is_some()).await;

    let json = serde_json::to_string(&h.pool.fetch(id).unwrap()).unwrap();
    assert!(json.contains("\"error_kind\":\"none\""));
    assert!(json.contains("\"echo\""));
    h.pool.stop().await;
}

#[tokio::test]
async fn jobs_submitted_while_stopped_run_after_start() {
    let h = harness(1, 1);
    h.pool.stop().await;

    let id = h.pool.submit("SELECT 1");
    assert!(h.pool.fetch(id).is_none());

    h.pool.start();
    wait_until("result", || h.pool.fetch(id).is_some()).await;
    h.pool.stop().await;
}
