// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn unscripted_execute_echoes_statement() {
    let connector = FakeConnector::new();
    let mut conn = connector
        .connect(&ConnectionDetails::default())
        .await
        .unwrap();

    let rows = conn.execute("SELECT 1", true).await.unwrap();
    assert_eq!(rows.columns, vec!["echo"]);
    assert_eq!(rows.values, vec![vec![Some("SELECT 1".to_string())]]);
}

#[tokio::test]
async fn scripted_outcomes_are_consumed_in_order() {
    let connector = FakeConnector::new();
    connector.push_outcome(FakeOutcome::QueryError("bad syntax".to_string()));
    connector.push_outcome(FakeOutcome::Rows(Rows {
        columns: vec!["n".to_string()],
        values: vec![vec![Some("1".to_string())]],
    }));

    let mut conn = connector
        .connect(&ConnectionDetails::default())
        .await
        .unwrap();

    match conn.execute("SELECT", false).await {
        Err(QueryError::Query(message)) => assert_eq!(message, "bad syntax"),
        other => panic!("expected query error, got {:?}", other),
    }
    let rows = conn.execute("SELECT 1", false).await.unwrap();
    assert_eq!(rows.columns, vec!["n"]);

    // Script exhausted: back to echoing.
    let rows = conn.execute("SELECT 2", false).await.unwrap();
    assert_eq!(rows.columns, vec!["echo"]);
}

#[tokio::test]
async fn connect_failures_are_counted_down() {
    let connector = FakeConnector::new();
    connector.fail_connects(2);
    let details = ConnectionDetails::default();

    assert!(connector.connect(&details).await.is_err());
    assert!(connector.connect(&details).await.is_err());
    assert!(connector.connect(&details).await.is_ok());
    assert_eq!(connector.connects(), 1);
}

#[tokio::test]
async fn executed_statements_are_recorded() {
    let connector = FakeConnector::new();
    let mut conn = connector
        .connect(&ConnectionDetails::default())
        .await
        .unwrap();

    conn.execute("SELECT a", false).await.unwrap();
    conn.execute("SELECT b", true).await.unwrap();
    assert_eq!(connector.executed(), vec!["SELECT a", "SELECT b"]);
    assert_eq!(connector.transactional(), vec![false, true]);
}

#[tokio::test]
async fn drop_connection_and_fatal_map_to_their_errors() {
    let connector = FakeConnector::new();
    connector.push_outcome(FakeOutcome::DropConnection("socket reset".to_string()));
    connector.push_outcome(FakeOutcome::Fatal("executor bug".to_string()));

    let mut conn = connector
        .connect(&ConnectionDetails::default())
        .await
        .unwrap();

    assert!(matches!(
        conn.execute("SELECT", false).await,
        Err(QueryError::ConnectionLost(_))
    ));
    assert!(matches!(
        conn.execute("SELECT", false).await,
        Err(QueryError::Fatal(_))
    ));
}
