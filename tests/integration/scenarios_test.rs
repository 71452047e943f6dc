//! End-to-end query scenarios against the scripted engine.

use athena_query::config::AthenaConfig;
use athena_query::engine::{
    EngineCall, ExecutionState, RawRow, RawStatistics, ResultPage, ScriptedEngine, StatusSnapshot,
};
use athena_query::error::AthenaError;
use athena_query::query::{Column, QueryExecutor, QueryRequest, QueryStatus};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

fn select_one_engine() -> ScriptedEngine {
    ScriptedEngine::new()
        .with_states([
            ExecutionState::Queued,
            ExecutionState::Running,
            ExecutionState::Succeeded,
        ])
        .with_page(ResultPage {
            columns: vec![Column::new("test", "integer")],
            rows: vec![RawRow::from_values(["test"]), RawRow::from_values(["1"])],
            next_token: None,
        })
}

#[tokio::test(start_paused = true)]
async fn test_select_one_succeeds() {
    let engine = select_one_engine();
    let config = AthenaConfig::default();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT 1 as test"))
        .await;

    assert_eq!(
        serde_json::to_value(&results).unwrap(),
        json!({
            "query_execution_id": "mock-execution-1",
            "status": "SUCCEEDED",
            "columns": [{"name": "test", "type": "integer"}],
            "rows": [{"test": "1"}]
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_syntax_error_reports_engine_reason() {
    let engine = ScriptedEngine::new().with_statuses([
        StatusSnapshot::new(ExecutionState::Running),
        StatusSnapshot::new(ExecutionState::Failed).with_reason("SYNTAX_ERROR: line 1"),
    ]);
    let config = AthenaConfig::default();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELEC 1"))
        .await;

    assert_eq!(results.status, QueryStatus::Failed);
    assert_eq!(results.error_message.as_deref(), Some("SYNTAX_ERROR: line 1"));
    assert!(results.rows.is_none());
    assert!(results.columns.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_after_two_seconds() {
    let engine = ScriptedEngine::new().with_states([ExecutionState::Running]);
    let config = AthenaConfig::default();
    let start = Instant::now();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT * FROM huge").with_max_wait_seconds(2))
        .await;

    assert_eq!(results.status, QueryStatus::Timeout);
    assert_eq!(results.query_execution_id, "mock-execution-1");
    assert!(results
        .error_message
        .as_deref()
        .unwrap()
        .contains("2 seconds"));
    assert!(results.rows.is_none());
    assert!(start.elapsed() <= Duration::from_secs(3));
    assert!(engine.cancelled().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_by_engine() {
    let engine = ScriptedEngine::new().with_states([ExecutionState::Cancelled]);
    let config = AthenaConfig::default();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT 1"))
        .await;

    assert_eq!(results.status, QueryStatus::Cancelled);
    assert_eq!(
        results.error_message.as_deref(),
        Some("Query failed with status: CANCELLED")
    );
    assert_eq!(results.state_change_reason, None);
}

#[tokio::test(start_paused = true)]
async fn test_submission_rejected() {
    let engine = ScriptedEngine::new().failing(
        EngineCall::Submit,
        AthenaError::transport(
            "StartQueryExecution failed: InvalidRequestException: Unable to verify/create output bucket",
        ),
    );
    let config = AthenaConfig::default();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT 1"))
        .await;

    assert_eq!(results.status, QueryStatus::Error);
    assert_eq!(results.query_execution_id, "");
    assert!(results
        .error_message
        .as_deref()
        .unwrap()
        .contains("Unable to verify/create output bucket"));
    assert_eq!(engine.calls(), vec![EngineCall::Submit]);
}

#[tokio::test(start_paused = true)]
async fn test_status_fetch_failure_ends_operation() {
    let engine = ScriptedEngine::new().failing(
        EngineCall::GetStatus,
        AthenaError::transport("GetQueryExecution failed: ThrottlingException: Rate exceeded"),
    );
    let config = AthenaConfig::default();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT 1"))
        .await;

    assert_eq!(results.status, QueryStatus::Error);
    assert_eq!(results.query_execution_id, "mock-execution-1");
    assert_eq!(engine.call_count(EngineCall::GetStatus), 1);
    assert_eq!(engine.call_count(EngineCall::GetResults), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unrecognized_state_is_internal_error() {
    let engine = ScriptedEngine::new().failing(
        EngineCall::GetStatus,
        "PAUSED"
            .parse::<ExecutionState>()
            .unwrap_err(),
    );
    let config = AthenaConfig::default();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT 1"))
        .await;

    assert_eq!(results.status, QueryStatus::Error);
    assert!(results
        .error_message
        .as_deref()
        .unwrap()
        .starts_with("Internal error"));
}

#[tokio::test(start_paused = true)]
async fn test_statistics_are_reported_on_success() {
    let engine = select_one_engine().with_statuses([StatusSnapshot::new(
        ExecutionState::Succeeded,
    )
    .with_statistics(RawStatistics {
        total_execution_time_ms: Some(812),
        data_scanned_bytes: Some(0),
        engine_execution_time_ms: Some(640),
        query_queue_time_ms: Some(97),
        service_processing_time_ms: Some(75),
    })]);
    let config = AthenaConfig::default();

    let results = QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT 1 as test"))
        .await;

    assert_eq!(
        serde_json::to_value(results.statistics).unwrap(),
        json!({
            "processing_time_ms": 812,
            "data_scanned_bytes": 0,
            "engine_execution_time_ms": 640,
            "query_queue_time_ms": 97,
            "service_processing_time_ms": 75
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_request_defaults_flow_into_submission() {
    let engine = select_one_engine();
    let config = AthenaConfig {
        database: Some("sales".to_string()),
        output_location: Some("s3://results-bucket/athena/".to_string()),
        ..Default::default()
    };

    QueryExecutor::new(&engine, &config)
        .execute(&QueryRequest::new("SELECT 1 as test").with_workgroup("analysts"))
        .await;

    let submitted = engine.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].workgroup, "analysts");
    assert_eq!(submitted[0].catalog.as_deref(), Some("AwsDataCatalog"));
    assert_eq!(submitted[0].database.as_deref(), Some("sales"));
    assert_eq!(
        submitted[0].output_location.as_deref(),
        Some("s3://results-bucket/athena/")
    );
}
