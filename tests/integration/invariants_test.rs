//! Invariants that hold for every outcome of an orchestration.

use athena_query::config::AthenaConfig;
use athena_query::engine::{
    EngineCall, ExecutionState, RawRow, ResultPage, ScriptedEngine, StatusSnapshot,
};
use athena_query::error::AthenaError;
use athena_query::query::{Column, QueryExecutor, QueryRequest, QueryResults, QueryStatus};

fn numbers_page(count: usize) -> ResultPage {
    let mut rows = vec![RawRow::from_values(["n", "label"])];
    rows.extend((0..count).map(|i| RawRow::from_values([i.to_string(), format!("row {i}")])));
    ResultPage {
        columns: vec![Column::new("n", "integer"), Column::new("label", "varchar")],
        rows,
        next_token: None,
    }
}

fn assert_shape(results: &QueryResults) {
    if results.status == QueryStatus::Succeeded {
        assert!(results.rows.is_some(), "success must carry rows");
        assert!(results.error_message.is_none(), "success must not carry an error");
        let width = results.columns.as_ref().map(Vec::len).unwrap_or_default();
        for row in results.rows.as_ref().unwrap() {
            assert_eq!(row.len(), width);
        }
    } else {
        assert!(results.rows.is_none(), "{} must not carry rows", results.status);
        assert!(
            results.error_message.is_some(),
            "{} must carry an error message",
            results.status
        );
    }
}

async fn run(engine: &ScriptedEngine, request: QueryRequest) -> QueryResults {
    let config = AthenaConfig::default();
    QueryExecutor::new(engine, &config).execute(&request).await
}

#[tokio::test(start_paused = true)]
async fn test_result_shape_for_every_outcome() {
    let engines = vec![
        ScriptedEngine::new().with_page(numbers_page(3)),
        ScriptedEngine::new().with_page(numbers_page(0)),
        ScriptedEngine::new().with_statuses([
            StatusSnapshot::new(ExecutionState::Failed).with_reason("HIVE_BAD_DATA")
        ]),
        ScriptedEngine::new().with_states([ExecutionState::Failed]),
        ScriptedEngine::new().with_states([ExecutionState::Cancelled]),
        ScriptedEngine::new().with_states([ExecutionState::Running]),
        ScriptedEngine::new().failing(EngineCall::Submit, AthenaError::transport("denied")),
        ScriptedEngine::new().failing(EngineCall::GetStatus, AthenaError::transport("throttled")),
        ScriptedEngine::new().failing(EngineCall::GetResults, AthenaError::internal("boom")),
    ];

    for engine in &engines {
        let results = run(engine, QueryRequest::new("SELECT 1").with_max_wait_seconds(3)).await;
        assert_shape(&results);
    }
}

#[tokio::test(start_paused = true)]
async fn test_rows_never_exceed_max_results() {
    for max_results in [1, 2, 5, 50, 1000] {
        let engine = ScriptedEngine::new().with_page(numbers_page(60));
        let results = run(
            &engine,
            QueryRequest::new("SELECT n, label FROM t").with_max_results(max_results),
        )
        .await;

        assert_eq!(results.status, QueryStatus::Succeeded);
        let rows = results.rows.unwrap();
        assert!(rows.len() <= max_results as usize);
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_has_empty_rows() {
    let engine = ScriptedEngine::new().with_page(ResultPage {
        columns: vec![Column::new("n", "integer")],
        rows: vec![],
        next_token: None,
    });
    let results = run(&engine, QueryRequest::new("SELECT n FROM empty")).await;

    assert_eq!(results.status, QueryStatus::Succeeded);
    assert_eq!(results.rows.map(|rows| rows.len()), Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_out_of_bounds_requests_are_rejected_before_submission() {
    let requests = vec![
        QueryRequest::new("SELECT 1").with_max_results(0),
        QueryRequest::new("SELECT 1").with_max_results(1001),
        QueryRequest::new("SELECT 1").with_max_wait_seconds(0),
        QueryRequest::new("SELECT 1").with_max_wait_seconds(3601),
        QueryRequest::new(""),
    ];

    for request in requests {
        let engine = ScriptedEngine::new();
        let results = run(&engine, request).await;

        assert_eq!(results.status, QueryStatus::Error);
        assert_eq!(results.query_execution_id, "");
        assert!(results
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Validation error"));
        assert_eq!(engine.call_count(EngineCall::Submit), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_statistics_absent_without_engine_block() {
    let engine = ScriptedEngine::new().with_page(numbers_page(1));
    let results = run(&engine, QueryRequest::new("SELECT 1")).await;

    assert!(results.statistics.is_none());
    let json = serde_json::to_value(&results).unwrap();
    assert!(json.get("statistics").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_same_page_decodes_identically() {
    let first = run(
        &ScriptedEngine::new().with_page(numbers_page(4)),
        QueryRequest::new("SELECT 1"),
    )
    .await;
    let second = run(
        &ScriptedEngine::new().with_page(numbers_page(4)),
        QueryRequest::new("SELECT 1"),
    )
    .await;

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}
