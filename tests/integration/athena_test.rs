//! Live tests against AWS Athena.
//!
//! Skipped unless ATHENA_INTEGRATION=1. Uses the usual AWS credential chain
//! plus ATHENA_* variables for workgroup and output location.

use athena_query::config::AthenaConfig;
use athena_query::engine::{self, QueryEngine};
use athena_query::query::{QueryExecutor, QueryRequest, QueryStatus};

/// Helper to create a live engine when integration tests are enabled.
async fn get_test_engine() -> Option<(Box<dyn QueryEngine>, AthenaConfig)> {
    if std::env::var("ATHENA_INTEGRATION").ok()?.as_str() != "1" {
        return None;
    }
    let mut config = AthenaConfig::default();
    config.apply_vars(|key| std::env::var(key).ok()).ok()?;
    let engine = engine::connect(&config).await.ok()?;
    Some((engine, config))
}

#[tokio::test]
async fn test_live_select_one() {
    let Some((engine, config)) = get_test_engine().await else {
        eprintln!("Skipping test: ATHENA_INTEGRATION not set");
        return;
    };

    let results = QueryExecutor::new(engine.as_ref(), &config)
        .execute(&QueryRequest::new("SELECT 1 as test").with_max_wait_seconds(120))
        .await;

    assert_eq!(results.status, QueryStatus::Succeeded, "{:?}", results.error_message);
    let rows = results.rows.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("test"), Some(Some("1")));
}

#[tokio::test]
async fn test_live_syntax_error() {
    let Some((engine, config)) = get_test_engine().await else {
        eprintln!("Skipping test: ATHENA_INTEGRATION not set");
        return;
    };

    let results = QueryExecutor::new(engine.as_ref(), &config)
        .execute(&QueryRequest::new("SELEC 1").with_max_wait_seconds(120))
        .await;

    assert_ne!(results.status, QueryStatus::Succeeded);
    assert!(results.error_message.is_some());
    assert!(results.rows.is_none());
}

#[tokio::test]
async fn test_live_list_databases() {
    let Some((engine, config)) = get_test_engine().await else {
        eprintln!("Skipping test: ATHENA_INTEGRATION not set");
        return;
    };

    let databases = engine.list_databases(&config.catalog).await;
    assert!(databases.is_ok(), "{:?}", databases.err());
}
