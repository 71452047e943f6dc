//! Catalog browsing against the scripted engine.

use athena_query::catalog::{CatalogBrowser, Listing, TableReport};
use athena_query::config::AthenaConfig;
use athena_query::engine::{EngineCall, ScriptedEngine, TableColumn, TableMetadata};
use athena_query::error::AthenaError;
use pretty_assertions::assert_eq;
use serde_json::json;

fn orders_metadata() -> TableMetadata {
    TableMetadata {
        name: "orders".to_string(),
        database: "sales".to_string(),
        catalog: "AwsDataCatalog".to_string(),
        table_type: Some("EXTERNAL_TABLE".to_string()),
        columns: vec![
            TableColumn {
                name: "order_id".to_string(),
                data_type: Some("bigint".to_string()),
                comment: None,
            },
            TableColumn {
                name: "total".to_string(),
                data_type: Some("decimal(10,2)".to_string()),
                comment: Some("gross amount".to_string()),
            },
        ],
        partition_keys: vec![TableColumn {
            name: "dt".to_string(),
            data_type: Some("string".to_string()),
            comment: None,
        }],
    }
}

#[tokio::test]
async fn test_list_catalogs_and_databases() {
    let engine = ScriptedEngine::new()
        .with_catalogs(vec!["AwsDataCatalog".to_string(), "lake".to_string()])
        .with_databases(vec!["default".to_string(), "sales".to_string()]);
    let config = AthenaConfig::default();
    let browser = CatalogBrowser::new(&engine, &config);

    assert_eq!(
        browser.list_catalogs().await.unwrap(),
        vec!["AwsDataCatalog", "lake"]
    );
    assert_eq!(
        browser.list_databases(None).await.unwrap(),
        vec!["default", "sales"]
    );
}

#[tokio::test]
async fn test_table_report_success() {
    let engine = ScriptedEngine::new().with_table_metadata(orders_metadata());
    let config = AthenaConfig::default();
    let browser = CatalogBrowser::new(&engine, &config);

    let result = browser.get_table_metadata("orders", "sales", None).await;
    let report = TableReport::from_result("orders", "sales", "AwsDataCatalog", result);

    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "name": "orders",
            "database": "sales",
            "catalog": "AwsDataCatalog",
            "table_type": "EXTERNAL_TABLE",
            "columns": [
                {"name": "order_id", "type": "bigint"},
                {"name": "total", "type": "decimal(10,2)", "comment": "gross amount"}
            ],
            "partition_keys": [{"name": "dt", "type": "string"}]
        })
    );
}

#[tokio::test]
async fn test_failed_and_empty_listings_differ() {
    let config = AthenaConfig::default();

    let empty = ScriptedEngine::new();
    let empty_listing = Listing::from(
        CatalogBrowser::new(&empty, &config)
            .list_tables("sales", None)
            .await,
    );

    let failing = ScriptedEngine::new().failing(
        EngineCall::ListTables,
        AthenaError::transport("ListTableMetadata failed: MetadataException: database not found"),
    );
    let failed_listing = Listing::from(
        CatalogBrowser::new(&failing, &config)
            .list_tables("sales", None)
            .await,
    );

    assert!(empty_listing.is_ok());
    assert!(!failed_listing.is_ok());
    assert_ne!(empty_listing, failed_listing);
}
