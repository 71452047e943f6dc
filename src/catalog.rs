//! Catalog browsing: catalogs, databases, tables, and table metadata.
//!
//! Each call is a single engine request. Failures come back as errors so an
//! empty listing is never confused with a failed lookup.

use serde::Serialize;
use tracing::{error, info};

use crate::config::AthenaConfig;
use crate::engine::{QueryEngine, TableColumn, TableMetadata};
use crate::error::{AthenaError, Result};

/// Browses catalog objects using the configured default catalog.
pub struct CatalogBrowser<'a> {
    engine: &'a dyn QueryEngine,
    config: &'a AthenaConfig,
}

impl<'a> CatalogBrowser<'a> {
    pub fn new(engine: &'a dyn QueryEngine, config: &'a AthenaConfig) -> Self {
        Self { engine, config }
    }

    /// Resolves the catalog name, falling back to the configured default.
    pub fn resolve_catalog<'b>(&'b self, catalog: Option<&'b str>) -> &'b str {
        catalog
            .filter(|c| !c.is_empty())
            .unwrap_or(self.config.catalog.as_str())
    }

    pub async fn list_catalogs(&self) -> Result<Vec<String>> {
        info!("Listing data catalogs");
        self.engine.list_catalogs().await.inspect_err(|e| {
            error!("Error listing catalogs: {}", e);
        })
    }

    pub async fn list_databases(&self, catalog: Option<&str>) -> Result<Vec<String>> {
        let catalog = self.resolve_catalog(catalog);
        info!("Listing databases in catalog: {}", catalog);
        self.engine.list_databases(catalog).await.inspect_err(|e| {
            error!("Error listing databases: {}", e);
        })
    }

    pub async fn list_tables(&self, database: &str, catalog: Option<&str>) -> Result<Vec<String>> {
        if database.is_empty() {
            return Err(AthenaError::validation("database must not be empty"));
        }
        let catalog = self.resolve_catalog(catalog);
        info!("Listing tables in catalog: {}, database: {}", catalog, database);
        self.engine
            .list_tables(catalog, database)
            .await
            .inspect_err(|e| error!("Error listing tables: {}", e))
    }

    pub async fn get_table_metadata(
        &self,
        table: &str,
        database: &str,
        catalog: Option<&str>,
    ) -> Result<TableMetadata> {
        if table.is_empty() || database.is_empty() {
            return Err(AthenaError::validation(
                "table and database must not be empty",
            ));
        }
        let catalog = self.resolve_catalog(catalog);
        info!("Getting metadata for table: {} in database: {}", table, database);
        self.engine
            .get_table_metadata(catalog, database, table)
            .await
            .inspect_err(|e| error!("Error getting table metadata: {}", e))
    }
}

/// Serializable outcome of a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Listing {
    Ok { items: Vec<String> },
    Error { error: String },
}

impl From<Result<Vec<String>>> for Listing {
    fn from(result: Result<Vec<String>>) -> Self {
        match result {
            Ok(items) => Self::Ok { items },
            Err(e) => Self::Error {
                error: e.to_string(),
            },
        }
    }
}

impl Listing {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Table metadata as reported to the caller; a failed lookup still names
/// the table it was about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub name: String,
    pub database: String,
    pub catalog: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
    pub columns: Vec<TableColumn>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partition_keys: Vec<TableColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableReport {
    /// Builds a report from a metadata lookup.
    pub fn from_result(
        table: &str,
        database: &str,
        catalog: &str,
        result: Result<TableMetadata>,
    ) -> Self {
        match result {
            Ok(metadata) => Self {
                name: metadata.name,
                database: metadata.database,
                catalog: metadata.catalog,
                table_type: metadata.table_type,
                columns: metadata.columns,
                partition_keys: metadata.partition_keys,
                error: None,
            },
            Err(e) => Self {
                name: table.to_string(),
                database: database.to_string(),
                catalog: catalog.to_string(),
                table_type: None,
                columns: Vec::new(),
                partition_keys: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
