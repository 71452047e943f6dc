//! AWS Athena engine implementation.
//!
//! Implements the `QueryEngine` trait on top of the AWS SDK. Every method is
//! exactly one SDK call; nothing here retries or paginates.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::config::Region;
use aws_sdk_athena::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_athena::types::{
    Column as AthenaColumn, QueryExecutionContext, QueryExecutionStatistics, ResultConfiguration,
};
use aws_sdk_athena::Client;
use tracing::{debug, info};

use super::{
    ExecutionContext, ExecutionState, QueryEngine, RawRow, RawStatistics, ResultPage,
    StatusSnapshot, TableColumn, TableMetadata,
};
use crate::config::AthenaConfig;
use crate::error::{AthenaError, Result};
use crate::query::Column;

/// Athena-backed query engine.
#[derive(Debug, Clone)]
pub struct AthenaEngine {
    client: Client,
}

impl AthenaEngine {
    /// Loads AWS credentials from the default provider chain and builds a
    /// client pinned to the configured region.
    pub async fn connect(config: &AthenaConfig) -> Result<Self> {
        info!("Initializing Athena client in region: {}", config.region);

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Ok(Self::from_client(Client::new(&sdk_config)))
    }

    /// Wraps an existing SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Renders an SDK failure into a transport error, keeping the service's
/// error code and message verbatim when there is one.
fn transport_error<E, R>(operation: &str, err: SdkError<E, R>) -> AthenaError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let detail = match err.as_service_error() {
        Some(service) => match (service.code(), service.message()) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message.to_string(),
            _ => DisplayErrorContext(&err).to_string(),
        },
        None => DisplayErrorContext(&err).to_string(),
    };
    AthenaError::transport(format!("{operation} failed: {detail}"))
}

fn convert_statistics(stats: &QueryExecutionStatistics) -> RawStatistics {
    RawStatistics {
        total_execution_time_ms: stats.total_execution_time_in_millis(),
        data_scanned_bytes: stats.data_scanned_in_bytes(),
        engine_execution_time_ms: stats.engine_execution_time_in_millis(),
        query_queue_time_ms: stats.query_queue_time_in_millis(),
        service_processing_time_ms: stats.service_processing_time_in_millis(),
    }
}

fn convert_table_columns(columns: &[AthenaColumn]) -> Vec<TableColumn> {
    columns
        .iter()
        .map(|col| TableColumn {
            name: col.name().to_string(),
            data_type: col.r#type().map(String::from),
            comment: col.comment().map(String::from),
        })
        .collect()
}

#[async_trait]
impl QueryEngine for AthenaEngine {
    async fn submit(&self, context: &ExecutionContext) -> Result<String> {
        let mut request = self
            .client
            .start_query_execution()
            .query_string(&context.query)
            .work_group(&context.workgroup);

        if context.has_namespace() {
            request = request.query_execution_context(
                QueryExecutionContext::builder()
                    .set_catalog(context.catalog.clone())
                    .set_database(context.database.clone())
                    .build(),
            );
        }

        if let Some(location) = &context.output_location {
            request = request.result_configuration(
                ResultConfiguration::builder()
                    .output_location(location)
                    .build(),
            );
        }

        let output = request
            .send()
            .await
            .map_err(|e| transport_error("StartQueryExecution", e))?;

        output
            .query_execution_id()
            .map(String::from)
            .ok_or_else(|| AthenaError::internal("StartQueryExecution returned no execution id"))
    }

    async fn get_status(&self, execution_id: &str) -> Result<StatusSnapshot> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| transport_error("GetQueryExecution", e))?;

        let execution = output
            .query_execution()
            .ok_or_else(|| AthenaError::internal("GetQueryExecution returned no execution"))?;
        let status = execution
            .status()
            .ok_or_else(|| AthenaError::internal("GetQueryExecution returned no status"))?;
        let state: ExecutionState = status
            .state()
            .ok_or_else(|| AthenaError::internal("GetQueryExecution returned no state"))?
            .as_str()
            .parse()?;

        debug!("Execution {} is {:?}", execution_id, state);

        Ok(StatusSnapshot {
            state,
            reason: status.state_change_reason().map(String::from),
            statistics: execution.statistics().map(convert_statistics),
        })
    }

    async fn get_results(&self, execution_id: &str, max_rows: u32) -> Result<ResultPage> {
        let max_results = i32::try_from(max_rows)
            .map_err(|_| AthenaError::internal(format!("max_rows out of range: {max_rows}")))?;

        let output = self
            .client
            .get_query_results()
            .query_execution_id(execution_id)
            .max_results(max_results)
            .send()
            .await
            .map_err(|e| transport_error("GetQueryResults", e))?;

        let Some(result_set) = output.result_set() else {
            return Ok(ResultPage::default());
        };

        let columns = result_set
            .result_set_metadata()
            .map(|metadata| {
                metadata
                    .column_info()
                    .iter()
                    .map(|col| Column::new(col.name(), col.r#type()))
                    .collect()
            })
            .unwrap_or_default();

        let rows = result_set
            .rows()
            .iter()
            .map(|row| RawRow {
                cells: row
                    .data()
                    .iter()
                    .map(|datum| datum.var_char_value().map(String::from))
                    .collect(),
            })
            .collect();

        Ok(ResultPage {
            columns,
            rows,
            next_token: output.next_token().map(String::from),
        })
    }

    async fn cancel(&self, execution_id: &str) -> Result<()> {
        self.client
            .stop_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| transport_error("StopQueryExecution", e))?;
        Ok(())
    }

    async fn list_catalogs(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_data_catalogs()
            .send()
            .await
            .map_err(|e| transport_error("ListDataCatalogs", e))?;

        Ok(output
            .data_catalogs_summary()
            .iter()
            .filter_map(|summary| summary.catalog_name().map(String::from))
            .collect())
    }

    async fn list_databases(&self, catalog: &str) -> Result<Vec<String>> {
        let output = self
            .client
            .list_databases()
            .catalog_name(catalog)
            .send()
            .await
            .map_err(|e| transport_error("ListDatabases", e))?;

        Ok(output
            .database_list()
            .iter()
            .map(|db| db.name().to_string())
            .collect())
    }

    async fn list_tables(&self, catalog: &str, database: &str) -> Result<Vec<String>> {
        let output = self
            .client
            .list_table_metadata()
            .catalog_name(catalog)
            .database_name(database)
            .send()
            .await
            .map_err(|e| transport_error("ListTableMetadata", e))?;

        Ok(output
            .table_metadata_list()
            .iter()
            .map(|table| table.name().to_string())
            .collect())
    }

    async fn get_table_metadata(
        &self,
        catalog: &str,
        database: &str,
        table: &str,
    ) -> Result<TableMetadata> {
        let output = self
            .client
            .get_table_metadata()
            .catalog_name(catalog)
            .database_name(database)
            .table_name(table)
            .send()
            .await
            .map_err(|e| transport_error("GetTableMetadata", e))?;

        let metadata = output.table_metadata();

        Ok(TableMetadata {
            name: table.to_string(),
            database: database.to_string(),
            catalog: catalog.to_string(),
            table_type: metadata.and_then(|m| m.table_type()).map(String::from),
            columns: metadata
                .map(|m| convert_table_columns(m.columns()))
                .unwrap_or_default(),
            partition_keys: metadata
                .map(|m| convert_table_columns(m.partition_keys()))
                .unwrap_or_default(),
        })
    }
}
