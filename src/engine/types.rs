//! Engine-neutral types exchanged with a `QueryEngine`.
//!
//! These mirror what the remote engine hands back, before any decoding.

use serde::Serialize;
use std::str::FromStr;

use crate::error::AthenaError;
use crate::query::{Column, QueryStatus};

/// Execution state as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionState {
    /// Returns true while the engine is still working on the execution.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }

    /// Maps the engine state onto the caller-facing status.
    pub fn as_status(&self) -> QueryStatus {
        match self {
            Self::Queued => QueryStatus::Queued,
            Self::Running => QueryStatus::Running,
            Self::Succeeded => QueryStatus::Succeeded,
            Self::Failed => QueryStatus::Failed,
            Self::Cancelled => QueryStatus::Cancelled,
        }
    }
}

impl FromStr for ExecutionState {
    type Err = AthenaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "QUEUED" => Ok(Self::Queued),
            "RUNNING" => Ok(Self::Running),
            "SUCCEEDED" => Ok(Self::Succeeded),
            "FAILED" => Ok(Self::Failed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(AthenaError::internal(format!(
                "Unrecognized execution state: {other}"
            ))),
        }
    }
}

/// Resolved parameters for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub query: String,
    pub workgroup: String,
    pub catalog: Option<String>,
    pub database: Option<String>,
    pub output_location: Option<String>,
}

impl ExecutionContext {
    /// Returns true if a catalog or database context should be sent.
    pub fn has_namespace(&self) -> bool {
        self.catalog.is_some() || self.database.is_some()
    }
}

/// Statistics block as supplied by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStatistics {
    pub total_execution_time_ms: Option<i64>,
    pub data_scanned_bytes: Option<i64>,
    pub engine_execution_time_ms: Option<i64>,
    pub query_queue_time_ms: Option<i64>,
    pub service_processing_time_ms: Option<i64>,
}

/// One observation of an execution's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: ExecutionState,
    pub reason: Option<String>,
    pub statistics: Option<RawStatistics>,
}

impl StatusSnapshot {
    pub fn new(state: ExecutionState) -> Self {
        Self {
            state,
            reason: None,
            statistics: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_statistics(mut self, statistics: RawStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }
}

/// A raw result row. `None` means the cell carried no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    /// Builds a row where every cell has a value.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }
}

/// A single page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    pub columns: Vec<Column>,
    pub rows: Vec<RawRow>,
    /// Continuation token; present when the engine holds more rows.
    pub next_token: Option<String>,
}

/// Column description from the table catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Metadata for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMetadata {
    pub name: String,
    pub database: String,
    pub catalog: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
    pub columns: Vec<TableColumn>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partition_keys: Vec<TableColumn>,
}
