//! Caller-facing result types.
//!
//! `QueryResults` is the single value every orchestration produces, whether
//! the query succeeded, failed remotely, timed out, or never got submitted.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::AthenaError;

/// Status reported to the caller.
///
/// The first five are engine states; `Timeout` and `Error` are synthesized
/// locally and never come back from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    Timeout,
    Error,
}

impl QueryStatus {
    /// Returns the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Timeout => "TIMEOUT",
            Self::Error => "ERROR",
        }
    }

    /// Returns true if no further transition can happen from this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Running)
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A result column, in result-set order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// One decoded row: column name to value, in column order.
///
/// Serialized as a JSON object. Fields keep result-set order so a row always
/// has exactly one field per column, even when column names repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, Option<String>)>,
}

impl Row {
    /// Returns the value of the first field with the given name.
    ///
    /// The outer `Option` is field presence, the inner one is SQL NULL.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_deref())
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, Option<V>)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, Option<V>)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.map(Into::into)))
                .collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Run statistics reported by the engine.
///
/// Each field is independently optional; a missing field serializes as null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryStatistics {
    pub processing_time_ms: Option<i64>,
    pub data_scanned_bytes: Option<i64>,
    pub engine_execution_time_ms: Option<i64>,
    pub query_queue_time_ms: Option<i64>,
    pub service_processing_time_ms: Option<i64>,
}

/// Structured outcome of one query execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResults {
    /// Engine-assigned identifier; empty if submission never succeeded.
    pub query_execution_id: String,
    pub status: QueryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_change_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<QueryStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl QueryResults {
    /// Builds a successful result.
    pub fn succeeded(
        query_execution_id: impl Into<String>,
        statistics: Option<QueryStatistics>,
        columns: Vec<Column>,
        rows: Vec<Row>,
    ) -> Self {
        Self {
            query_execution_id: query_execution_id.into(),
            status: QueryStatus::Succeeded,
            state_change_reason: None,
            statistics,
            columns: Some(columns),
            rows: Some(rows),
            error_message: None,
        }
    }

    /// Renders a classified error into the common result shape.
    pub fn from_error(query_execution_id: impl Into<String>, error: &AthenaError) -> Self {
        Self {
            query_execution_id: query_execution_id.into(),
            status: error.status(),
            state_change_reason: error.state_change_reason(),
            statistics: None,
            columns: None,
            rows: None,
            error_message: Some(error.to_string()),
        }
    }

    /// Attaches statistics to an existing result.
    pub fn with_statistics(mut self, statistics: Option<QueryStatistics>) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Succeeded
    }
}
