//! Query requests and their normalization.
//!
//! Each optional field resolves as: explicit request value, then configured
//! default, then built-in default. Empty strings count as unset.

use serde::Deserialize;

use crate::config::{AthenaConfig, DEFAULT_WORKGROUP};
use crate::engine::ExecutionContext;
use crate::error::{AthenaError, Result};

pub const DEFAULT_MAX_RESULTS: u32 = 100;
pub const MAX_RESULTS_LIMIT: u32 = 1000;
pub const DEFAULT_MAX_WAIT_SECONDS: u64 = 300;
pub const MAX_WAIT_SECONDS_LIMIT: u64 = 3600;

/// A single query invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub output_location: Option<String>,
    #[serde(default)]
    pub workgroup: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_max_wait_seconds")]
    pub max_wait_seconds: u64,
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

fn default_max_wait_seconds() -> u64 {
    DEFAULT_MAX_WAIT_SECONDS
}

fn first_set(candidates: [Option<&str>; 2]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(String::from)
}

impl QueryRequest {
    /// Creates a request with default limits and no overrides.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            database: None,
            catalog: None,
            output_location: None,
            workgroup: None,
            max_results: DEFAULT_MAX_RESULTS,
            max_wait_seconds: DEFAULT_MAX_WAIT_SECONDS,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn with_output_location(mut self, location: impl Into<String>) -> Self {
        self.output_location = Some(location.into());
        self
    }

    pub fn with_workgroup(mut self, workgroup: impl Into<String>) -> Self {
        self.workgroup = Some(workgroup.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_max_wait_seconds(mut self, seconds: u64) -> Self {
        self.max_wait_seconds = seconds;
        self
    }

    /// Checks the request shape without touching configuration.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(AthenaError::validation("query must not be empty"));
        }
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(AthenaError::validation(format!(
                "max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
                self.max_results
            )));
        }
        if !(1..=MAX_WAIT_SECONDS_LIMIT).contains(&self.max_wait_seconds) {
            return Err(AthenaError::validation(format!(
                "max_wait_seconds must be between 1 and {MAX_WAIT_SECONDS_LIMIT}, got {}",
                self.max_wait_seconds
            )));
        }
        Ok(())
    }

    /// Validates the request and resolves it against configured defaults.
    pub fn normalize(&self, defaults: &AthenaConfig) -> Result<ExecutionContext> {
        self.validate()?;

        Ok(ExecutionContext {
            query: self.query.clone(),
            workgroup: first_set([self.workgroup.as_deref(), Some(defaults.workgroup.as_str())])
                .unwrap_or_else(|| DEFAULT_WORKGROUP.to_string()),
            catalog: first_set([self.catalog.as_deref(), Some(defaults.catalog.as_str())]),
            database: first_set([self.database.as_deref(), defaults.database.as_deref()]),
            output_location: first_set([
                self.output_location.as_deref(),
                defaults.output_location.as_deref(),
            ]),
        })
    }
}
