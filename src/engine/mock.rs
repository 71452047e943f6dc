//! Scripted query engine for testing.
//!
//! Plays back a fixed sequence of statuses for every execution, serves a
//! canned result page, and records every call so tests can assert on them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{
    ExecutionContext, ExecutionState, QueryEngine, RawRow, ResultPage, StatusSnapshot,
    TableMetadata,
};
use crate::error::{AthenaError, Result};
use crate::query::Column;

/// Engine operations, used for failure injection and call recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCall {
    Submit,
    GetStatus,
    GetResults,
    Cancel,
    ListCatalogs,
    ListDatabases,
    ListTables,
    GetTableMetadata,
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<EngineCall>,
    submitted: Vec<ExecutionContext>,
    cancelled: Vec<String>,
    status_cursors: HashMap<String, usize>,
}

/// An in-memory engine that replays a script.
#[derive(Debug)]
pub struct ScriptedEngine {
    statuses: Vec<StatusSnapshot>,
    page: Option<ResultPage>,
    failures: HashMap<EngineCall, AthenaError>,
    catalogs: Vec<String>,
    databases: Vec<String>,
    tables: Vec<String>,
    table_metadata: Option<TableMetadata>,
    recorder: Mutex<Recorder>,
}

impl ScriptedEngine {
    /// Creates an engine whose executions succeed on the first poll and
    /// echo the submitted query back as a single row.
    pub fn new() -> Self {
        Self {
            statuses: vec![StatusSnapshot::new(ExecutionState::Succeeded)],
            page: None,
            failures: HashMap::new(),
            catalogs: vec!["AwsDataCatalog".to_string()],
            databases: Vec::new(),
            tables: Vec::new(),
            table_metadata: None,
            recorder: Mutex::new(Recorder::default()),
        }
    }

    /// Sets the status sequence each execution walks through.
    ///
    /// The last status repeats once the sequence is exhausted.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = StatusSnapshot>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Shorthand for a status sequence without reasons or statistics.
    pub fn with_states(self, states: impl IntoIterator<Item = ExecutionState>) -> Self {
        self.with_statuses(states.into_iter().map(StatusSnapshot::new))
    }

    /// Sets the result page served for every execution.
    pub fn with_page(mut self, page: ResultPage) -> Self {
        self.page = Some(page);
        self
    }

    /// Makes every call to `call` fail with `error`.
    pub fn failing(mut self, call: EngineCall, error: AthenaError) -> Self {
        self.failures.insert(call, error);
        self
    }

    pub fn with_catalogs(mut self, catalogs: Vec<String>) -> Self {
        self.catalogs = catalogs;
        self
    }

    pub fn with_databases(mut self, databases: Vec<String>) -> Self {
        self.databases = databases;
        self
    }

    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_table_metadata(mut self, metadata: TableMetadata) -> Self {
        self.table_metadata = Some(metadata);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.recorder().calls.clone()
    }

    /// Number of calls made to a given operation.
    pub fn call_count(&self, call: EngineCall) -> usize {
        self.recorder().calls.iter().filter(|c| **c == call).count()
    }

    /// Contexts passed to `submit`, in order.
    pub fn submitted(&self) -> Vec<ExecutionContext> {
        self.recorder().submitted.clone()
    }

    /// Execution ids passed to `cancel`, in order.
    pub fn cancelled(&self) -> Vec<String> {
        self.recorder().cancelled.clone()
    }

    fn recorder(&self) -> MutexGuard<'_, Recorder> {
        self.recorder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the call and returns the injected failure, if any.
    fn enter(&self, call: EngineCall) -> Result<()> {
        self.recorder().calls.push(call);
        match self.failures.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn echo_page(&self, execution_id: &str) -> ResultPage {
        let query = execution_id
            .rsplit('-')
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| self.recorder().submitted.get(index).cloned())
            .map(|ctx| ctx.query)
            .unwrap_or_default();

        ResultPage {
            columns: vec![Column::new("result", "varchar")],
            rows: vec![
                RawRow::from_values(["result"]),
                RawRow::from_values([format!("Mock result for: {query}")]),
            ],
            next_token: None,
        }
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    async fn submit(&self, context: &ExecutionContext) -> Result<String> {
        self.enter(EngineCall::Submit)?;
        let mut recorder = self.recorder();
        recorder.submitted.push(context.clone());
        Ok(format!("mock-execution-{}", recorder.submitted.len()))
    }

    async fn get_status(&self, execution_id: &str) -> Result<StatusSnapshot> {
        self.enter(EngineCall::GetStatus)?;
        let mut recorder = self.recorder();
        let cursor = recorder
            .status_cursors
            .entry(execution_id.to_string())
            .or_insert(0);
        let index = (*cursor).min(self.statuses.len().saturating_sub(1));
        *cursor += 1;

        self.statuses
            .get(index)
            .cloned()
            .ok_or_else(|| AthenaError::internal("scripted engine has no statuses"))
    }

    async fn get_results(&self, execution_id: &str, max_rows: u32) -> Result<ResultPage> {
        self.enter(EngineCall::GetResults)?;
        let mut page = match &self.page {
            Some(page) => page.clone(),
            None => self.echo_page(execution_id),
        };

        let limit = max_rows as usize;
        if page.rows.len() > limit {
            page.rows.truncate(limit);
            page.next_token.get_or_insert_with(|| "mock-next-page".to_string());
        }
        Ok(page)
    }

    async fn cancel(&self, execution_id: &str) -> Result<()> {
        self.enter(EngineCall::Cancel)?;
        self.recorder().cancelled.push(execution_id.to_string());
        Ok(())
    }

    async fn list_catalogs(&self) -> Result<Vec<String>> {
        self.enter(EngineCall::ListCatalogs)?;
        Ok(self.catalogs.clone())
    }

    async fn list_databases(&self, _catalog: &str) -> Result<Vec<String>> {
        self.enter(EngineCall::ListDatabases)?;
        Ok(self.databases.clone())
    }

    async fn list_tables(&self, _catalog: &str, _database: &str) -> Result<Vec<String>> {
        self.enter(EngineCall::ListTables)?;
        Ok(self.tables.clone())
    }

    async fn get_table_metadata(
        &self,
        catalog: &str,
        database: &str,
        table: &str,
    ) -> Result<TableMetadata> {
        self.enter(EngineCall::GetTableMetadata)?;
        Ok(self.table_metadata.clone().unwrap_or_else(|| TableMetadata {
            name: table.to_string(),
            database: database.to_string(),
            catalog: catalog.to_string(),
            table_type: None,
            columns: Vec::new(),
            partition_keys: Vec::new(),
        }))
    }
}
