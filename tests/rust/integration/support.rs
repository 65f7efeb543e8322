use std::sync::{Arc, Mutex};

use askdb::config::PipelineConfig;
use askdb::llm::{CompletionRequest, LlmClient, LlmError};
use askdb::pipeline::Pipeline;
use askdb::store::{CatalogColumn, RowSet, Store, StoreError};
use async_trait::async_trait;
use serde_json::Value;

/// In-memory store: a fixed catalog, fixed sample rows, fixed query result.
/// Records every statement it receives.
#[derive(Default)]
pub struct FakeStore {
    pub catalog: Vec<CatalogColumn>,
    pub sample: RowSet,
    pub result: RowSet,
    pub fail_execution: Option<String>,
    pub sampled: Mutex<Vec<String>>,
    pub executed: Mutex<Vec<String>>,
    pub catalog_reads: Mutex<usize>,
}

impl FakeStore {
    pub fn portfolio() -> Self {
        let columns = [
            ("holdings", "user_id", "String"),
            ("holdings", "company", "String"),
            ("holdings", "shares", "UInt32"),
            ("transactions", "user_id", "String"),
            ("transactions", "created_at", "DateTime"),
            ("transactions", "amount", "Decimal(18, 2)"),
        ];
        Self {
            catalog: columns
                .iter()
                .enumerate()
                .map(|(i, (table, name, data_type))| CatalogColumn {
                    table: table.to_string(),
                    name: name.to_string(),
                    data_type: data_type.to_string(),
                    position: i as u64 + 1,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_result(mut self, rows: Value) -> Self {
        self.result = rows_from(rows);
        self
    }

    pub fn with_sample(mut self, rows: Value) -> Self {
        self.sample = rows_from(rows);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn sampled(&self) -> Vec<String> {
        self.sampled.lock().unwrap().clone()
    }

    pub fn touched(&self) -> bool {
        *self.catalog_reads.lock().unwrap() > 0
            || !self.sampled().is_empty()
            || !self.executed().is_empty()
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn catalog_columns(&self) -> Result<Vec<CatalogColumn>, StoreError> {
        *self.catalog_reads.lock().unwrap() += 1;
        Ok(self.catalog.clone())
    }

    async fn fetch_rows(&self, sql: &str) -> Result<RowSet, StoreError> {
        self.sampled.lock().unwrap().push(sql.to_string());
        Ok(self.sample.clone())
    }

    async fn execute_query(&self, sql: &str) -> Result<RowSet, StoreError> {
        self.executed.lock().unwrap().push(sql.to_string());
        match &self.fail_execution {
            Some(message) => Err(StoreError::Query(message.clone())),
            None => Ok(self.result.clone()),
        }
    }
}

/// Replies by stage, recognised from the system prompt. Records requests.
pub struct ScriptedLlm {
    pub table: String,
    pub sql: String,
    pub interpretation: String,
    pub graph_hint: Option<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn new(table: &str, sql: &str) -> Self {
        Self {
            table: table.to_string(),
            sql: sql.to_string(),
            interpretation: "Here is what I found.".to_string(),
            graph_hint: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let system = request.messages[0].content.clone();
        self.requests.lock().unwrap().push(request);

        if system.contains("most relevant table") {
            Ok(self.table.clone())
        } else if system.contains("SQL expert") {
            Ok(self.sql.clone())
        } else if system.contains("chart query results") {
            self.graph_hint
                .clone()
                .ok_or_else(|| LlmError::Request("no hint scripted".to_string()))
        } else {
            Ok(self.interpretation.clone())
        }
    }
}

pub fn rows_from(value: Value) -> RowSet {
    value
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}

pub fn pipeline(
    store: Arc<FakeStore>,
    llm: Arc<ScriptedLlm>,
    config: PipelineConfig,
) -> Pipeline {
    Pipeline::new(store, llm, "test-model", config)
}
