//! Storage engine boundary
//!
//! The pipeline only needs two things from the store: the column catalog and
//! plain SQL execution returning named-column rows. Both are behind the
//! [`Store`] trait so tests can swap in fakes without a running ClickHouse.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod clickhouse_store;
pub mod connection_pool;

pub use clickhouse_store::ClickHouseStore;
pub use connection_pool::{ConnectionPool, StoreConfig};

/// One result row: column name → value, in the column order the store returned.
pub type Row = Map<String, Value>;

/// Ordered result rows whose shape is only known once observed.
pub type RowSet = Vec<Row>;

/// A single `(table, column, type)` entry from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, clickhouse::Row)]
pub struct CatalogColumn {
    pub table: String,
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub position: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read column catalog: {0}")]
    Catalog(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Failed to decode result row: {0}")]
    Decode(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Every column of every table visible to the store, in no particular order
    async fn catalog_columns(&self) -> Result<Vec<CatalogColumn>, StoreError>;

    /// Run an internal read (content sampling) on the default connection
    async fn fetch_rows(&self, sql: &str) -> Result<RowSet, StoreError>;

    /// Run a model-generated query, on the restricted connection when one is configured
    async fn execute_query(&self, sql: &str) -> Result<RowSet, StoreError>;
}
