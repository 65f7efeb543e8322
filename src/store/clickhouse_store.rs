use std::sync::Arc;

use async_trait::async_trait;
use clickhouse::Client;
use serde_json::Value;
use tokio::io::AsyncBufReadExt;

use super::{CatalogColumn, ConnectionPool, RowSet, Store, StoreError};

const CATALOG_QUERY: &str = "SELECT table, name, type, position \
     FROM system.columns \
     WHERE database = currentDatabase() \
     ORDER BY table, position";

/// [`Store`] backed by ClickHouse over HTTP
#[derive(Clone)]
pub struct ClickHouseStore {
    pool: Arc<ConnectionPool>,
}

impl ClickHouseStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}

#[async_trait]
impl Store for ClickHouseStore {
    async fn catalog_columns(&self) -> Result<Vec<CatalogColumn>, StoreError> {
        self.pool
            .default_client()
            .query(CATALOG_QUERY)
            .fetch_all::<CatalogColumn>()
            .await
            .map_err(|e| StoreError::Catalog(e.to_string()))
    }

    async fn fetch_rows(&self, sql: &str) -> Result<RowSet, StoreError> {
        fetch_json_rows(self.pool.default_client(), sql).await
    }

    async fn execute_query(&self, sql: &str) -> Result<RowSet, StoreError> {
        fetch_json_rows(self.pool.query_client(), sql).await
    }
}

/// The client treats `?` as a bind placeholder; raw SQL must escape it as `??`.
fn escape_placeholders(sql: &str) -> String {
    sql.replace('?', "??")
}

async fn fetch_json_rows(client: Client, sql: &str) -> Result<RowSet, StoreError> {
    log::debug!("Executing SQL:\n{}", sql);

    let mut lines = client
        .query(&escape_placeholders(sql))
        .fetch_bytes("JSONEachRow")
        .map_err(|e| {
            log::error!("ClickHouse query failed. SQL was:\n{}\nError: {}", sql, e);
            StoreError::Query(e.to_string())
        })?
        .lines();

    let mut rows = RowSet::new();
    while let Some(line) = lines.next_line().await.map_err(|e| {
        log::error!(
            "ClickHouse response read failed. SQL was:\n{}\nError: {}",
            sql,
            e
        );
        StoreError::Query(e.to_string())
    })? {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(decode_row(&line)?);
    }

    Ok(rows)
}

fn decode_row(line: &str) -> Result<super::Row, StoreError> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Decode(format!(
            "expected a JSON object per row, got: {}",
            other
        ))),
        Err(e) => Err(StoreError::Decode(e.to_string())),
    }
}
