//! Schema introspection
//!
//! Builds a table → columns map from the store's catalog. Rebuilt for every
//! request and never cached, so it always reflects the catalog at call time.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaMap {
    tables: BTreeMap<String, Vec<ColumnInfo>>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_column(&mut self, table: &str, column: ColumnInfo) {
        self.tables.entry(table.to_string()).or_default().push(column);
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }

    pub fn columns(&self, table: &str) -> Option<&[ColumnInfo]> {
        self.tables.get(table).map(|c| c.as_slice())
    }

    /// Resolve a table name to the catalog's spelling: exact match first,
    /// then case-insensitive.
    pub fn resolve_table(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.tables.get_key_value(name) {
            return Some(key.as_str());
        }
        self.tables
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .map(|k| k.as_str())
    }

    /// "Table X has columns: c1: t1, c2: t2" per table, newline-joined
    pub fn describe(&self) -> String {
        self.tables
            .iter()
            .map(|(table, columns)| {
                format!("Table {} has columns: {}", table, describe_columns(columns))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn describe_table(&self, table: &str) -> Option<String> {
        self.columns(table).map(describe_columns)
    }
}

fn describe_columns(columns: &[ColumnInfo]) -> String {
    columns
        .iter()
        .map(|c| format!("{}: {}", c.name, c.data_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read the catalog and group it by table, ordered by table name then column position.
pub async fn introspect(store: &dyn Store) -> Result<SchemaMap, StoreError> {
    let mut columns = store.catalog_columns().await?;
    // The store is asked for this order already; a fake or a proxy may not honour it
    columns.sort_by(|a, b| a.table.cmp(&b.table).then(a.position.cmp(&b.position)));

    let mut schema = SchemaMap::new();
    for column in columns {
        schema.insert_column(
            &column.table,
            ColumnInfo {
                name: column.name,
                data_type: column.data_type,
            },
        );
    }

    log::debug!("Introspected {} tables", schema.len());
    Ok(schema)
}
