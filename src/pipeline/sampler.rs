//! Content sampling
//!
//! A bounded row preview of one table. Column names and types alone do not
//! tell the model what `price` versus `amount` hold; example values do.

use crate::store::{RowSet, Store, StoreError};
use crate::utils::text::truncate_chars;

#[derive(Debug, Clone)]
pub struct ContentSample {
    pub rows: RowSet,
    /// Newline-delimited compact JSON rows, cut to the character budget
    pub text: String,
}

/// Backtick-quote an identifier for ClickHouse.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
}

pub fn sample_query(table: &str, limit: u32) -> String {
    format!("SELECT * FROM {} LIMIT {}", quote_identifier(table), limit)
}

/// Render rows one compact JSON object per line and truncate.
pub fn render_rows(rows: &RowSet, char_budget: usize) -> String {
    let mut text = String::new();
    for row in rows {
        // A Map<String, Value> always serializes
        let line = serde_json::to_string(row).unwrap_or_default();
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&line);
        if text.chars().count() >= char_budget {
            break;
        }
    }
    truncate_chars(&text, char_budget).to_string()
}

pub async fn sample_table(
    store: &dyn Store,
    table: &str,
    limit: u32,
    char_budget: usize,
) -> Result<ContentSample, StoreError> {
    let rows = store.fetch_rows(&sample_query(table, limit)).await?;
    let text = render_rows(&rows, char_budget);
    log::debug!(
        "Sampled {} rows from {} ({} chars)",
        rows.len(),
        table,
        text.chars().count()
    );
    Ok(ContentSample { rows, text })
}
