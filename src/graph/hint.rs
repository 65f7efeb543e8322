//! Optional coarse chart decision from the model
//!
//! The reply is parsed leniently (fences, prose around the object) and every
//! key that does not name a result column is dropped, so the selector only
//! ever sees keys it can honour.

use serde_json::Value;

use super::selector::{ChartType, GraphHint};
use crate::llm::{LlmError, LlmStage};
use crate::store::RowSet;
use crate::utils::json_extract::parse_json_content;
use crate::utils::text::truncate_chars;

const PREVIEW_ROWS: usize = 5;
const PREVIEW_CHARS: usize = 1000;

const GRAPH_HINT_SYSTEM: &str = r#"You choose how to chart query results. Only two chart types exist:
- "bar": compare values across categories
- "line": show trends over an ordered dimension such as time

Return ONLY a JSON object of the form:
{"type": "bar" | "line", "xKey": "<column>", "yKey": "<numeric column>", "reason": "<one sentence>"}
Use only column names from the list you are given."#;

fn hint_user_prompt(question: &str, columns: &[&str], rows: &RowSet) -> String {
    let preview: Vec<_> = rows.iter().take(PREVIEW_ROWS).collect();
    let preview = serde_json::to_string(&preview).unwrap_or_default();
    format!(
        "Question: {}\nColumns: {}\nFirst rows: {}",
        question,
        columns.join(", "),
        truncate_chars(&preview, PREVIEW_CHARS)
    )
}

fn result_columns(rows: &RowSet) -> Vec<&str> {
    rows.iter()
        .find(|row| !row.is_empty())
        .map(|row| row.keys().map(|k| k.as_str()).collect())
        .unwrap_or_default()
}

/// Build a hint from a parsed reply, keeping only keys in `columns`.
pub fn hint_from_value(value: &Value, columns: &[&str]) -> GraphHint {
    let column = |field: &str| {
        value
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|key| columns.contains(key))
            .map(str::to_string)
    };

    let y_keys = value.get("yKeys").and_then(Value::as_array).map(|keys| {
        keys.iter()
            .filter_map(Value::as_str)
            .filter(|key| columns.contains(key))
            .map(str::to_string)
            .collect::<Vec<_>>()
    });

    GraphHint {
        chart_type: value
            .get("type")
            .and_then(Value::as_str)
            .and_then(ChartType::parse),
        reason: value
            .get("reason")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        x_key: column("xKey"),
        y_key: column("yKey"),
        y_keys: y_keys.filter(|keys| !keys.is_empty()),
        series_key: column("seriesKey"),
    }
}

/// One model call for a coarse chart decision.
///
/// An empty result set yields an empty hint without calling the model.
pub async fn request_graph_hint(
    stage: LlmStage<'_>,
    question: &str,
    rows: &RowSet,
) -> Result<GraphHint, LlmError> {
    let columns = result_columns(rows);
    if columns.is_empty() {
        return Ok(GraphHint::default());
    }

    let reply = stage
        .complete(
            GRAPH_HINT_SYSTEM.to_string(),
            hint_user_prompt(question, &columns, rows),
        )
        .await?;

    let value = parse_json_content(&reply)
        .ok_or_else(|| LlmError::Decode(format!("no JSON object in graph hint: {}", reply)))?;
    Ok(hint_from_value(&value, &columns))
}
