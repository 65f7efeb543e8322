//! Chart type and axis selection
//!
//! Rules are hard, not scored: a trend question or any time-like column
//! means a line chart, everything else is a bar chart. Axis keys come from
//! explicit hint keys first, heuristics fill the gaps.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::intent::detect_trend_intent;
use super::GraphError;
use crate::store::{Row, RowSet};

lazy_static! {
    static ref TIME_COLUMN: Regex =
        Regex::new(r"(?i)date|time|timestamp|created|updated|day|month|year").unwrap();
    static ref VALUE_COLUMN: Regex =
        Regex::new(r"(?i)amount|price|total|value|quantity|qty|balance").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(ChartType::Bar),
            "line" => Some(ChartType::Line),
            _ => None,
        }
    }

    pub fn default_reason(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar chart selected for categorical comparisons.",
            ChartType::Line => "Line chart selected for time-based or trend data.",
        }
    }
}

/// Which columns go on which axis. Absent keys serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMapping {
    pub x_key: Option<String>,
    pub y_key: Option<String>,
    pub y_keys: Option<Vec<String>>,
    pub series_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDecision {
    pub chart_type: ChartType,
    pub reason: String,
    pub mapping: GraphMapping,
}

/// Keys decided before the heuristics run (for example by a model hint).
/// Every set key must name a result column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphHint {
    pub chart_type: Option<ChartType>,
    pub reason: Option<String>,
    pub x_key: Option<String>,
    pub y_key: Option<String>,
    pub y_keys: Option<Vec<String>>,
    pub series_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Categorical,
    Unknown,
}

fn is_numeric_value(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        // ClickHouse quotes 64-bit integers and decimals in JSON output
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && s.parse::<f64>().map(f64::is_finite).unwrap_or(false)
        }
        _ => false,
    }
}

/// Classify by the first non-null value of the column; all-null columns are neither kind.
fn classify_column(rows: &RowSet, column: &str) -> ColumnKind {
    let sample = rows
        .iter()
        .filter_map(|row| row.get(column))
        .find(|value| !value.is_null());

    match sample {
        None => ColumnKind::Unknown,
        Some(value) if is_numeric_value(value) => ColumnKind::Numeric,
        Some(_) => ColumnKind::Categorical,
    }
}

fn probe_row(rows: &RowSet) -> Option<&Row> {
    rows.iter().find(|row| !row.is_empty())
}

fn check_key(columns: &[&str], key: &Option<String>) -> Result<(), GraphError> {
    match key {
        Some(key) if !columns.contains(&key.as_str()) => {
            Err(GraphError::UnknownColumn { key: key.clone() })
        }
        _ => Ok(()),
    }
}

/// Pick chart type and axis mapping for `rows`.
///
/// An empty row set is not an error: the decision comes back with every
/// axis key `None`. Hint keys that are not columns of the probe row are.
pub fn select_graph_configuration(
    question: &str,
    rows: &RowSet,
    hint: &GraphHint,
) -> Result<GraphDecision, GraphError> {
    let wants_trend = detect_trend_intent(question);

    let Some(probe) = probe_row(rows) else {
        let chart_type = hint.chart_type.unwrap_or(if wants_trend {
            ChartType::Line
        } else {
            ChartType::Bar
        });
        return Ok(GraphDecision {
            chart_type,
            reason: hint
                .reason
                .clone()
                .unwrap_or_else(|| chart_type.default_reason().to_string()),
            mapping: GraphMapping::default(),
        });
    };

    let columns: Vec<&str> = probe.keys().map(|k| k.as_str()).collect();

    check_key(&columns, &hint.x_key)?;
    check_key(&columns, &hint.y_key)?;
    check_key(&columns, &hint.series_key)?;
    for key in hint.y_keys.iter().flatten() {
        check_key(&columns, &Some(key.clone()))?;
    }

    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for column in &columns {
        match classify_column(rows, column) {
            ColumnKind::Numeric => numeric.push(*column),
            ColumnKind::Categorical => categorical.push(*column),
            ColumnKind::Unknown => {}
        }
    }
    let time_like: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| TIME_COLUMN.is_match(c))
        .collect();

    let chart_type = hint.chart_type.unwrap_or(if wants_trend || !time_like.is_empty() {
        ChartType::Line
    } else {
        ChartType::Bar
    });

    let x_key = hint.x_key.clone().or_else(|| {
        time_like
            .first()
            .or(categorical.first())
            .or(columns.first())
            .map(|c| c.to_string())
    });

    // The x axis is not excluded: without a value-named column the first
    // numeric column wins even when it is the time column already on x.
    let y_key = hint.y_key.clone().or_else(|| {
        numeric
            .iter()
            .find(|c| VALUE_COLUMN.is_match(c))
            .or(numeric.first())
            .map(|c| c.to_string())
    });

    let y_keys = hint.y_keys.clone().or_else(|| {
        if hint.y_key.is_none() && numeric.len() > 1 {
            Some(numeric.iter().map(|c| c.to_string()).collect())
        } else {
            None
        }
    });

    let series_key = hint
        .series_key
        .clone()
        .or_else(|| categorical.get(1).map(|c| c.to_string()));

    Ok(GraphDecision {
        chart_type,
        reason: hint
            .reason
            .clone()
            .unwrap_or_else(|| chart_type.default_reason().to_string()),
        mapping: GraphMapping {
            x_key,
            y_key,
            y_keys,
            series_key,
        },
    })
}
