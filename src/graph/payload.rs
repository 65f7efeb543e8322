//! The `graph` field of a successful response

use serde::Serialize;

use super::selector::{ChartType, GraphDecision, GraphMapping};
use crate::store::RowSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphTemplate {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub description: &'static str,
}

impl GraphTemplate {
    pub fn for_type(chart_type: ChartType) -> Self {
        let description = match chart_type {
            ChartType::Bar => {
                "Compare values across categories using vertical bars. Best when you have \
                 categorical x values and numeric y values."
            }
            ChartType::Line => {
                "Show trends over an ordered dimension (e.g., time) with a line connecting \
                 data points."
            }
        };
        Self {
            chart_type,
            description,
        }
    }
}

/// `{"required": false}` when no chart was asked for (or it could not be
/// built); otherwise the chart type, mapping and the rows to plot. A
/// required payload with `null` axis keys is valid and means "asked for,
/// nothing to draw".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPayload {
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<GraphTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<GraphMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RowSet>,
}

impl GraphPayload {
    pub fn not_required() -> Self {
        Self {
            required: false,
            chart_type: None,
            reason: None,
            template: None,
            mapping: None,
            data: None,
        }
    }

    pub fn from_decision(decision: GraphDecision, rows: RowSet) -> Self {
        Self {
            required: true,
            chart_type: Some(decision.chart_type),
            reason: Some(decision.reason),
            template: Some(GraphTemplate::for_type(decision.chart_type)),
            mapping: Some(decision.mapping),
            data: Some(rows),
        }
    }
}
