//! Cheap keyword checks on the question. No model call.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GRAPH_INTENT: Regex =
        Regex::new(r"\b(graph|chart|plot|visuali[sz]e|bar chart|line chart)\b").unwrap();
    // Substring match on purpose: "evolving", "yearly" and "dates" all count
    static ref TREND_INTENT: Regex = Regex::new(
        r"over time|trend|history|daily|monthly|weekly|timeline|progress|evolv|increase|decrease|date|time|day|month|year"
    )
    .unwrap();
}

/// True only when the user explicitly asks for a chart.
pub fn detect_graph_intent(question: &str) -> bool {
    GRAPH_INTENT.is_match(&question.to_lowercase())
}

pub fn detect_trend_intent(question: &str) -> bool {
    TREND_INTENT.is_match(&question.to_lowercase())
}
