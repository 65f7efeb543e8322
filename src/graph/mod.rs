//! Chart inference from result rows
//!
//! Charts are opt-in: nothing here runs unless the question asks for one.
//! Only two families exist, bar and line, and the axis mapping is derived
//! from column names and observed values since the result shape is unknown
//! until the query has run.

use thiserror::Error;

pub mod hint;
pub mod intent;
pub mod payload;
pub mod selector;

pub use intent::{detect_graph_intent, detect_trend_intent};
pub use payload::{GraphPayload, GraphTemplate};
pub use selector::{select_graph_configuration, ChartType, GraphDecision, GraphHint, GraphMapping};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Graph key `{key}` does not name a result column")]
    UnknownColumn { key: String },
}
