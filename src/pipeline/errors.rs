//! # Pipeline Error Types
//!
//! A closed set of error kinds the orchestrator dispatches on. Upstream
//! failures carry the stage that was being entered, so nothing downstream
//! has to inspect error text to tell a catalog failure from a bad query.

use std::fmt;

use thiserror::Error;

use super::query_guard::GuardViolation;
use crate::llm::LlmError;
use crate::store::StoreError;

/// Request lifecycle states, in the order a request moves through them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Received,
    IntentChecked,
    SchemaLoaded,
    TableSelected,
    ContentSampled,
    QuerySynthesized,
    QuerySanitized,
    QueryExecuted,
    ResultInterpreted,
    GraphEvaluated,
    Responded,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "RECEIVED",
            Stage::IntentChecked => "INTENT_CHECKED",
            Stage::SchemaLoaded => "SCHEMA_LOADED",
            Stage::TableSelected => "TABLE_SELECTED",
            Stage::ContentSampled => "CONTENT_SAMPLED",
            Stage::QuerySynthesized => "QUERY_SYNTHESIZED",
            Stage::QuerySanitized => "QUERY_SANITIZED",
            Stage::QueryExecuted => "QUERY_EXECUTED",
            Stage::ResultInterpreted => "RESULT_INTERPRETED",
            Stage::GraphEvaluated => "GRAPH_EVALUATED",
            Stage::Responded => "RESPONDED",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What failed underneath an upstream error
#[derive(Debug, Error)]
pub enum UpstreamSource {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Not authenticated")]
    AuthenticationMissing,

    #[error("Prompt is required")]
    EmptyPrompt,

    #[error("Relevant table could not be determined: the model returned no table name")]
    RelevanceUnresolved,

    #[error("Model selected table `{name}`, which is not in the schema")]
    UnknownTable { name: String },

    #[error("Generated query rejected: {violation}")]
    UnsafeQuery {
        query: String,
        violation: GuardViolation,
    },

    #[error("Failed before {stage}: {source}")]
    Upstream {
        stage: Stage,
        #[source]
        source: UpstreamSource,
    },
}

impl PipelineError {
    pub fn upstream(stage: Stage, source: impl Into<UpstreamSource>) -> Self {
        PipelineError::Upstream {
            stage,
            source: source.into(),
        }
    }

    /// Short message safe to show the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::AuthenticationMissing => "Not authenticated",
            PipelineError::EmptyPrompt => "Prompt is required",
            PipelineError::RelevanceUnresolved | PipelineError::UnknownTable { .. } => {
                "Could not determine relevant data for your query"
            }
            PipelineError::UnsafeQuery { .. } => "The generated query was rejected as unsafe",
            PipelineError::Upstream { .. } => "Error processing your query",
        }
    }

    /// Diagnostic detail for the failure response, when there is any
    pub fn details(&self) -> Option<String> {
        match self {
            PipelineError::AuthenticationMissing | PipelineError::EmptyPrompt => None,
            PipelineError::RelevanceUnresolved => None,
            PipelineError::UnknownTable { name } => {
                Some(format!("table `{}` does not exist", name))
            }
            PipelineError::UnsafeQuery { violation, .. } => Some(violation.to_string()),
            PipelineError::Upstream { source, .. } => Some(source.to_string()),
        }
    }
}
