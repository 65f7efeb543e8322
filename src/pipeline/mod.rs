//! The question-answering pipeline
//!
//! One request runs one strictly sequential chain:
//! identity and prompt checks → graph intent → schema → relevant table →
//! content sample → query synthesis → sanitizing → read-only guard →
//! execution → interpretation → (graph evaluation).
//!
//! Nothing is cached between requests; schema and samples are re-read every
//! time so scoping always reflects the caller.

pub mod errors;
pub mod identity;
pub mod interpreter;
pub mod orchestrator;
pub mod prompts;
pub mod query_guard;
pub mod relevance;
pub mod sampler;
pub mod sanitizer;
pub mod schema;
pub mod synthesizer;

pub use errors::{PipelineError, Stage, UpstreamSource};
pub use identity::Identity;
pub use orchestrator::{Pipeline, PipelineAnswer};
pub use query_guard::{check_read_only, GuardViolation};
pub use sanitizer::sanitize_query;
pub use schema::{introspect, ColumnInfo, SchemaMap};
