//! AskDB - Natural-language questions over a user's own rows in ClickHouse
//!
//! This crate turns a free-text question into an identity-scoped, read-only
//! SQL query through a chain of LLM calls:
//! - Catalog introspection and relevant-table selection
//! - Content sampling to ground the model in real values
//! - Query synthesis, sanitization and a read-only guard
//! - Result interpretation in plain language
//! - Opt-in chart inference from the shape of the result rows

pub mod config;
pub mod graph;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod store;
pub mod utils;
