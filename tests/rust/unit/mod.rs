//! Unit tests - pure functions only, no store and no model

mod graph_selection_tests;
mod property_tests;
mod query_text_tests;
