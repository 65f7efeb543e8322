//! Integration tests - the pipeline and HTTP surface wired to in-memory
//! stand-ins for ClickHouse and the completion service.

mod server_tests;
mod support;
