//! Testing infrastructure for tracelens integration tests.
//!
//! - `fixtures`: span-line builders and canned traces
//! - `world`: `TestWorld`, an isolated runs directory plus CLI runner

pub mod fixtures;
pub mod world;

pub use fixtures::SpanLine;
pub use world::{CliResult, TestWorld};
