//! Console output for the non-interactive commands.
//!
//! Everything here returns strings; handlers decide where they go.

pub mod format;
pub mod report;
pub mod style;

pub use style::Styler;
