// NOTE: Wire Format
//
// Trace files are newline-delimited JSON, one span per line, in the shape
// emitted by the OpenTelemetry stdout exporter (PascalCase keys, attribute
// values wrapped in a `{"Type", "Value"}` envelope). Types here mirror that
// shape closely so the file stays the single source of truth; everything
// derived (tree, metrics, audit events) lives in tracelens-engine.

pub mod attribute;
pub mod keys;
pub mod manifest;
pub mod parser;
pub mod span;

pub use attribute::{Attribute, AttributeEnvelope, AttributeValue};
pub use manifest::TraceRun;
pub use parser::{ParseReport, parse_lines, parse_str};
pub use span::{ROOT_PARENT_SENTINEL, Span, SpanContext, SpanKind, SpanStatus, parse_timestamp};
