// NOTE: Engine Boundaries
//
// Everything in this crate is a pure function of a span list: no file access,
// no clocks, no logging. The runtime crate owns I/O and the CLI owns the
// terminal. Keeping the engine total (no Result anywhere) means a damaged or
// half-written trace always produces a usable, partial view.

pub mod audit;
pub mod diagram;
pub mod export;
pub mod metrics;
pub mod summary;
pub mod tree;

pub use audit::{EventType, TraceEvent, TraceObject, TraceSummary, classify};
pub use metrics::{ESTIMATED_COST_PER_TOKEN, TraceMetrics, estimate_cost, span_tokens};
pub use summary::summarize_run;
pub use tree::{NodeId, SpanNode, SpanTree};
