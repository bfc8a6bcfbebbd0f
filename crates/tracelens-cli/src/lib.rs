// NOTE: tracelens Architecture Rationale
//
// Why read the trace file directly (no index, no daemon)?
// - A run writes one trace.jsonl; the file is the source of truth
// - Anything derived (tree, metrics, audit, diagram) is cheap to recompute
// - Trade-off: large traces are re-read on every open, acceptable per run
//
// Why rebuild everything on each live-tail tick?
// - Late parents can re-home earlier orphans; patching the forest in place
//   would have to replay that logic
// - Rebuilding keeps tree shape and metrics consistent by construction
// - UI state (collapse, cursor, search) is carried across by SpanID
//
// Why a single-threaded TUI loop?
// - The only background work is one file poll per tick
// - Polling inline means at most one read is ever in flight

mod args;
mod commands;
mod handlers;
pub mod presentation;
pub mod telemetry;
pub mod tui;

pub use args::{Cli, Commands, ExportFormat, LogLevel, OutputFormat};
pub use commands::run;
