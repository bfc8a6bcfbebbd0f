use anyhow::Result;
use tracelens_runtime::{Config, LiveTrace, RunStore};

use super::resolve_run;
use crate::tui::{self, Explorer};

/// Open one run in the explorer and keep tailing its trace file.
pub fn handle(store: &RunStore, config: &Config, run_id: Option<&str>) -> Result<()> {
    let Some(run_id) = resolve_run(store, run_id)? else {
        return Ok(());
    };
    let manifest = store.manifest(&run_id)?;
    let trace = LiveTrace::open(store.trace_path(&run_id))?;

    tracing::info!(run_id = %run_id, spans = trace.spans().len(), "opening live explorer");
    tui::run(Explorer::single(run_id, manifest, trace), config.poll_interval())
}
