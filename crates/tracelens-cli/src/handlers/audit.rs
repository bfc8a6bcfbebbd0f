use anyhow::Result;
use tracelens_engine::{TraceObject, summarize_run};
use tracelens_runtime::RunStore;

use super::resolve_run;

pub fn handle(store: &RunStore, run_id: Option<&str>, path_only: bool) -> Result<()> {
    let Some(run_id) = resolve_run(store, run_id)? else {
        return Ok(());
    };
    let spans = store.read_spans(&run_id)?;
    let run = match store.sidecar(&run_id)? {
        Some(run) => run,
        None => summarize_run(&run_id, &spans),
    };
    let trace = TraceObject::collect(run_id, &spans).with_run(&run);

    if path_only {
        for event_type in trace.reasoning_path() {
            println!("{}", event_type);
        }
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&trace)?);
    Ok(())
}
