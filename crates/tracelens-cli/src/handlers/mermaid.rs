use std::path::Path;

use anyhow::{Context, Result};
use tracelens_engine::TraceObject;
use tracelens_runtime::RunStore;

use super::resolve_run;
use crate::presentation::report::mermaid_document;

pub fn handle(store: &RunStore, run_id: Option<&str>, output: Option<&Path>) -> Result<()> {
    let Some(run_id) = resolve_run(store, run_id)? else {
        return Ok(());
    };
    let spans = store.read_spans(&run_id)?;
    let document = mermaid_document(&TraceObject::collect(run_id, &spans));

    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✅ Generated Mermaid diagram: {}", path.display());
        }
        None => println!("{}", document),
    }
    Ok(())
}
