use anyhow::Result;
use tracelens_runtime::RunStore;

use super::NO_TRACES_HINT;
use crate::args::OutputFormat;
use crate::presentation::{Styler, report};

pub fn handle(store: &RunStore, format: OutputFormat) -> Result<()> {
    let entries = store.list_runs()?;

    if format == OutputFormat::Json {
        let runs: Vec<_> = entries.iter().map(|e| &e.run).collect();
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", NO_TRACES_HINT);
        return Ok(());
    }

    print!("{}", report::run_table(&entries, &Styler::stdout()));
    println!();
    Ok(())
}
