use anyhow::Result;
use tracelens_runtime::RunStore;

use super::resolve_run;
use crate::args::OutputFormat;
use crate::presentation::{Styler, report};

pub fn handle(store: &RunStore, run_id: Option<&str>, format: OutputFormat) -> Result<()> {
    let Some(run_id) = resolve_run(store, run_id)? else {
        return Ok(());
    };
    let run = store.manifest(&run_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
        OutputFormat::Plain => println!(
            "{}",
            report::run_report(&run, &store.run_path(&run_id), &Styler::stdout())
        ),
    }
    Ok(())
}
