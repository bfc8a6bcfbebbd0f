use std::path::Path;

use anyhow::{Context, Result};
use tracelens_engine::export::{to_jaeger, to_otlp};
use tracelens_runtime::RunStore;

use super::resolve_run;
use crate::args::ExportFormat;

pub fn handle(
    store: &RunStore,
    run_id: Option<&str>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let Some(run_id) = resolve_run(store, run_id)? else {
        return Ok(());
    };
    let spans = store.read_spans(&run_id)?;

    let document = match format {
        ExportFormat::Json => serde_json::to_value(&spans)?,
        ExportFormat::Jaeger => to_jaeger(&spans),
        ExportFormat::Otlp => to_otlp(&spans),
    };
    let text = serde_json::to_string_pretty(&document)?;

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "✅ Exported trace to {} (format: {})",
                path.display(),
                format
            );
        }
        None => println!("{}", text),
    }
    Ok(())
}
