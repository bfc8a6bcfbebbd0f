use anyhow::Result;
use tracelens_runtime::{Config, RunStore};

use super::NO_TRACES_HINT;
use crate::tui::{self, Explorer};

/// Browse every run. Runs are loaded whole when opened and are not tailed.
pub fn handle(store: &RunStore, config: &Config) -> Result<()> {
    let runs = store.list_runs()?;
    if runs.is_empty() {
        println!("{}", NO_TRACES_HINT);
        return Ok(());
    }

    tracing::info!(runs = runs.len(), "opening explorer");
    tui::run(Explorer::with_runs(store.clone(), runs), config.poll_interval())
}
