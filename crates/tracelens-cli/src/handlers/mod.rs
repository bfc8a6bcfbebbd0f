pub mod audit;
pub mod explore;
pub mod export;
pub mod list;
pub mod mermaid;
pub mod show;
pub mod view;

use anyhow::Result;
use tracelens_runtime::{Error, RunStore};

pub const NO_TRACES_HINT: &str = "No traces found. Run with AGK_TRACE=true to generate traces.";

/// Named run, or the latest one. `None` after printing the hint when the
/// runs directory holds nothing.
pub(crate) fn resolve_run(store: &RunStore, run_id: Option<&str>) -> Result<Option<String>> {
    match store.resolve(run_id) {
        Ok(id) => Ok(Some(id)),
        Err(Error::NoRuns(dir)) => {
            tracing::debug!(runs_dir = %dir.display(), "no runs to resolve");
            println!("{}", NO_TRACES_HINT);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
