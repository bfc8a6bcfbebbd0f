//! Run directory layout.
//!
//! ```text
//! <runs_dir>/
//!   run-20260101-research/
//!     trace.jsonl      one span per line, appended while the run executes
//!     manifest.json    optional summary written when the run finishes
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracelens_engine::summarize_run;
use tracelens_types::{Span, TraceRun, parse_lines};
use walkdir::WalkDir;

use crate::{Error, Result};

pub const TRACE_FILE: &str = "trace.jsonl";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const RUN_PREFIX: &str = "run-";

#[derive(Debug, Clone)]
pub struct RunEntry {
    pub id: String,
    pub path: PathBuf,
    pub run: TraceRun,
}

#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run_path(&self, run_id: &str) -> PathBuf {
        self.root.join(run_id)
    }

    pub fn trace_path(&self, run_id: &str) -> PathBuf {
        self.run_path(run_id).join(TRACE_FILE)
    }

    fn manifest_path(&self, run_id: &str) -> PathBuf {
        self.run_path(run_id).join(MANIFEST_FILE)
    }

    /// Every run directory holding a manifest or a trace log, newest first.
    /// A missing runs directory is an empty list.
    pub fn list_runs(&self) -> Result<Vec<RunEntry>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable run entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !self.manifest_path(&id).exists() && !self.trace_path(&id).exists() {
                continue;
            }
            match self.manifest(&id) {
                Ok(run) => entries.push(RunEntry {
                    path: entry.path().to_path_buf(),
                    id,
                    run,
                }),
                Err(e) => tracing::warn!(run_id = %id, error = %e, "skipping unreadable run"),
            }
        }

        entries.sort_by(|a, b| {
            b.run
                .start_time
                .cmp(&a.run.start_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    /// Most recently modified `run-*` directory.
    pub fn latest_run_id(&self) -> Result<Option<String>> {
        if !self.root.is_dir() {
            return Ok(None);
        }

        let mut latest: Option<(SystemTime, String)> = None;
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !name.starts_with(RUN_PREFIX) {
                continue;
            }
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if latest.as_ref().is_none_or(|(t, _)| modified > *t) {
                latest = Some((modified, name.to_string()));
            }
        }
        Ok(latest.map(|(_, id)| id))
    }

    /// Manifest sidecar, or a summary synthesized from the span log.
    pub fn manifest(&self, run_id: &str) -> Result<TraceRun> {
        if let Some(run) = self.sidecar(run_id)? {
            return Ok(run);
        }

        tracing::debug!(run_id, "no manifest sidecar, synthesizing run summary");
        let spans = self.read_spans(run_id)?;
        Ok(summarize_run(run_id, &spans))
    }

    /// The run's `manifest.json` alone. `None` when it is missing or invalid.
    pub fn sidecar(&self, run_id: &str) -> Result<Option<TraceRun>> {
        let path = self.manifest_path(run_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        match serde_json::from_str::<TraceRun>(&content) {
            Ok(mut run) => {
                if run.run_id.is_empty() {
                    run.run_id = run_id.to_string();
                }
                Ok(Some(run))
            }
            Err(e) => {
                tracing::warn!(run_id, error = %e, "invalid manifest, summarizing trace instead");
                Ok(None)
            }
        }
    }

    pub fn read_spans(&self, run_id: &str) -> Result<Vec<Span>> {
        let path = self.trace_path(run_id);
        if !self.run_path(run_id).is_dir() {
            return Err(Error::RunNotFound(run_id.to_string()));
        }
        let file = std::fs::File::open(&path).map_err(|e| Error::io(&path, e))?;
        let report = parse_lines(std::io::BufReader::new(file));
        if report.skipped > 0 {
            tracing::warn!(run_id, skipped = report.skipped, "dropped malformed trace lines");
        }
        Ok(report.spans)
    }

    /// Pick the requested run, or the latest one when none is named.
    pub fn resolve(&self, run_id: Option<&str>) -> Result<String> {
        match run_id {
            Some(id) => {
                if self.run_path(id).is_dir() {
                    Ok(id.to_string())
                } else {
                    Err(Error::RunNotFound(id.to_string()))
                }
            }
            None => self
                .latest_run_id()?
                .ok_or_else(|| Error::NoRuns(self.root.clone())),
        }
    }
}
