//! TestWorld pattern for declarative integration test setup.
//!
//! Creates a temporary runs directory, writes run folders into it and runs
//! the CLI against it with a clean environment.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::{SpanLine, jsonl};

pub struct TestWorld {
    temp_dir: TempDir,
    runs_dir: PathBuf,
    env_vars: HashMap<String, String>,
}

impl TestWorld {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let runs_dir = temp_dir.path().join(".agk").join("runs");
        fs::create_dir_all(&runs_dir)?;
        Ok(Self {
            temp_dir,
            runs_dir,
            env_vars: HashMap::new(),
        })
    }

    pub fn runs_dir(&self) -> &Path {
        &self.runs_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.runs_dir.join(run_id)
    }

    pub fn trace_path(&self, run_id: &str) -> PathBuf {
        self.run_dir(run_id).join("trace.jsonl")
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Create `<runs>/<run_id>/trace.jsonl` with the given records.
    pub fn add_run(&self, run_id: &str, lines: &[SpanLine]) -> Result<PathBuf> {
        let dir = self.run_dir(run_id);
        fs::create_dir_all(&dir)?;
        let path = dir.join("trace.jsonl");
        fs::write(&path, jsonl(lines))?;
        Ok(path)
    }

    /// Write raw file content, for malformed or partial traces.
    pub fn add_raw_run(&self, run_id: &str, content: &str) -> Result<PathBuf> {
        let dir = self.run_dir(run_id);
        fs::create_dir_all(&dir)?;
        let path = dir.join("trace.jsonl");
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn add_manifest(&self, run_id: &str, manifest: &serde_json::Value) -> Result<()> {
        let dir = self.run_dir(run_id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("manifest.json"), serde_json::to_vec_pretty(manifest)?)?;
        Ok(())
    }

    /// Append to an existing trace the way a live writer would.
    pub fn append(&self, run_id: &str, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.trace_path(run_id))?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--runs-dir").arg(&self.runs_dir);
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("TRACELENS_RUNS_DIR");
        cmd.env_remove("TRACELENS_CONFIG");
        cmd.env_remove("TRACELENS_LOG");
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd
    }

    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("tracelens")
            .map_err(|e| anyhow::anyhow!("Failed to find tracelens binary: {}", e))?;
        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;
        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
