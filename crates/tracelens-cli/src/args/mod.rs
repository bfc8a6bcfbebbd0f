// NOTE: Command Organization Rationale
//
// Why flat subcommands (not namespaced)?
// - Every command operates on one run directory; there is nothing to group
// - `tracelens show` / `tracelens audit` read naturally at the prompt
//
// Why is RUN_ID optional everywhere?
// - The common case is "the run that just finished", i.e. the latest one

mod enums;

pub use enums::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tracelens")]
#[command(about = "Explore, audit and diagram agent execution traces", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Directory holding run-* folders")]
    pub runs_dir: Option<String>,

    #[arg(long, global = true, help = "Path to config.toml")]
    pub config: Option<String>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Browse all runs interactively")]
    Explore,

    #[command(about = "List recorded runs, newest first")]
    List {
        #[arg(long, default_value = "plain", help = "Output format")]
        format: OutputFormat,
    },

    #[command(about = "Open one run in the explorer and follow it while it grows")]
    Show {
        #[arg(help = "Run id (defaults to the latest run)")]
        run_id: Option<String>,
    },

    #[command(about = "Print run information and statistics")]
    View {
        run_id: Option<String>,

        #[arg(long, default_value = "plain", help = "Output format")]
        format: OutputFormat,
    },

    #[command(about = "Export spans as raw JSON, Jaeger or OTLP")]
    Export {
        run_id: Option<String>,

        #[arg(long, default_value = "json")]
        format: ExportFormat,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    #[command(about = "Classify spans into a reasoning audit trail")]
    Audit {
        run_id: Option<String>,

        #[arg(long, help = "Print only the reasoning path, one event type per line")]
        path: bool,
    },

    #[command(about = "Render the run as a Mermaid flowchart")]
    Mermaid {
        run_id: Option<String>,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
