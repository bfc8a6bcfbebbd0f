use super::args::{Cli, Commands};
use super::handlers;
use crate::telemetry;
use anyhow::Result;
use tracelens_runtime::config::resolve_runs_dir;
use tracelens_runtime::{Config, RunStore};

pub fn run(cli: Cli) -> Result<()> {
    let interactive = matches!(cli.command, None | Some(Commands::Explore | Commands::Show { .. }));
    if interactive {
        telemetry::init_tui_tracing(cli.log_level);
    } else {
        telemetry::init_cli_tracing(cli.log_level);
    }

    let config = Config::load(cli.config.as_deref())?;
    let runs_dir = resolve_runs_dir(cli.runs_dir.as_deref(), &config);
    tracing::debug!(runs_dir = %runs_dir.display(), "resolved runs directory");
    let store = RunStore::new(runs_dir);

    let command = cli.command.unwrap_or(Commands::Explore);

    match command {
        Commands::Explore => handlers::explore::handle(&store, &config),

        Commands::Show { run_id } => handlers::show::handle(&store, &config, run_id.as_deref()),

        Commands::List { format } => handlers::list::handle(&store, format),

        Commands::View { run_id, format } => {
            handlers::view::handle(&store, run_id.as_deref(), format)
        }

        Commands::Export {
            run_id,
            format,
            output,
        } => handlers::export::handle(&store, run_id.as_deref(), format, output.as_deref()),

        Commands::Audit { run_id, path } => handlers::audit::handle(&store, run_id.as_deref(), path),

        Commands::Mermaid { run_id, output } => {
            handlers::mermaid::handle(&store, run_id.as_deref(), output.as_deref())
        }
    }
}
