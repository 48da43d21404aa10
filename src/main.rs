// Entrypoint for the `vapor` CLI.
// - Keeps `main` small: parse arguments, set up logging, dispatch to `ui`.
// - Returns `anyhow::Result` so any error prints and exits nonzero.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vapor_toolbox::api::ApiClient;
use vapor_toolbox::cli::{Cli, Command};
use vapor_toolbox::ui;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resource { name, force } => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            ui::run_resource(&cwd, &name, force)?;
        }
        Command::Cloud { command } => {
            // Base URL comes from `VAPOR_CLOUD_API_URL` when set.
            let api = ApiClient::from_env().context("Failed to build HTTP client")?;
            ui::run_cloud(&api, command)?;
        }
    }
    Ok(())
}

/// Log to stderr. `RUST_LOG` wins unless `--verbose` asks for debug output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,vapor_toolbox=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
