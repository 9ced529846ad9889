use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vdc_cli::commands::{manual, menu, report, scan};
use vdc_cli::console::Console;
use vdc_cli::{Cli, Commands, Config};

/// Destination for progress output. With `--json`, stdout is reserved for the report.
fn progress_writer(json: bool) -> Box<dyn Write> {
    if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Manual { policy, json }) => {
            let mut console = Console::stdin();
            let mut progress = progress_writer(*json);
            let totals = manual::collect(
                &mut console,
                &mut progress,
                &config,
                policy.map(Into::into),
            )?;
            report::run(&mut io::stdout(), totals, &config, *json)?;
        }
        Some(Commands::Scan { path, json }) => {
            let mut progress = progress_writer(*json);
            let totals = scan::collect(&mut progress, &config, path.as_os_str(), || false)?;
            report::run(&mut io::stdout(), totals, &config, *json)?;
        }
        None => {
            let mut console = Console::stdin();
            menu::run(&mut console, &mut io::stdout(), &config)?;
        }
    }

    Ok(())
}
