//! lessify - compile stale LESS stylesheets to CSS.

mod build;
mod clean;
mod cli;
mod compiler;
mod config;
mod deps;
mod utils;
mod watch;

use anyhow::Result;
use build::{PassReport, compile_all, print_dependencies};
use clap::Parser;
use clean::clean_artifacts;
use cli::{Cli, Commands};
use compiler::CompileLog;
use config::LessConfig;
use std::path::Path;
use watch::watch_for_changes_blocking;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Compile { args } => {
            if args.json {
                utils::log::route_to_stderr();
            }
            let mut log = CompileLog::default();
            let result = compile_all(&config, &mut log);
            if args.json {
                let report = PassReport {
                    summary: result.as_ref().ok().copied(),
                    log: &log,
                };
                report.write_to(std::io::stdout().lock())?;
            }
            result.map(|_| ())
        }
        Commands::Watch { .. } => {
            if let Err(e) = compile_all(&config, &mut CompileLog::default()) {
                log!("error"; "{e:#}");
            }
            watch_for_changes_blocking(&config)
        }
        Commands::Deps { file } => print_dependencies(&config, file),
        Commands::Clean => clean_artifacts(&config).map(|_| ()),
        Commands::Info => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments.
///
/// The config file is optional; without one every setting takes its default.
fn load_config(cli: &Cli) -> Result<LessConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        LessConfig::from_path(&config_path)?
    } else {
        LessConfig::default()
    };
    config.update_with_cli(cli);
    config.validate(&cli.command)?;

    Ok(config)
}
