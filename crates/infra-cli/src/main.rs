//! claude-setup
//!
//! Reads the infrastructure config and registers its MCP servers with
//! Claude Code and Claude Desktop.

mod cli;
mod commands;
mod error;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};
use infra_config::{ConfigParser, EnvContext};

/// File name looked up in the autonomy directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "claude_infrastructure_config.txt";

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command ran but did not fully succeed.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    infra_targets::logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialise logging: {e}")))?;

    let env = EnvContext::from_process();
    tracing::debug!(?env, "Process identity");

    let config = config_path(&cli, &env);
    let doc = ConfigParser::new(env.clone())
        .with_policy(cli.policy())
        .parse_file(&config)?;
    tracing::debug!(path = %config.display(), sections = doc.len(), "Config loaded");

    match cli.command {
        Some(Commands::Show) => commands::run_show(&doc).map(|()| true),
        Some(Commands::Xauth) => Ok(commands::run_xauth(&doc, &env)),
        None => Ok(commands::run_apply(
            &doc,
            &env,
            cli.selection(),
            cli.dry_run,
        )),
    }
}

fn config_path(cli: &Cli, env: &EnvContext) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(&env.autonomy_dir).join(DEFAULT_CONFIG_FILE))
}
