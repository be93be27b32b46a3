//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use infra_config::ParsePolicy;
use infra_targets::TargetSelection;

/// Register the infrastructure MCP servers with Claude Code and Claude Desktop
#[derive(Parser, Debug)]
#[command(name = "claude-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Infrastructure config file
    ///
    /// Defaults to claude_infrastructure_config.txt in the autonomy directory.
    #[arg(short, long, env = "CLAUDE_INFRA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Reject malformed config lines instead of skipping them
    #[arg(long, global = true)]
    pub strict: bool,

    /// Only update ~/.claude.json
    #[arg(long, conflicts_with = "claude_desktop_only")]
    pub claude_code_only: bool,

    /// Only update claude_desktop_config.json
    #[arg(long)]
    pub claude_desktop_only: bool,

    /// Print the merged documents instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn selection(&self) -> TargetSelection {
        if self.claude_code_only {
            TargetSelection::CodeOnly
        } else if self.claude_desktop_only {
            TargetSelection::DesktopOnly
        } else {
            TargetSelection::Both
        }
    }

    pub fn policy(&self) -> ParsePolicy {
        if self.strict {
            ParsePolicy::Strict
        } else {
            ParsePolicy::Lenient
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved config as JSON, with credentials redacted
    Show,

    /// Print the X11 authority file for the current user
    Xauth,
}
