//! Ferry — schema and flow promotion CLI.
//!
//! # Usage
//!
//! ```text
//! ferry push <url> [--collections-dir DIR] [--flows-dir DIR] [--only collections|flows] [--dry-run]
//! ferry pull <url> [--collections-dir DIR] [--flows-dir DIR] [--only collections|flows]
//! ferry status <url> [--json]
//! ```
//!
//! The auth token always comes from the `FERRY_TOKEN` environment variable.

mod commands;

use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{pull::PullArgs, push::PushArgs, status::StatusArgs};
use ferry_sync::PushScope;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ferry",
    version,
    about = "Promote schema and flow definitions between service environments",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile local definition files into the remote service.
    Push(PushArgs),

    /// Download remote definitions into the local files.
    Pull(PullArgs),

    /// Show what a push would change, as a table.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Shared scope argument — parsed from CLI strings, converts to sync scope
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse a [`PushScope`] from `--only` values.
#[derive(Debug, Clone)]
pub struct ScopeArg(pub PushScope);

impl FromStr for ScopeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collections" => Ok(Self(PushScope::Collections)),
            "flows" => Ok(Self(PushScope::Flows)),
            other => Err(format!(
                "unknown scope '{other}'; expected: collections, flows"
            )),
        }
    }
}

impl From<ScopeArg> for PushScope {
    fn from(s: ScopeArg) -> Self {
        s.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Push(args) => args.run(),
        Commands::Pull(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
