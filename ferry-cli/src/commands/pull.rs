//! `ferry pull` — download remote definitions into the local files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ferry_remote::{Config, Gateway};
use ferry_sync::{
    pull::{pull_collections, pull_flows},
    PullOutcome, PushScope,
};

use crate::ScopeArg;

/// Arguments for `ferry pull`.
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Base URL of the source service; the token comes from $FERRY_TOKEN.
    pub url: String,

    /// Directory to write collection definition files into.
    #[arg(long, default_value = "collections")]
    pub collections_dir: PathBuf,

    /// Directory to write flow definition files into.
    #[arg(long, default_value = "flows")]
    pub flows_dir: PathBuf,

    /// Limit the run to one definition kind.
    #[arg(long)]
    pub only: Option<ScopeArg>,
}

impl PullArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::from_env(&self.url)?;
        let gateway = Gateway::new(config);
        let scope = self.only.map(PushScope::from).unwrap_or(PushScope::All);

        let mut outcomes = Vec::new();
        if scope.includes_collections() {
            outcomes.extend(
                pull_collections(&self.collections_dir, &gateway)
                    .context("failed to download collections")?,
            );
        }
        if scope.includes_flows() {
            outcomes
                .extend(pull_flows(&self.flows_dir, &gateway).context("failed to download flows")?);
        }

        print_outcomes(&outcomes);
        Ok(())
    }
}

fn print_outcomes(outcomes: &[PullOutcome]) {
    let mut written = 0;
    let mut unchanged = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for outcome in outcomes {
        match outcome {
            PullOutcome::Written { path } => {
                written += 1;
                println!("  {} {}", "✎".green(), path.display());
            }
            PullOutcome::Unchanged { path } => {
                unchanged += 1;
                println!("  {} {}", "·".bright_black(), path.display());
            }
            PullOutcome::SkippedSystem { name } => {
                skipped += 1;
                println!("  {} {name} (system, excluded)", "·".bright_black());
            }
            PullOutcome::Failed { name, error } => {
                failed += 1;
                println!("  {} {name} — {error}", "✗".red());
            }
        }
    }

    println!(
        "✓ pull complete ({written} written, {unchanged} unchanged, {skipped} skipped, {failed} failed)"
    );
}
