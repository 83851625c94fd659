//! `ferry push` — reconcile local definitions into the remote service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ferry_remote::{Config, Gateway};
use ferry_sync::{push, PushReport, PushScope, UpsertResult};

use crate::ScopeArg;

/// Arguments for `ferry push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Base URL of the target service; the token comes from $FERRY_TOKEN.
    pub url: String,

    /// Directory of collection definition files.
    #[arg(long, default_value = "collections")]
    pub collections_dir: PathBuf,

    /// Directory of flow definition files.
    #[arg(long, default_value = "flows")]
    pub flows_dir: PathBuf,

    /// Limit the run to one definition kind.
    #[arg(long)]
    pub only: Option<ScopeArg>,

    /// Decide create-vs-update against the live inventory without issuing
    /// any mutating call.
    #[arg(long)]
    pub dry_run: bool,
}

impl PushArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::from_env(&self.url)?;
        let gateway = Gateway::new(config);
        let scope = self.only.map(PushScope::from).unwrap_or(PushScope::All);

        let report = push(
            &self.collections_dir,
            &self.flows_dir,
            &gateway,
            scope,
            self.dry_run,
        )
        .context("push failed")?;

        print_report(&report, self.dry_run);
        Ok(())
    }
}

fn print_report(report: &PushReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for item in &report.items {
        match item {
            UpsertResult::Created { kind, id } => {
                println!("  {} {kind} {id}", "✚".green());
            }
            UpsertResult::Updated { kind, id } => {
                println!("  {} {kind} {id}", "✎".green());
            }
            UpsertResult::Unchanged { kind, id } => {
                println!("  {} {kind} {id}", "·".bright_black());
            }
            UpsertResult::WouldCreate { kind, id } => {
                println!("  {} {kind} {id} (would create)", "~".yellow());
            }
            UpsertResult::WouldUpdate { kind, id } => {
                println!("  {} {kind} {id} (would update)", "~".yellow());
            }
            UpsertResult::SkippedDanglingReject { id, missing } => {
                println!(
                    "  {} operation {id} — reject target '{missing}' does not exist, skipped",
                    "⚠".yellow()
                );
            }
            UpsertResult::SkippedSystem { id } => {
                println!("  {} collection {id} (system, excluded)", "·".bright_black());
            }
            UpsertResult::Failed { kind, id, error } => {
                println!("  {} {kind} {id} — {error}", "✗".red());
            }
        }
    }

    println!(
        "{prefix}✓ push complete ({} created, {} updated, {} unchanged, {} skipped, {} failed)",
        report.created(),
        report.updated(),
        report.unchanged(),
        report.skipped(),
        report.failed(),
    );
}
