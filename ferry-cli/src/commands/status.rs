//! `ferry status` — what a push would change, rendered as a table.
//!
//! Runs the push decision engine in dry-run mode (listings only, no
//! mutations) and tabulates the outcome per record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ferry_remote::{Config, Gateway};
use ferry_sync::{push, PushReport, PushScope, UpsertResult};

/// Arguments for `ferry status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Base URL of the target service; the token comes from $FERRY_TOKEN.
    pub url: String,

    /// Directory of collection definition files.
    #[arg(long, default_value = "collections")]
    pub collections_dir: PathBuf,

    /// Directory of flow definition files.
    #[arg(long, default_value = "flows")]
    pub flows_dir: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::from_env(&self.url)?;
        let gateway = Gateway::new(config);

        let report = push(
            &self.collections_dir,
            &self.flows_dir,
            &gateway,
            PushScope::All,
            true,
        )
        .context("status check failed")?;

        if self.json {
            print_json(&report)?;
            return Ok(());
        }

        print_table(&report);
        Ok(())
    }
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "detail")]
    detail: String,
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    items: Vec<StatusItemJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    create: usize,
    update: usize,
    unchanged: usize,
    skipped: usize,
    failed: usize,
}

#[derive(Serialize)]
struct StatusItemJson {
    kind: String,
    name: String,
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

fn classify(item: &UpsertResult) -> (String, String, &'static str, Option<String>) {
    match item {
        UpsertResult::Created { kind, id } | UpsertResult::WouldCreate { kind, id } => {
            (kind.to_string(), id.clone(), "create", None)
        }
        UpsertResult::Updated { kind, id } | UpsertResult::WouldUpdate { kind, id } => {
            (kind.to_string(), id.clone(), "update", None)
        }
        UpsertResult::Unchanged { kind, id } => (kind.to_string(), id.clone(), "unchanged", None),
        UpsertResult::SkippedDanglingReject { id, missing } => (
            "operation".to_string(),
            id.clone(),
            "skip",
            Some(format!("reject target '{missing}' does not exist")),
        ),
        UpsertResult::SkippedSystem { id } => (
            "collection".to_string(),
            id.clone(),
            "skip",
            Some("system collection".to_string()),
        ),
        UpsertResult::Failed { kind, id, error } => {
            (kind.to_string(), id.clone(), "error", Some(error.clone()))
        }
    }
}

fn print_json(report: &PushReport) -> Result<()> {
    let payload = StatusReportJson {
        summary: StatusSummaryJson {
            create: report.created(),
            update: report.updated(),
            unchanged: report.unchanged(),
            skipped: report.skipped(),
            failed: report.failed(),
        },
        items: report
            .items
            .iter()
            .map(|item| {
                let (kind, name, action, detail) = classify(item);
                StatusItemJson {
                    kind,
                    name,
                    action: action.to_string(),
                    detail,
                }
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: &PushReport) {
    println!(
        "Ferry v{} | {} to create | {} to update | {} unchanged | {} skipped | {} failed",
        env!("CARGO_PKG_VERSION"),
        report.created(),
        report.updated(),
        report.unchanged(),
        report.skipped(),
        report.failed(),
    );

    if report.items.is_empty() {
        println!("Nothing to do: no local definitions found.");
        return;
    }

    let rows: Vec<StatusTableRow> = report
        .items
        .iter()
        .map(|item| {
            let (kind, name, action, detail) = classify(item);
            StatusTableRow {
                kind,
                name,
                action: action.to_string(),
                detail: detail.unwrap_or_default(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if report.created() + report.updated() > 0 {
        println!("Run {} to apply these changes.", "'ferry push'".bold());
    }
}
