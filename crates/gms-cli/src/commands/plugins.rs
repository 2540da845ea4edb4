//! Plugin catalog CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gms_core::AppResult;
use gms_plugin::Host;
use gms_plugin::registry::PluginSummary;

use crate::output::{self, OutputFormat};

/// Arguments for plugin commands
#[derive(Debug, Args)]
pub struct PluginsArgs {
    /// Plugin subcommand
    #[command(subcommand)]
    pub command: PluginsCommand,
}

/// Plugin subcommands
#[derive(Debug, Subcommand)]
pub enum PluginsCommand {
    /// List loaded plugins
    List,
    /// Scan an extra directory and report what it loaded
    Scan {
        /// Directory containing plugin units
        directory: PathBuf,
    },
}

/// Table row for a plugin
#[derive(Debug, Serialize, Tabled)]
struct PluginRow {
    #[tabled(rename = "Plugin")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Components")]
    components: String,
    #[tabled(rename = "Hooks")]
    hooks: String,
}

impl From<&PluginSummary> for PluginRow {
    fn from(summary: &PluginSummary) -> Self {
        Self {
            id: summary.id.clone(),
            name: summary.info.name.clone(),
            version: summary.info.version.clone(),
            author: summary.info.author.clone(),
            components: output::join_or_dash(&summary.components),
            hooks: output::join_or_dash(&summary.hooks),
        }
    }
}

/// Table row for one scan outcome
#[derive(Debug, Serialize, Tabled)]
struct ScanRow {
    #[tabled(rename = "Outcome")]
    outcome: &'static str,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// Execute plugin commands
pub async fn execute(args: &PluginsArgs, host: &Host, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        PluginsCommand::List => {
            let summaries = host.plugins().plugin_infos().await;
            match format {
                OutputFormat::Json => output::print_json(&summaries, "[]"),
                OutputFormat::Table => {
                    let rows: Vec<PluginRow> = summaries.iter().map(PluginRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        PluginsCommand::Scan { directory } => {
            let report = host.scan(directory).await?;

            let mut rows = Vec::new();
            rows.extend(report.loaded.iter().map(|name| ScanRow {
                outcome: "loaded",
                subject: name.clone(),
                detail: String::new(),
            }));
            rows.extend(report.duplicates.iter().map(|dup| ScanRow {
                outcome: "duplicate",
                subject: dup.name.clone(),
                detail: format!("already registered; skipped copy from {}", dup.source),
            }));
            rows.extend(report.shadowed_components.iter().map(|id| ScanRow {
                outcome: "shadowed",
                subject: id.clone(),
                detail: "component id already taken".to_string(),
            }));
            rows.extend(report.failures.iter().map(|err| ScanRow {
                outcome: "failed",
                subject: err.path().display().to_string(),
                detail: err.to_string(),
            }));
            output::print_list(&rows, format);

            if report.is_clean() && format == OutputFormat::Table {
                output::print_success(&format!(
                    "Scanned {} unit(s) in '{}'",
                    report.units,
                    directory.display()
                ));
            }
        }
    }

    Ok(())
}
