//! Component catalog CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gms_core::AppResult;
use gms_plugin::Host;

use crate::output::{self, OutputFormat};

/// Arguments for component commands
#[derive(Debug, Args)]
pub struct ComponentsArgs {
    /// Component subcommand
    #[command(subcommand)]
    pub command: ComponentsCommand,
}

/// Component subcommands
#[derive(Debug, Subcommand)]
pub enum ComponentsCommand {
    /// List registered components
    List,
}

/// Table row for a component
#[derive(Debug, Serialize, Tabled)]
struct ComponentRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Properties")]
    properties: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Execute component commands
pub async fn execute(args: &ComponentsArgs, host: &Host, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ComponentsCommand::List => {
            let rows: Vec<ComponentRow> = host
                .components()
                .list()
                .await
                .into_iter()
                .map(|c| ComponentRow {
                    properties: output::join_or_dash(&c.properties),
                    id: c.id,
                    name: c.name,
                    description: c.description,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
