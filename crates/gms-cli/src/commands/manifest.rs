//! Plugin manifest CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gms_core::AppResult;
use gms_plugin::manifest::PluginManifest;

use crate::output::{self, OutputFormat};

/// Arguments for manifest commands
#[derive(Debug, Args)]
pub struct ManifestArgs {
    /// Manifest subcommand
    #[command(subcommand)]
    pub command: ManifestCommand,
}

/// Manifest subcommands
#[derive(Debug, Subcommand)]
pub enum ManifestCommand {
    /// Validate a manifest file, or the manifest.json in a directory
    Validate {
        /// Manifest file or plugin directory
        path: PathBuf,
    },
}

/// Table row for a declared component
#[derive(Debug, Serialize, Tabled)]
struct DeclaredComponentRow {
    #[tabled(rename = "Component")]
    slug: String,
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Required")]
    required: bool,
    #[tabled(rename = "Default")]
    default: String,
}

/// Execute manifest commands
pub fn execute(args: &ManifestArgs, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ManifestCommand::Validate { path } => {
            let manifest = if path.is_dir() {
                PluginManifest::load_from_directory(path)?
            } else {
                PluginManifest::load(path)?
            };

            if let Err(e) = manifest.validate() {
                output::print_error(&format!("Manifest invalid: {e}"));
                return Err(e.into());
            }

            match format {
                OutputFormat::Json => output::print_json(&manifest, "{}"),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Manifest for '{}' v{} is valid",
                        manifest.name, manifest.version
                    ));
                    output::print_kv("author", &manifest.author);
                    output::print_kv("gmsVersion", &manifest.gms_version);
                    output::print_kv("permissions", &output::join_or_dash(&manifest.permissions));
                    let hooks: Vec<String> = manifest
                        .hooks
                        .iter()
                        .map(|h| format!("{} ({})", h.name, h.priority))
                        .collect();
                    output::print_kv("hooks", &output::join_or_dash(&hooks));

                    let rows: Vec<DeclaredComponentRow> = manifest
                        .components
                        .iter()
                        .flat_map(|c| {
                            c.property_defs().into_iter().map(move |def| DeclaredComponentRow {
                                slug: c.slug.clone(),
                                property: def.slug,
                                kind: def.kind.to_string(),
                                required: def.required,
                                default: def.default,
                            })
                        })
                        .collect();
                    if !rows.is_empty() {
                        output::print_list(&rows, format);
                    }
                }
            }
        }
    }

    Ok(())
}
