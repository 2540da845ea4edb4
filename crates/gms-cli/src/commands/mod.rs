//! CLI command definitions and dispatch.

pub mod components;
pub mod config;
pub mod hooks;
pub mod manifest;
pub mod plugins;
pub mod render;

use clap::{Parser, Subcommand};

use gms_core::AppResult;
use gms_core::config::AppConfig;
use gms_plugin::Host;

use crate::output::{self, OutputFormat};

/// GMS plugin host inspection and tooling
#[derive(Debug, Parser)]
#[command(name = "gms", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file. Without it, `config/default` and the
    /// `config/{env}` overlay are read if present.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Environment overlay to read when no explicit file is given
    #[arg(short, long, global = true, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Do not register the bundled example plugins
    #[arg(long, global = true)]
    pub no_examples: bool,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plugin catalog
    Plugins(plugins::PluginsArgs),
    /// Component catalog
    Components(components::ComponentsArgs),
    /// Render one component instance to HTML
    Render(render::RenderArgs),
    /// Hook registry
    Hooks(hooks::HooksArgs),
    /// Plugin manifests
    Manifest(manifest::ManifestArgs),
    /// Configuration
    Config(config::ConfigArgs),
}

impl Cli {
    /// Loads configuration from `--config` or the default locations.
    pub fn load_config(&self) -> AppResult<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::load_file(path),
            None => AppConfig::load(&self.env),
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self, app_config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Config(args) => return config::execute(args, &app_config, self.format),
            Commands::Manifest(args) => return manifest::execute(args, self.format),
            _ => {}
        }

        let host = build_host(&app_config, !self.no_examples).await?;
        let result = match &self.command {
            Commands::Plugins(args) => plugins::execute(args, &host, self.format).await,
            Commands::Components(args) => components::execute(args, &host, self.format).await,
            Commands::Render(args) => render::execute(args, &host, self.format).await,
            Commands::Hooks(args) => hooks::execute(args, &host, self.format).await,
            Commands::Config(_) | Commands::Manifest(_) => Ok(()),
        };
        host.shutdown().await;
        result
    }
}

/// Helper: create the host, scan the configured directory and register the
/// bundled examples after it so dynamically loaded copies take precedence.
pub async fn build_host(config: &AppConfig, with_examples: bool) -> AppResult<Host> {
    let host = Host::from_config(config).await?;

    if let Some(report) = host.startup_report() {
        for failure in &report.failures {
            output::print_warning(&failure.to_string());
        }
    }

    if with_examples {
        host.register_static("plugin-examples", plugin_examples::get_plugins())
            .await;
    }

    Ok(host)
}

/// Parses a `key=value` argument.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
