//! Configuration CLI commands.

use clap::{Args, Subcommand};

use gms_core::AppResult;
use gms_core::config::AppConfig;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config, "{}"),
            OutputFormat::Table => {
                println!("[plugins]");
                output::print_kv("directory", &config.plugins.directory);
                output::print_kv("auto_load", &config.plugins.auto_load.to_string());
                output::print_kv("fail_fast", &config.plugins.fail_fast.to_string());
                println!("[hooks]");
                output::print_kv("timeout_ms", &config.hooks.timeout_ms.to_string());
                println!("[logging]");
                output::print_kv("level", &config.logging.level);
                output::print_kv("format", &config.logging.format);
            }
        },
    }

    Ok(())
}
