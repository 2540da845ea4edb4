//! Hook registry CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use gms_core::AppResult;
use gms_core::error::AppError;
use gms_plugin::Host;
use gms_plugin::hooks::HookArgs;

use super::parse_key_value;
use crate::output::{self, OutputFormat};

/// Arguments for hook commands
#[derive(Debug, Args)]
pub struct HooksArgs {
    /// Hook subcommand
    #[command(subcommand)]
    pub command: HooksCommand,
}

/// Hook subcommands
#[derive(Debug, Subcommand)]
pub enum HooksCommand {
    /// List hook names and their handlers in execution order
    List,
    /// Invoke every handler of a hook
    Fire {
        /// Hook name
        hook: String,
        /// Argument; the value is parsed as JSON, else taken as a string (repeatable)
        #[arg(short, long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },
}

/// Table row for a registered handler
#[derive(Debug, Serialize, Tabled)]
struct HandlerRow {
    #[tabled(rename = "Hook")]
    hook: String,
    #[tabled(rename = "Order")]
    order: usize,
    #[tabled(rename = "Plugin")]
    plugin: String,
    #[tabled(rename = "Priority")]
    priority: i32,
}

/// Table row for one handler outcome
#[derive(Debug, Serialize, Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Plugin")]
    plugin: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Result")]
    result: String,
}

/// Execute hook commands
pub async fn execute(args: &HooksArgs, host: &Host, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        HooksCommand::List => {
            let mut rows = Vec::new();
            for hook in host.hooks().registered_hooks().await {
                for (order, registration) in host.hooks().get(&hook).await.into_iter().enumerate() {
                    rows.push(HandlerRow {
                        hook: hook.clone(),
                        order: order + 1,
                        plugin: registration.plugin_id,
                        priority: registration.priority,
                    });
                }
            }
            output::print_list(&rows, format);
        }
        HooksCommand::Fire { hook, args } => {
            let hook_args = to_hook_args(args);
            let result = host.dispatch(hook, &hook_args).await;

            match format {
                OutputFormat::Json => output::print_json(&result, "{}"),
                OutputFormat::Table => {
                    if result.handled == 0 {
                        output::print_warning(&format!("No handlers registered for '{hook}'"));
                    }
                    let rows: Vec<OutcomeRow> = result
                        .outputs
                        .iter()
                        .map(|o| OutcomeRow {
                            plugin: o.plugin_id.clone(),
                            status: "ok",
                            result: o.value.to_string(),
                        })
                        .chain(result.failures.iter().map(|f| OutcomeRow {
                            plugin: f.plugin_id.clone(),
                            status: "failed",
                            result: f.message.clone(),
                        }))
                        .collect();
                    if !rows.is_empty() {
                        output::print_list(&rows, format);
                    }
                }
            }

            if !result.is_success() {
                return Err(AppError::plugin(format!(
                    "{} of {} handler(s) for '{hook}' failed",
                    result.failures.len(),
                    result.handled
                )));
            }
        }
    }

    Ok(())
}

/// Builds hook arguments, reading each value as JSON when it parses.
fn to_hook_args(pairs: &[(String, String)]) -> HookArgs {
    pairs
        .iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            (key.clone(), value)
        })
        .collect()
}
