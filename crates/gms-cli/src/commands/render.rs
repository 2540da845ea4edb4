//! Render a component instance to HTML.

use clap::Args;
use serde::Serialize;

use gms_core::AppResult;
use gms_plugin::Host;
use gms_plugin::components::{ComponentMedia, ComponentProperty, ComponentViewModel, PropertyTier};

use super::parse_key_value;
use crate::output::{self, OutputFormat};

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Component identifier
    pub component: String,

    /// Instance slug used for component-scoped REST paths
    #[arg(short, long, default_value = "cli-instance")]
    pub instance: String,

    /// Page-level property override (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub page: Vec<(String, String)>,

    /// Layout-level property override (repeatable)
    #[arg(long = "layout", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub layout: Vec<(String, String)>,

    /// Media URL for a slot (repeatable)
    #[arg(long = "media", value_name = "SLOT=URL", value_parser = parse_key_value)]
    pub media: Vec<(String, String)>,

    /// Page REST context for page-scoped actions
    #[arg(long, default_value = "")]
    pub rest_context: String,

    /// Render in edit mode
    #[arg(long)]
    pub edit: bool,

    /// Validate resolved properties against the component schema first
    #[arg(long)]
    pub validate: bool,
}

#[derive(Debug, Serialize)]
struct RenderOutput {
    component: String,
    known: bool,
    submit_url: String,
    errors: Vec<String>,
    html: String,
}

/// Execute the render command
pub async fn execute(args: &RenderArgs, host: &Host, format: OutputFormat) -> AppResult<()> {
    let properties = args
        .layout
        .iter()
        .map(|(k, v)| ComponentProperty::new(k.clone(), v.clone(), PropertyTier::LayoutOverride))
        .chain(
            args.page
                .iter()
                .map(|(k, v)| ComponentProperty::new(k.clone(), v.clone(), PropertyTier::PageOverride)),
        );
    let media = args.media.iter().map(|(slot, url)| ComponentMedia {
        slug: slot.clone(),
        file_name: url.rsplit('/').next().unwrap_or_default().to_string(),
        file_type: String::new(),
        url: url.clone(),
    });

    let mut vm = ComponentViewModel::new(
        args.instance.clone(),
        args.component.clone(),
        properties,
        media,
        args.edit,
        args.rest_context.clone(),
    );

    let component = host.components().get(&args.component).await;
    let mut errors = Vec::new();
    if let Some(component) = &component {
        vm = vm.with_component_defaults(component);
        if args.validate {
            errors = vm
                .validate_against(component)
                .into_iter()
                .map(|e| e.to_string())
                .collect();
        }
    } else {
        output::print_warning(&format!("Unknown component '{}'", args.component));
    }

    let html = host.render(&vm).await.render();

    match format {
        OutputFormat::Json => output::print_json(
            &RenderOutput {
                component: args.component.clone(),
                known: component.is_some(),
                submit_url: vm.submit_url.clone(),
                errors,
                html,
            },
            "{}",
        ),
        OutputFormat::Table => {
            for error in &errors {
                output::print_warning(error);
            }
            println!("{html}");
        }
    }

    Ok(())
}
