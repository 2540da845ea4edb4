//! The `ui-kit` plugin: small presentational building blocks.

use gms_plugin::prelude::*;

/// Plugin name.
pub const PLUGIN_NAME: &str = "ui-kit";

const VARIANTS: &[&str] = &["primary", "secondary", "accent", "ghost", "link"];
const LEVELS: &[&str] = &["info", "success", "warning", "error"];

/// Builds the plugin.
pub fn plugin() -> Plugin {
    PluginBuilder::new("UI Kit")
        .author("GMS Team")
        .version("1.0.0")
        .description("Buttons, cards, alerts and badges")
        .component(button())
        .component(card())
        .component(alert())
        .component(badge())
        .build()
}

/// Picks `value` if it is one of `allowed`, otherwise the first allowed entry.
fn pick<'a>(value: &'a str, allowed: &'a [&'a str]) -> &'a str {
    allowed
        .iter()
        .copied()
        .find(|candidate| *candidate == value)
        .unwrap_or(allowed[0])
}

fn button() -> Component {
    Component::builder("button", render_button)
        .name("Button")
        .description("A link or action button")
        .properties([
            PropertyDef::new("label", PropertyKind::String).required().with_default("Click me"),
            PropertyDef::new("variant", PropertyKind::String).with_default("primary"),
            PropertyDef::new("href", PropertyKind::String),
            PropertyDef::new("disabled", PropertyKind::Bool).with_default("false"),
        ])
        .build()
}

fn render_button(vm: &ComponentViewModel) -> Node {
    let variant = vm.resolve("variant");
    let class = format!("btn btn-{}", pick(&variant, VARIANTS));
    let disabled = vm
        .resolve_typed("disabled", PropertyKind::Bool)
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let href = vm.resolve("href");

    let element = if href.is_empty() || disabled {
        let button = Node::element("button").attr("type", "button").class(class);
        if disabled {
            button.attr("disabled", "disabled")
        } else {
            button
        }
    } else {
        Node::element("a").attr("href", href).class(class)
    };

    element.text(vm.resolve("label")).into()
}

fn card() -> Component {
    Component::builder("card", render_card)
        .name("Card")
        .description("Titled content with an optional image")
        .properties([
            PropertyDef::new("title", PropertyKind::String).required(),
            PropertyDef::new("body", PropertyKind::String),
        ])
        .media("image", &["image/png", "image/jpeg", "image/webp"])
        .build()
}

fn render_card(vm: &ComponentViewModel) -> Node {
    let mut card = Node::element("div").class("card bg-base-100 shadow");

    let image = vm.resolve_media("image");
    if !image.is_empty() {
        card = card.child(
            Node::element("figure").child(
                Node::element("img")
                    .attr("src", image)
                    .attr("alt", vm.resolve("title")),
            ),
        );
    }

    let mut body = Node::element("div")
        .class("card-body")
        .child(Node::element("h2").class("card-title").text(vm.resolve("title")));

    let text = vm.resolve("body");
    if !text.is_empty() {
        body = body.child(Node::element("p").text(text));
    }

    let error = vm.resolve_form_error("title");
    if !error.is_empty() {
        body = body.child(Node::element("p").class("text-error").text(error));
    }

    card.child(body).into()
}

fn alert() -> Component {
    Component::builder("alert", render_alert)
        .name("Alert")
        .description("A highlighted message")
        .properties([
            PropertyDef::new("message", PropertyKind::String).required(),
            PropertyDef::new("level", PropertyKind::String).with_default("info"),
        ])
        .build()
}

fn render_alert(vm: &ComponentViewModel) -> Node {
    let level = vm.resolve("level");
    Node::element("div")
        .attr("role", "alert")
        .class(format!("alert alert-{}", pick(&level, LEVELS)))
        .child(Node::element("span").text(vm.resolve("message")))
        .into()
}

fn badge() -> Component {
    Component::builder("badge", render_badge)
        .name("Badge")
        .description("A short label, optionally one per list item")
        .properties([
            PropertyDef::new("text", PropertyKind::List).required(),
            PropertyDef::new("variant", PropertyKind::String).with_default("secondary"),
        ])
        .build()
}

fn render_badge(vm: &ComponentViewModel) -> Node {
    let variant = vm.resolve("variant");
    let class = format!("badge badge-{}", pick(&variant, VARIANTS));
    let items = match vm.resolve_typed("text", PropertyKind::List) {
        Ok(PropertyValue::List(items)) => items,
        _ => Vec::new(),
    };

    Node::group(
        items
            .into_iter()
            .map(|item| Node::element("span").class(class.clone()).text(item).into()),
    )
}
