//! The `hello-world` plugin: a greeting and an interactive counter.

use std::sync::Arc;

use gms_plugin::prelude::*;
use tracing::debug;

/// Plugin name.
pub const PLUGIN_NAME: &str = "hello-world";

/// Hook fired by the counter's buttons.
pub const COUNTER_UPDATED: &str = "counterUpdated";

const DEFAULT_MESSAGE: &str = "Welcome to the GMS Plugin System!";

/// Builds the plugin.
pub fn plugin() -> Plugin {
    PluginBuilder::new("Hello World")
        .author("GMS Team")
        .version("1.0.0")
        .description("A simple hello world component example")
        .component(hello_component())
        .component(counter_component())
        .hook(COUNTER_UPDATED, 0, Arc::new(CounterUpdatedHook))
        .build()
}

fn hello_component() -> Component {
    Component::builder("hello-world", render_hello)
        .name("Hello World")
        .description("Greets the visitor")
        .property(PropertyDef::new("message", PropertyKind::String).with_default(DEFAULT_MESSAGE))
        .build()
}

fn render_hello(vm: &ComponentViewModel) -> Node {
    Node::element("div")
        .class("hello-world p-4 bg-base-200 rounded-lg")
        .child(Node::element("h2").class("text-xl font-bold mb-2").text("Hello World!"))
        .child(Node::element("p").class("text-base-content").text(vm.resolve("message")))
        .into()
}

fn counter_component() -> Component {
    Component::builder("counter", render_counter)
        .name("Counter")
        .description("Demonstrates interactive state")
        .property(
            PropertyDef::new("initialCount", PropertyKind::Int)
                .with_key("Initial count")
                .with_default("0"),
        )
        .build()
}

fn render_counter(vm: &ComponentViewModel) -> Node {
    let mut root = Node::element("div")
        .class("counter p-4 border rounded-lg")
        .child(Node::element("h3").class("font-bold mb-2").text("Counter Component"));

    let count = match vm.resolve_typed("initialCount", PropertyKind::Int) {
        Ok(value) => value.as_int().unwrap_or_default(),
        Err(err) => {
            root = root.child(Node::element("p").class("text-error").text(err.to_string()));
            0
        }
    };

    root.child(
        Node::element("div")
            .class("flex items-center gap-2")
            .child(
                Node::element("button")
                    .class("btn btn-primary")
                    .attr("hx-put", vm.rest_path("/counter/decrement", RestScope::Page))
                    .text("-"),
            )
            .child(
                Node::element("span")
                    .class("text-2xl font-mono w-12 text-center")
                    .text(count.to_string()),
            )
            .child(
                Node::element("button")
                    .class("btn btn-primary")
                    .attr("hx-put", vm.rest_path("/counter/increment", RestScope::Page))
                    .attr("hx-target", "closest .counter")
                    .text("+"),
            ),
    )
    .into()
}

/// Handles counter updates sent by the client.
///
/// Arguments: `action` (`"increment"` or `"decrement"`) and an optional
/// integer `count`, the value currently shown. Returns `{"count": n}`.
#[derive(Debug)]
pub struct CounterUpdatedHook;

#[async_trait]
impl HookHandler for CounterUpdatedHook {
    async fn handle(&self, ctx: &HookContext, args: &HookArgs) -> Result<HandlerOutput, HandlerError> {
        ctx.check()?;

        let action = args
            .get("action")
            .and_then(|v| v.as_str())
            .ok_or_else(|| HandlerError::invalid_argument("action", "missing or not a string"))?;

        let current = match args.get("count") {
            None => 0,
            Some(value) => value
                .as_i64()
                .ok_or_else(|| HandlerError::invalid_argument("count", "expected an integer"))?,
        };

        let count = match action {
            "increment" => current.saturating_add(1),
            "decrement" => current.saturating_sub(1),
            other => return Err(HandlerError::failed(format!("invalid action: {other}"))),
        };

        debug!(invocation_id = %ctx.invocation_id, action = %action, count = count, "Counter updated");
        Ok(Some(json!({ "count": count })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm(component: &Component, properties: Vec<ComponentProperty>) -> ComponentViewModel {
        ComponentViewModel::new("counter-1", component.slug.clone(), properties, Vec::new(), false, "/pages/home")
            .with_component_defaults(component)
    }

    #[test]
    fn test_hello_uses_default_message() {
        let component = hello_component();
        let html = component.render(&vm(&component, Vec::new())).render();
        assert!(html.contains("<h2 class=\"text-xl font-bold mb-2\">Hello World!</h2>"));
        assert!(html.contains(DEFAULT_MESSAGE));
    }

    #[test]
    fn test_hello_layout_override_wins() {
        let component = hello_component();
        let props = vec![ComponentProperty::new("message", "Hi from the layout", PropertyTier::LayoutOverride)];
        let html = component.render(&vm(&component, props)).render();
        assert!(html.contains("Hi from the layout"));
        assert!(!html.contains(DEFAULT_MESSAGE));
    }

    #[test]
    fn test_counter_renders_page_scoped_actions() {
        let component = counter_component();
        let props = vec![ComponentProperty::new("initialCount", "41", PropertyTier::PageOverride)];
        let html = component.render(&vm(&component, props)).render();

        assert!(html.contains(r#"hx-put="/pages/home/counter/decrement""#));
        assert!(html.contains(r#"hx-put="/pages/home/counter/increment""#));
        assert!(html.contains(r#"hx-target="closest .counter""#));
        assert!(html.contains(">41</span>"));
    }

    #[test]
    fn test_counter_reports_bad_initial_count() {
        let component = counter_component();
        let props = vec![ComponentProperty::new("initialCount", "lots", PropertyTier::PageOverride)];
        let html = component.render(&vm(&component, props)).render();

        assert!(html.contains("text-error"));
        assert!(html.contains(">0</span>"));
    }

    #[tokio::test]
    async fn test_counter_hook_increments_and_decrements() {
        let hook = CounterUpdatedHook;
        let ctx = HookContext::new();

        let out = hook
            .handle(&ctx, &hook_args! { "action" => json!("increment"), "count" => json!(4) })
            .await;
        assert_eq!(out, Ok(Some(json!({ "count": 5 }))));

        let out = hook.handle(&ctx, &hook_args! { "action" => json!("decrement") }).await;
        assert_eq!(out, Ok(Some(json!({ "count": -1 }))));
    }

    #[tokio::test]
    async fn test_counter_hook_rejects_bad_input() {
        let hook = CounterUpdatedHook;
        let ctx = HookContext::new();

        let missing = hook.handle(&ctx, &HookArgs::new()).await;
        assert!(matches!(missing, Err(HandlerError::InvalidArgument { ref name, .. }) if name == "action"));

        let unknown = hook.handle(&ctx, &hook_args! { "action" => json!("reset") }).await;
        assert_eq!(unknown, Err(HandlerError::failed("invalid action: reset")));

        let bad_count = hook
            .handle(&ctx, &hook_args! { "action" => json!("increment"), "count" => json!("four") })
            .await;
        assert!(matches!(bad_count, Err(HandlerError::InvalidArgument { ref name, .. }) if name == "count"));
    }
}
