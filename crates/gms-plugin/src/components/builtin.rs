//! Components available before any plugin is loaded.

use crate::components::model::Component;
use crate::components::viewmodel::ComponentViewModel;
use crate::html::Node;

/// Identifier of the built-in container.
pub const CONTAINER: &str = "container";

/// The built-in catalog: a single trivial container.
pub fn builtin_components() -> Vec<Component> {
    vec![
        Component::builder(CONTAINER, render_container)
            .name("Container")
            .description("A basic container (div) component")
            .build(),
    ]
}

fn render_container(_vm: &ComponentViewModel) -> Node {
    Node::element("div").text("Container Component").into()
}
