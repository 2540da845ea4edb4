//! Component registry and renderer.
//!
//! Identifiers are unique: the first component registered under an
//! identifier wins and later contributions are dropped.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::components::builtin::builtin_components;
use crate::components::model::Component;
use crate::components::viewmodel::ComponentViewModel;
use crate::html::Node;

/// Catalog listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    /// Registered identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Declared property slugs.
    pub properties: Vec<String>,
}

/// Outcome of merging a batch of components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Identifiers that were added.
    pub accepted: Vec<String>,
    /// Identifiers already present, left untouched.
    pub dropped: Vec<String>,
}

/// Maps component identifiers to render capabilities.
#[derive(Debug)]
pub struct Renderer {
    /// Identifier → component.
    components: RwLock<HashMap<String, Arc<Component>>>,
}

impl Renderer {
    /// Creates a renderer holding the built-in catalog.
    pub fn new() -> Self {
        let components = builtin_components()
            .into_iter()
            .map(|c| (c.slug.clone(), Arc::new(c)))
            .collect();
        Self {
            components: RwLock::new(components),
        }
    }

    /// Creates a renderer with no components at all.
    pub fn empty() -> Self {
        Self {
            components: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a component under its own slug. Returns `false` when the
    /// slug was already taken.
    pub async fn register(&self, component: Component) -> bool {
        let id = component.slug.clone();
        self.register_as(&id, Arc::new(component)).await
    }

    /// Registers a component under an explicit identifier.
    pub async fn register_as(&self, id: &str, component: Arc<Component>) -> bool {
        let mut components = self.components.write().await;
        if components.contains_key(id) {
            debug!(component = %id, "Component already registered, keeping first");
            return false;
        }
        components.insert(id.to_string(), component);
        info!(component = %id, "Component registered");
        true
    }

    /// Merges a batch contributed by `source` under one write lock.
    pub async fn merge(
        &self,
        source: &str,
        batch: impl IntoIterator<Item = (String, Arc<Component>)>,
    ) -> MergeOutcome {
        let mut batch: Vec<_> = batch.into_iter().collect();
        batch.sort_by(|a, b| a.0.cmp(&b.0));

        let mut outcome = MergeOutcome::default();
        let mut components = self.components.write().await;
        for (id, component) in batch {
            if components.contains_key(&id) {
                debug!(source = %source, component = %id, "Duplicate component ignored");
                outcome.dropped.push(id);
                continue;
            }
            components.insert(id.clone(), component);
            outcome.accepted.push(id);
        }

        if !outcome.accepted.is_empty() {
            info!(
                source = %source,
                accepted = outcome.accepted.len(),
                dropped = outcome.dropped.len(),
                "Components merged"
            );
        }
        outcome
    }

    /// Gets a component by identifier.
    pub async fn get(&self, id: &str) -> Option<Arc<Component>> {
        let components = self.components.read().await;
        components.get(id).cloned()
    }

    /// Checks whether an identifier is registered.
    pub async fn contains(&self, id: &str) -> bool {
        let components = self.components.read().await;
        components.contains_key(id)
    }

    /// Returns the number of registered components.
    pub async fn count(&self) -> usize {
        let components = self.components.read().await;
        components.len()
    }

    /// Lists the catalog sorted by identifier.
    pub async fn list(&self) -> Vec<ComponentSummary> {
        let components = self.components.read().await;
        let mut summaries: Vec<ComponentSummary> = components
            .iter()
            .map(|(id, c)| ComponentSummary {
                id: id.clone(),
                name: c.name.clone(),
                description: c.description.clone(),
                properties: c.properties.iter().map(|p| p.slug.clone()).collect(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Renders the component named by the view model.
    ///
    /// Unknown identifiers produce [`Node::unknown_component`]. A render
    /// function that panics produces [`Node::component_error`]. This never fails.
    pub async fn render(&self, vm: &ComponentViewModel) -> Node {
        match self.get(&vm.component_id).await {
            Some(component) => {
                match panic::catch_unwind(AssertUnwindSafe(|| component.render(vm))) {
                    Ok(node) => node,
                    Err(_) => {
                        warn!(
                            component = %vm.component_id,
                            instance = %vm.instance_slug,
                            "Component render panicked, rendering error node"
                        );
                        Node::component_error()
                    }
                }
            }
            None => {
                debug!(component = %vm.component_id, "Unknown component, rendering fallback");
                Node::unknown_component()
            }
        }
    }

    /// Removes `id` only if it is still backed by `component`.
    pub async fn remove_owned(&self, id: &str, component: &Arc<Component>) -> bool {
        let mut components = self.components.write().await;
        match components.get(id) {
            Some(current) if Arc::ptr_eq(current, component) => {
                components.remove(id);
                debug!(component = %id, "Component removed");
                true
            }
            _ => false,
        }
    }

    /// Drops every registered component.
    pub async fn clear(&self) {
        let mut components = self.components.write().await;
        components.clear();
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
