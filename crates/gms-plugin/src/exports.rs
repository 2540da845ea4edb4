//! Export helpers for building the plugin set a unit hands to the host.

use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::Arc;

use crate::components::model::Component;
use crate::hooks::definitions::HookBinding;
use crate::hooks::registry::HookHandler;
use crate::registry::{Plugin, PluginInfo};

/// Plugins exported by one unit, keyed by plugin name.
#[derive(Debug, Clone, Default)]
pub struct PluginSet {
    plugins: HashMap<String, Plugin>,
}

impl PluginSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, plugin: Plugin) {
        self.plugins.insert(name.into(), plugin);
    }

    /// Builder-style [`PluginSet::insert`].
    pub fn with(mut self, name: impl Into<String>, plugin: Plugin) -> Self {
        self.insert(name, plugin);
        self
    }

    /// Gets a plugin by name.
    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Plugin names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Consumes the set, yielding entries sorted by name.
    pub fn into_sorted(self) -> Vec<(String, Plugin)> {
        let mut entries: Vec<(String, Plugin)> = self.plugins.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl IntoIterator for PluginSet {
    type Item = (String, Plugin);
    type IntoIter = hash_map::IntoIter<String, Plugin>;

    fn into_iter(self) -> Self::IntoIter {
        self.plugins.into_iter()
    }
}

impl FromIterator<(String, Plugin)> for PluginSet {
    fn from_iter<I: IntoIterator<Item = (String, Plugin)>>(iter: I) -> Self {
        Self {
            plugins: iter.into_iter().collect(),
        }
    }
}

/// Builder for constructing a [`Plugin`] incrementally.
#[derive(Debug)]
pub struct PluginBuilder {
    plugin: Plugin,
}

impl PluginBuilder {
    /// Starts a plugin with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            plugin: Plugin::new(PluginInfo {
                name: name.into(),
                ..PluginInfo::default()
            }),
        }
    }

    /// Sets the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.plugin.info.author = author.into();
        self
    }

    /// Sets the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.plugin.info.version = version.into();
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.plugin.info.description = description.into();
        self
    }

    /// Adds a permission.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.plugin.info.permissions.push(permission.into());
        self
    }

    /// Adds a component under its own slug.
    pub fn component(self, component: Component) -> Self {
        let id = component.slug.clone();
        self.component_as(id, component)
    }

    /// Adds a component under an explicit identifier.
    pub fn component_as(mut self, id: impl Into<String>, component: Component) -> Self {
        self.plugin.components.insert(id.into(), Arc::new(component));
        self
    }

    /// Binds a handler to a hook name. A later binding for the same name replaces it.
    pub fn hook(mut self, name: impl Into<String>, priority: i32, handler: Arc<dyn HookHandler>) -> Self {
        self.plugin
            .hooks
            .insert(name.into(), HookBinding::new(priority, handler));
        self
    }

    /// Builds the plugin.
    pub fn build(self) -> Plugin {
        self.plugin
    }
}
