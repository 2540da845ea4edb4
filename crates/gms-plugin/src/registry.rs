//! Plugin model: metadata plus the components and hooks a plugin contributes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::components::model::Component;
use crate::hooks::definitions::HookBinding;

/// Metadata about a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Human-readable plugin name.
    pub name: String,
    /// Author or maintainer.
    pub author: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    pub description: String,
    /// Permissions the plugin asks for.
    pub permissions: Vec<String>,
}

/// A loaded plugin.
///
/// Components are keyed by the identifier they are rendered under; hooks are
/// keyed by hook name with at most one binding per name.
#[derive(Clone, Default)]
pub struct Plugin {
    /// Metadata.
    pub info: PluginInfo,
    /// Component identifier → component.
    pub components: HashMap<String, Arc<Component>>,
    /// Hook name → handler binding.
    pub hooks: HashMap<String, HookBinding>,
}

impl Plugin {
    /// Creates a plugin with no contributions.
    pub fn new(info: PluginInfo) -> Self {
        Self {
            info,
            components: HashMap::new(),
            hooks: HashMap::new(),
        }
    }

    /// Component identifiers, sorted.
    pub fn component_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.components.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Hook names, sorted.
    pub fn hook_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hooks.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("info", &self.info)
            .field("components", &self.component_ids())
            .field("hooks", &self.hook_names())
            .finish()
    }
}

/// Listing entry for a loaded plugin.
#[derive(Debug, Clone, Serialize)]
pub struct PluginSummary {
    /// Key the plugin is registered under.
    pub id: String,
    /// Metadata.
    #[serde(flatten)]
    pub info: PluginInfo,
    /// Contributed component identifiers.
    pub components: Vec<String>,
    /// Contributed hook names.
    pub hooks: Vec<String>,
}

impl PluginSummary {
    /// Builds a summary for a plugin registered under `id`.
    pub fn new(id: &str, plugin: &Plugin) -> Self {
        Self {
            id: id.to_string(),
            info: plugin.info.clone(),
            components: plugin.component_ids(),
            hooks: plugin.hook_names(),
        }
    }
}
