//! Plugin manager: discovery, loading and merging of plugin catalogs.
//!
//! Every plugin set, whether read from a shared library or compiled in, is
//! merged the same way: plugin names are unique and the first one loaded
//! wins. Its components go to the [`Renderer`] and its hooks to the
//! [`HookRegistry`]. The plugin catalog lock is taken first, then the
//! component catalog, then the hook registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::components::renderer::Renderer;
use crate::error::{DiscoveryError, LoadError};
use crate::exports::PluginSet;
use crate::hooks::registry::HookRegistry;
use crate::loader::DynamicLoader;
use crate::registry::{Plugin, PluginSummary};

/// A plugin name that was already registered and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateIgnored {
    /// Plugin name.
    pub name: String,
    /// Where the skipped copy came from.
    pub source: String,
}

/// Outcome of a directory scan or a static registration.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Number of units that were examined.
    pub units: usize,
    /// Plugin names added to the catalog, in load order.
    pub loaded: Vec<String>,
    /// Plugin names skipped because they were already present.
    pub duplicates: Vec<DuplicateIgnored>,
    /// Component identifiers skipped because another plugin owns them.
    pub shadowed_components: Vec<String>,
    /// Units that could not be loaded.
    pub failures: Vec<LoadError>,
}

impl ScanReport {
    /// Whether every unit loaded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, other: ScanReport) {
        self.units += other.units;
        self.loaded.extend(other.loaded);
        self.duplicates.extend(other.duplicates);
        self.shadowed_components.extend(other.shadowed_components);
        self.failures.extend(other.failures);
    }
}

/// Owns the merged plugin catalog and feeds the component and hook registries.
#[derive(Debug)]
pub struct PluginManager {
    /// Plugin name → plugin.
    plugins: RwLock<HashMap<String, Arc<Plugin>>>,
    /// Keeps loaded libraries alive.
    loader: Mutex<DynamicLoader>,
    /// Hook registry.
    hook_registry: Arc<HookRegistry>,
    /// Component renderer.
    renderer: Arc<Renderer>,
}

impl PluginManager {
    /// Creates a manager feeding the given registries.
    pub fn new(hook_registry: Arc<HookRegistry>, renderer: Arc<Renderer>) -> Self {
        Self {
            plugins: RwLock::new(HashMap::new()),
            loader: Mutex::new(DynamicLoader::new()),
            hook_registry,
            renderer,
        }
    }

    /// Loads every non-directory entry of `dir` as a plugin unit.
    ///
    /// Entries are visited in file-name order. A unit that fails to load is
    /// recorded in the report and the scan moves on.
    pub async fn scan(&self, dir: &Path) -> Result<ScanReport, DiscoveryError> {
        let units = list_units(dir).map_err(|source| {
            error!(path = %dir.display(), error = %source, "Plugin directory unreadable");
            DiscoveryError::Unreadable {
                path: dir.to_path_buf(),
                source,
            }
        })?;

        info!(path = %dir.display(), units = units.len(), "Scanning plugin directory");

        let mut report = ScanReport::default();
        for path in units {
            report.units += 1;

            let loaded = {
                let mut loader = self.loader.lock().await;
                // SAFETY: the plugin directory is operator-controlled; units
                // are trusted native code built against this crate.
                unsafe { loader.load_from_path(&path) }
            };

            match loaded {
                Ok(set) => {
                    let merged = self.merge(&path.display().to_string(), set).await;
                    report.absorb(merged);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Plugin unit failed to load");
                    report.failures.push(err);
                }
            }
        }

        info!(
            path = %dir.display(),
            loaded = report.loaded.len(),
            duplicates = report.duplicates.len(),
            failures = report.failures.len(),
            "Plugin scan complete"
        );

        Ok(report)
    }

    /// Merges a compiled-in plugin set through the same path as a scan.
    pub async fn register_static(&self, source: &str, set: PluginSet) -> ScanReport {
        let mut report = self.merge(source, set).await;
        report.units = 1;
        report
    }

    async fn merge(&self, source: &str, set: PluginSet) -> ScanReport {
        let mut report = ScanReport::default();
        let mut plugins = self.plugins.write().await;

        for (name, plugin) in set.into_sorted() {
            if plugins.contains_key(&name) {
                debug!(plugin = %name, source = %source, "Duplicate plugin ignored");
                report.duplicates.push(DuplicateIgnored {
                    name,
                    source: source.to_string(),
                });
                continue;
            }

            let outcome = self
                .renderer
                .merge(
                    &name,
                    plugin
                        .components
                        .iter()
                        .map(|(id, component)| (id.clone(), Arc::clone(component))),
                )
                .await;
            report.shadowed_components.extend(outcome.dropped);

            for hook in plugin.hook_names() {
                if let Some(binding) = plugin.hooks.get(&hook) {
                    self.hook_registry
                        .register(&name, &hook, binding.priority, Arc::clone(&binding.handler))
                        .await;
                }
            }

            info!(
                plugin = %name,
                version = %plugin.info.version,
                source = %source,
                components = plugin.components.len(),
                hooks = plugin.hooks.len(),
                "Plugin loaded"
            );

            plugins.insert(name.clone(), Arc::new(plugin));
            report.loaded.push(name);
        }

        report
    }

    /// Snapshot of the merged catalog. Empty before anything was loaded.
    pub async fn loaded(&self) -> HashMap<String, Arc<Plugin>> {
        let plugins = self.plugins.read().await;
        plugins.clone()
    }

    /// Gets a plugin by name.
    pub async fn get(&self, name: &str) -> Option<Arc<Plugin>> {
        let plugins = self.plugins.read().await;
        plugins.get(name).cloned()
    }

    /// Returns plugin count.
    pub async fn count(&self) -> usize {
        let plugins = self.plugins.read().await;
        plugins.len()
    }

    /// Lists loaded plugins sorted by name.
    pub async fn plugin_infos(&self) -> Vec<PluginSummary> {
        let plugins = self.plugins.read().await;
        let mut summaries: Vec<PluginSummary> = plugins
            .iter()
            .map(|(name, plugin)| PluginSummary::new(name, plugin))
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Removes a plugin together with its hooks and the components it owns.
    ///
    /// The backing library, if any, stays loaded until shutdown.
    pub async fn remove(&self, name: &str) -> Option<Arc<Plugin>> {
        let mut plugins = self.plugins.write().await;
        let plugin = plugins.remove(name)?;

        let mut components = 0;
        for (id, component) in &plugin.components {
            if self.renderer.remove_owned(id, component).await {
                components += 1;
            }
        }
        let hooks = self.hook_registry.unregister_all(name).await;

        info!(plugin = %name, components = components, hooks = hooks, "Plugin removed");
        Some(plugin)
    }

    /// Clears every catalog, then closes the libraries behind them.
    pub async fn shutdown(&self) {
        let mut plugins = self.plugins.write().await;
        let count = plugins.len();
        plugins.clear();
        self.renderer.clear().await;
        self.hook_registry.clear().await;
        drop(plugins);

        let libraries = self.loader.lock().await.unload_all();
        info!(plugins = count, libraries = libraries, "Plugin manager shut down");
    }

    /// Returns the hook registry.
    pub fn hook_registry(&self) -> &Arc<HookRegistry> {
        &self.hook_registry
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new(Arc::new(HookRegistry::new()), Arc::new(Renderer::new()))
    }
}

/// Non-directory entries of `dir`, sorted by file name.
fn list_units(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut units = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        units.push(path);
    }
    units.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(units)
}
