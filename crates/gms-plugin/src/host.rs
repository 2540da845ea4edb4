//! Extension host: owns the plugin, component and hook catalogs.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use gms_core::config::{AppConfig, HooksConfig};
use gms_core::AppResult;

use crate::components::renderer::Renderer;
use crate::components::viewmodel::ComponentViewModel;
use crate::error::DiscoveryError;
use crate::exports::PluginSet;
use crate::hooks::definitions::{DispatchResult, HookArgs, HookContext, HookFailure};
use crate::hooks::registry::HookRegistry;
use crate::html::Node;
use crate::manager::{PluginManager, ScanReport};

/// Explicitly constructed host instance.
///
/// Created at start-up and torn down with [`Host::shutdown`].
#[derive(Debug)]
pub struct Host {
    manager: Arc<PluginManager>,
    hooks_config: HooksConfig,
    startup_report: Option<ScanReport>,
}

impl Host {
    /// Creates a host with the built-in component catalog and nothing loaded.
    pub fn new() -> Self {
        Self::with_hooks_config(HooksConfig::default())
    }

    /// Creates an empty host using the given hook settings.
    pub fn with_hooks_config(hooks_config: HooksConfig) -> Self {
        let hook_registry = Arc::new(HookRegistry::new());
        let renderer = Arc::new(Renderer::new());
        Self {
            manager: Arc::new(PluginManager::new(hook_registry, renderer)),
            hooks_config,
            startup_report: None,
        }
    }

    /// Creates a host and, when `plugins.auto_load` is set, scans the plugin
    /// directory.
    ///
    /// Without `plugins.fail_fast`, an unreadable directory or a unit that
    /// fails to load is logged and start-up continues.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let mut host = Self::with_hooks_config(config.hooks.clone());

        if !config.plugins.auto_load {
            info!("Plugin auto-load disabled");
            return Ok(host);
        }

        match host.scan(Path::new(&config.plugins.directory)).await {
            Ok(mut report) => {
                if config.plugins.fail_fast && !report.failures.is_empty() {
                    let first = report.failures.remove(0);
                    return Err(first.into());
                }
                host.startup_report = Some(report);
            }
            Err(err) if config.plugins.fail_fast => return Err(err.into()),
            Err(err) => {
                warn!(error = %err, "Continuing without dynamic plugins");
            }
        }

        Ok(host)
    }

    /// Scans a directory for plugin units.
    pub async fn scan(&self, dir: &Path) -> Result<ScanReport, DiscoveryError> {
        self.manager.scan(dir).await
    }

    /// Merges a compiled-in plugin set.
    pub async fn register_static(&self, source: &str, set: PluginSet) -> ScanReport {
        self.manager.register_static(source, set).await
    }

    /// Report of the scan performed by [`Host::from_config`], if any.
    pub fn startup_report(&self) -> Option<&ScanReport> {
        self.startup_report.as_ref()
    }

    /// Returns the plugin manager.
    pub fn plugins(&self) -> &Arc<PluginManager> {
        &self.manager
    }

    /// Returns the hook registry.
    pub fn hooks(&self) -> &Arc<HookRegistry> {
        self.manager.hook_registry()
    }

    /// Returns the renderer.
    pub fn components(&self) -> &Arc<Renderer> {
        self.manager.renderer()
    }

    /// Builds a context carrying the configured hook deadline.
    pub fn hook_context(&self) -> HookContext {
        match self.hooks_config.timeout() {
            Some(timeout) => HookContext::new().with_timeout(timeout),
            None => HookContext::new(),
        }
    }

    /// Renders a view model.
    pub async fn render(&self, vm: &ComponentViewModel) -> Node {
        self.components().render(vm).await
    }

    /// Runs every handler for `hook` with a fresh context.
    pub async fn invoke(&self, hook: &str, args: &HookArgs) -> Vec<HookFailure> {
        self.hooks().invoke(hook, &self.hook_context(), args).await
    }

    /// Runs every handler for `hook` with a fresh context, keeping outputs.
    pub async fn dispatch(&self, hook: &str, args: &HookArgs) -> DispatchResult {
        self.hooks().dispatch(hook, &self.hook_context(), args).await
    }

    /// Tears the host down: catalogs first, then the libraries behind them.
    pub async fn shutdown(self) {
        self.manager.shutdown().await;
        info!("Host shut down");
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gms_core::config::PluginConfig;
    use gms_core::error::ErrorKind;

    use super::*;
    use crate::components::builtin::CONTAINER;

    fn config_for(dir: &Path, fail_fast: bool) -> AppConfig {
        AppConfig {
            plugins: PluginConfig {
                directory: dir.display().to_string(),
                auto_load: true,
                fail_fast,
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_new_host_has_builtin_catalog_only() {
        let host = Host::new();
        assert!(host.plugins().loaded().await.is_empty());
        assert!(host.components().contains(CONTAINER).await);
        assert!(host.hooks().registered_hooks().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_is_tolerated_without_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let host = Host::from_config(&config_for(&dir.path().join("missing"), false))
            .await
            .unwrap();
        assert!(host.startup_report().is_none());
    }

    #[tokio::test]
    async fn test_missing_directory_fails_with_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let err = Host::from_config(&config_for(&dir.path().join("missing"), true))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
    }

    #[tokio::test]
    async fn test_bad_unit_fails_only_with_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.so"), b"nope").unwrap();

        let host = Host::from_config(&config_for(dir.path(), false)).await.unwrap();
        assert_eq!(host.startup_report().map(|r| r.failures.len()), Some(1));

        let err = Host::from_config(&config_for(dir.path(), true)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Plugin);
        assert!(err.message.contains("broken.so"));
    }

    #[tokio::test]
    async fn test_auto_load_disabled_skips_scan() {
        let mut config = config_for(Path::new("/definitely/not/here"), true);
        config.plugins.auto_load = false;
        let host = Host::from_config(&config).await.unwrap();
        assert!(host.startup_report().is_none());
    }

    #[tokio::test]
    async fn test_hook_context_uses_configured_timeout() {
        let host = Host::with_hooks_config(HooksConfig { timeout_ms: 250 });
        let ctx = host.hook_context();
        let remaining = ctx.deadline.map(|d| d - tokio::time::Instant::now());
        assert!(remaining.is_some_and(|r| r <= Duration::from_millis(250)));

        let host = Host::with_hooks_config(HooksConfig { timeout_ms: 0 });
        assert!(host.hook_context().deadline.is_none());
    }
}
