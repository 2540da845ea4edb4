//! Hook registry: plugins register handlers by hook name with priority ordering.
//!
//! Each hook name maps to registrations sorted by descending priority. Equal
//! priorities keep registration order. Many plugins may handle the same name.

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::definitions::{
    DispatchResult, HandlerOutput, HookArgs, HookContext, HookFailure, HookOutput,
};
use crate::error::HandlerError;

/// Failure message recorded for a handler that panicked.
pub const HANDLER_PANICKED: &str = "handler panicked";

/// Trait for hook handler implementations.
#[async_trait]
pub trait HookHandler: Send + Sync + fmt::Debug {
    /// Handles one invocation of the hook.
    async fn handle(&self, ctx: &HookContext, args: &HookArgs) -> Result<HandlerOutput, HandlerError>;
}

/// Entry in the hook registry.
#[derive(Debug, Clone)]
pub struct HookRegistration {
    /// Plugin that registered this handler.
    pub plugin_id: String,
    /// Higher runs earlier.
    pub priority: i32,
    /// The handler.
    pub handler: Arc<dyn HookHandler>,
}

/// Registry of hook handlers organized by hook name.
#[derive(Debug)]
pub struct HookRegistry {
    /// Hook name → registrations, highest priority first.
    hooks: RwLock<HashMap<String, Vec<HookRegistration>>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a handler for a hook name.
    ///
    /// The new entry is appended and then moved left past strictly lower
    /// priorities only, so existing entries keep their relative order.
    pub async fn register(
        &self,
        plugin_id: &str,
        hook: &str,
        priority: i32,
        handler: Arc<dyn HookHandler>,
    ) {
        let mut hooks = self.hooks.write().await;
        let entries = hooks.entry(hook.to_string()).or_default();

        entries.push(HookRegistration {
            plugin_id: plugin_id.to_string(),
            priority,
            handler,
        });

        let mut i = entries.len() - 1;
        while i > 0 && entries[i].priority > entries[i - 1].priority {
            entries.swap(i, i - 1);
            i -= 1;
        }

        info!(
            hook = %hook,
            plugin_id = %plugin_id,
            priority = priority,
            position = i,
            "Hook handler registered"
        );
    }

    /// Removes every handler owned by a plugin, across all hook names.
    ///
    /// Returns the number of registrations removed.
    pub async fn unregister_all(&self, plugin_id: &str) -> usize {
        let mut hooks = self.hooks.write().await;
        let mut removed = 0;

        for entries in hooks.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.plugin_id != plugin_id);
            removed += before - entries.len();
        }

        hooks.retain(|_, entries| !entries.is_empty());

        info!(plugin_id = %plugin_id, removed = removed, "All hooks unregistered for plugin");
        removed
    }

    /// Returns a snapshot of the registrations for a hook name.
    pub async fn get(&self, hook: &str) -> Vec<HookRegistration> {
        let hooks = self.hooks.read().await;
        hooks.get(hook).cloned().unwrap_or_default()
    }

    /// Runs every handler for a hook and returns the collected failures.
    ///
    /// Handlers run sequentially on the calling task in priority order. A
    /// failure never stops the remaining handlers; a handler that panics is
    /// recorded as a failure.
    pub async fn invoke(&self, hook: &str, ctx: &HookContext, args: &HookArgs) -> Vec<HookFailure> {
        self.dispatch(hook, ctx, args).await.failures
    }

    /// Like [`HookRegistry::invoke`], also returning handler outputs.
    pub async fn dispatch(&self, hook: &str, ctx: &HookContext, args: &HookArgs) -> DispatchResult {
        let registrations = self.get(hook).await;
        let mut result = DispatchResult::default();

        if registrations.is_empty() {
            return result;
        }

        debug!(
            hook = %hook,
            invocation_id = %ctx.invocation_id,
            handler_count = registrations.len(),
            "Dispatching hook"
        );

        for registration in &registrations {
            result.handled += 1;
            let outcome = AssertUnwindSafe(registration.handler.handle(ctx, args))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(HandlerError::failed(HANDLER_PANICKED)));

            match outcome {
                Ok(Some(value)) => result.outputs.push(HookOutput {
                    plugin_id: registration.plugin_id.clone(),
                    value,
                }),
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        hook = %hook,
                        plugin_id = %registration.plugin_id,
                        invocation_id = %ctx.invocation_id,
                        error = %error,
                        "Hook handler failed"
                    );
                    result.failures.push(HookFailure {
                        hook: hook.to_string(),
                        plugin_id: registration.plugin_id.clone(),
                        priority: registration.priority,
                        message: error.to_string(),
                        error,
                    });
                }
            }
        }

        result
    }

    /// Returns whether any handlers are registered for a hook name.
    pub async fn has_handlers(&self, hook: &str) -> bool {
        let hooks = self.hooks.read().await;
        hooks.get(hook).is_some_and(|entries| !entries.is_empty())
    }

    /// Returns the number of handlers registered for a hook name.
    pub async fn handler_count(&self, hook: &str) -> usize {
        let hooks = self.hooks.read().await;
        hooks.get(hook).map_or(0, Vec::len)
    }

    /// Returns all hook names with at least one handler, sorted.
    pub async fn registered_hooks(&self) -> Vec<String> {
        let hooks = self.hooks.read().await;
        let mut names: Vec<String> = hooks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drops every registration.
    pub async fn clear(&self) {
        let mut hooks = self.hooks.write().await;
        hooks.clear();
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug)]
    struct Recorder {
        label: &'static str,
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl HookHandler for Recorder {
        async fn handle(&self, _ctx: &HookContext, _args: &HookArgs) -> Result<HandlerOutput, HandlerError> {
            self.calls.lock().unwrap().push(self.label);
            if self.fail {
                Err(HandlerError::failed(format!("{} failed", self.label)))
            } else {
                Ok(Some(serde_json::json!(self.label)))
            }
        }
    }

    fn recorder(label: &'static str, calls: &Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn HookHandler> {
        Arc::new(Recorder {
            label,
            calls: Arc::clone(calls),
            fail: false,
        })
    }

    fn failing(label: &'static str, calls: &Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn HookHandler> {
        Arc::new(Recorder {
            label,
            calls: Arc::clone(calls),
            fail: true,
        })
    }

    fn priorities(entries: &[HookRegistration]) -> Vec<i32> {
        entries.iter().map(|e| e.priority).collect()
    }

    #[tokio::test]
    async fn test_equal_priorities_keep_registration_order() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        registry.register("p1", "x", 5, recorder("H1", &calls)).await;
        registry.register("p2", "x", 10, recorder("H2", &calls)).await;
        registry.register("p3", "x", 5, recorder("H3", &calls)).await;

        let owners: Vec<String> = registry
            .get("x")
            .await
            .into_iter()
            .map(|r| r.plugin_id)
            .collect();
        assert_eq!(owners, vec!["p2", "p1", "p3"]);

        let failures = registry.invoke("x", &HookContext::new(), &HookArgs::new()).await;
        assert!(failures.is_empty());
        assert_eq!(*calls.lock().unwrap(), vec!["H2", "H1", "H3"]);
    }

    #[tokio::test]
    async fn test_any_registration_sequence_stays_sorted() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

        for _ in 0..20 {
            let registry = HookRegistry::new();
            let mut inserted: Vec<(i32, usize)> = Vec::new();
            for n in 0..30 {
                seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let priority = ((seed >> 33) % 7) as i32 - 3;
                registry
                    .register(&format!("p{n}"), "render", priority, recorder("h", &calls))
                    .await;
                inserted.push((priority, n));
            }

            let entries = registry.get("render").await;
            let got = priorities(&entries);
            assert!(got.windows(2).all(|w| w[0] >= w[1]), "not sorted: {got:?}");

            // Stable: equal priorities appear in registration order.
            inserted.sort_by(|a, b| b.0.cmp(&a.0));
            let expected: Vec<String> = inserted.iter().map(|(_, n)| format!("p{n}")).collect();
            let owners: Vec<String> = entries.into_iter().map(|r| r.plugin_id).collect();
            assert_eq!(owners, expected);
        }
    }

    #[tokio::test]
    async fn test_unregister_all_removes_only_owner() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        registry.register("counter", "counterUpdated", 0, recorder("a", &calls)).await;
        registry.register("audit", "counterUpdated", 3, recorder("b", &calls)).await;
        registry.register("counter", "pageRendered", 1, recorder("c", &calls)).await;
        registry.register("audit", "pageRendered", 1, recorder("d", &calls)).await;
        registry.register("counter", "pageRendered", 7, recorder("e", &calls)).await;

        let removed = registry.unregister_all("counter").await;
        assert_eq!(removed, 3);

        for hook in ["counterUpdated", "pageRendered"] {
            let entries = registry.get(hook).await;
            assert!(entries.iter().all(|e| e.plugin_id == "audit"));
            assert_eq!(entries.len(), 1);
        }
        assert_eq!(registry.registered_hooks().await, vec!["counterUpdated", "pageRendered"]);

        assert_eq!(registry.unregister_all("audit").await, 2);
        assert!(registry.registered_hooks().await.is_empty());
    }

    #[tokio::test]
    async fn test_unregister_preserves_order_of_rest() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        registry.register("a", "x", 5, recorder("a1", &calls)).await;
        registry.register("b", "x", 5, recorder("b1", &calls)).await;
        registry.register("a", "x", 9, recorder("a2", &calls)).await;
        registry.register("c", "x", 1, recorder("c1", &calls)).await;
        registry.register("b", "x", 9, recorder("b2", &calls)).await;

        registry.unregister_all("a").await;
        let entries = registry.get("x").await;
        assert_eq!(priorities(&entries), vec![9, 5, 1]);
        let owners: Vec<&str> = entries.iter().map(|e| e.plugin_id.as_str()).collect();
        assert_eq!(owners, vec!["b", "b", "c"]);
    }

    #[tokio::test]
    async fn test_invoke_unknown_hook_is_noop() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::<&'static str>::new()));
        registry.register("p", "other", 0, recorder("h", &calls)).await;

        let failures = registry
            .invoke("missing", &HookContext::new(), &HookArgs::new())
            .await;
        assert!(failures.is_empty());
        assert!(calls.lock().unwrap().is_empty());
        assert!(registry.get("missing").await.is_empty());
        assert!(!registry.has_handlers("missing").await);
    }

    #[tokio::test]
    async fn test_failures_are_collected_not_short_circuited() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        registry.register("p1", "save", 10, failing("first", &calls)).await;
        registry.register("p2", "save", 5, recorder("second", &calls)).await;
        registry.register("p3", "save", 1, failing("third", &calls)).await;

        let result = registry
            .dispatch("save", &HookContext::new(), &HookArgs::new())
            .await;

        assert_eq!(result.handled, 3);
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.outputs[0].plugin_id, "p2");

        let owners: Vec<&str> = result.failures.iter().map(|f| f.plugin_id.as_str()).collect();
        assert_eq!(owners, vec!["p1", "p3"]);
        assert_eq!(result.failures[0].message, "first failed");
        assert!(!result.is_success());
    }

    #[derive(Debug)]
    struct Panicker;

    #[async_trait]
    impl HookHandler for Panicker {
        async fn handle(&self, _ctx: &HookContext, _args: &HookArgs) -> Result<HandlerOutput, HandlerError> {
            panic!("handler exploded")
        }
    }

    #[tokio::test]
    async fn test_panicking_handler_is_collected_and_rest_still_run() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        registry.register("bad", "x", 10, Arc::new(Panicker)).await;
        registry.register("good", "x", 1, recorder("lower", &calls)).await;

        let result = registry
            .dispatch("x", &HookContext::new(), &HookArgs::new())
            .await;

        assert_eq!(result.handled, 2);
        assert_eq!(*calls.lock().unwrap(), vec!["lower"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].plugin_id, "bad");
        assert_eq!(result.failures[0].error, HandlerError::failed(HANDLER_PANICKED));
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.outputs[0].plugin_id, "good");
    }

    #[tokio::test]
    async fn test_registry_does_not_enforce_cancellation() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("p", "x", 0, recorder("ran", &calls)).await;

        let ctx = HookContext::new();
        ctx.cancellation.cancel();
        let failures = registry.invoke("x", &ctx, &HookArgs::new()).await;

        assert!(failures.is_empty());
        assert_eq!(*calls.lock().unwrap(), vec!["ran"]);
    }
}
