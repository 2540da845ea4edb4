//! Hook invocation context, arguments and results.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::HandlerError;
use crate::hooks::registry::HookHandler;

/// Arguments passed to every handler of one invocation.
pub type HookArgs = serde_json::Map<String, serde_json::Value>;

/// Value a handler may hand back to the caller.
pub type HandlerOutput = Option<serde_json::Value>;

/// Execution context supplied by the caller of an invocation.
///
/// The registry never inspects it; handlers that run long should check
/// [`HookContext::is_cancelled`] or await [`HookContext::cancelled`].
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Correlation id for logs.
    pub invocation_id: Uuid,
    /// When the caller created the context.
    pub started_at: DateTime<Utc>,
    /// Cancellation signal owned by the caller.
    pub cancellation: CancellationToken,
    /// Optional deadline.
    pub deadline: Option<Instant>,
    /// Who triggered the event, if known.
    pub actor: Option<String>,
    /// Request path that triggered the event, if any.
    pub request_path: Option<String>,
}

impl HookContext {
    /// Creates a context with a fresh token and no deadline.
    pub fn new() -> Self {
        Self {
            invocation_id: Uuid::now_v7(),
            started_at: Utc::now(),
            cancellation: CancellationToken::new(),
            deadline: None,
            actor: None,
            request_path: None,
        }
    }

    /// Sets a deadline relative to now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Uses a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Sets the actor.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Sets the triggering request path.
    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = Some(path.into());
        self
    }

    /// Whether the token was cancelled or the deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns `Err(HandlerError::Cancelled)` once the context is cancelled.
    pub fn check(&self) -> Result<(), HandlerError> {
        if self.is_cancelled() {
            Err(HandlerError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the token is cancelled or the deadline passes.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancellation.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancellation.cancelled().await,
        }
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A handler contributed by a plugin together with its priority.
#[derive(Debug, Clone)]
pub struct HookBinding {
    /// Higher runs earlier.
    pub priority: i32,
    /// The handler.
    pub handler: Arc<dyn HookHandler>,
}

impl HookBinding {
    /// Creates a binding.
    pub fn new(priority: i32, handler: Arc<dyn HookHandler>) -> Self {
        Self { priority, handler }
    }
}

/// A handler failure collected during an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookFailure {
    /// Hook name.
    pub hook: String,
    /// Owner of the failing handler.
    pub plugin_id: String,
    /// Priority of the failing handler.
    pub priority: i32,
    /// Error message.
    pub message: String,
    /// The handler's error.
    #[serde(skip)]
    pub error: HandlerError,
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hook '{}' handler from '{}' failed: {}",
            self.hook, self.plugin_id, self.error
        )
    }
}

/// Output produced by one successful handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookOutput {
    /// Owner of the handler.
    pub plugin_id: String,
    /// Returned value.
    pub value: serde_json::Value,
}

/// Aggregated result of running every handler for a hook.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchResult {
    /// Number of handlers that ran.
    pub handled: usize,
    /// Values returned by successful handlers, in priority order.
    pub outputs: Vec<HookOutput>,
    /// Failures in priority order.
    pub failures: Vec<HookFailure>,
}

impl DispatchResult {
    /// Whether every handler succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_not_cancelled() {
        let ctx = HookContext::new().with_actor("admin");
        assert!(!ctx.is_cancelled());
        assert!(ctx.check().is_ok());
        assert_eq!(ctx.actor.as_deref(), Some("admin"));
    }

    #[test]
    fn test_cancelled_token_is_observed() {
        let token = CancellationToken::new();
        let ctx = HookContext::new().with_cancellation(token.clone());
        token.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.check(), Err(HandlerError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let ctx = HookContext::new().with_timeout(Duration::from_millis(50));
        assert!(!ctx.is_cancelled());
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
    }
}
