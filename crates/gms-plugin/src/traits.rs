//! Simplified handler types for plugin development.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::hooks::definitions::{HandlerOutput, HookArgs, HookContext};
use crate::hooks::registry::HookHandler;

type BoxedHandlerFuture = Pin<Box<dyn Future<Output = Result<HandlerOutput, HandlerError>> + Send>>;

/// A closure-based hook handler for quick handler creation.
///
/// The closure receives owned copies of the context and arguments so the
/// returned future can be `'static`.
pub struct ClosureHandler {
    /// Label used in debug output.
    label: String,
    /// Handler function.
    handler: Arc<dyn Fn(HookContext, HookArgs) -> BoxedHandlerFuture + Send + Sync>,
}

impl fmt::Debug for ClosureHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureHandler")
            .field("label", &self.label)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl ClosureHandler {
    /// Creates a new closure-based handler.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(HookContext, HookArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerOutput, HandlerError>> + Send + 'static,
    {
        Self {
            label: "closure".to_string(),
            handler: Arc::new(move |ctx, args| Box::pin(handler(ctx, args))),
        }
    }

    /// Sets the debug label.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Wraps the handler into an `Arc<dyn HookHandler>`.
    pub fn into_handler(self) -> Arc<dyn HookHandler> {
        Arc::new(self)
    }
}

#[async_trait]
impl HookHandler for ClosureHandler {
    async fn handle(&self, ctx: &HookContext, args: &HookArgs) -> Result<HandlerOutput, HandlerError> {
        (self.handler)(ctx.clone(), args.clone()).await
    }
}
