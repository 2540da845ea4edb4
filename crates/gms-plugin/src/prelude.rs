//! Prelude for convenient imports.

pub use async_trait::async_trait;
pub use serde_json::json;

pub use crate::components::builtin::CONTAINER;
pub use crate::components::model::{
    Component, ComponentBuilder, ComponentMedia, ComponentProperty, MediaDef, PropertyDef,
    PropertyKind, PropertyTier, PropertyValue,
};
pub use crate::components::viewmodel::{ComponentViewModel, RestScope};
pub use crate::error::{HandlerError, PropertyError};
pub use crate::exports::{PluginBuilder, PluginSet};
pub use crate::hooks::definitions::{HandlerOutput, HookArgs, HookContext};
pub use crate::hooks::registry::HookHandler;
pub use crate::html::{Element, Node};
pub use crate::registry::{Plugin, PluginInfo};
pub use crate::traits::ClosureHandler;

pub use crate::{export_plugins, hook_args};
