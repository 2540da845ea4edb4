//! Components: catalog entries, per-render view models and the renderer.

pub mod builtin;
pub mod model;
pub mod renderer;
pub mod viewmodel;

pub use model::{
    Component, ComponentBuilder, ComponentMedia, ComponentProperty, MediaDef, PropertyDef,
    PropertyKind, PropertyTier, PropertyValue,
};
pub use renderer::Renderer;
pub use viewmodel::{ComponentViewModel, RestScope};
