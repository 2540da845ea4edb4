//! # gms-plugin
//!
//! Extension host for GMS. Provides:
//!
//! - Discovery of plugin units in a directory, loaded via `libloading`
//!   (feature `dynamic`, on by default), plus static registration
//! - A hook registry with descending-priority, registration-stable ordering
//! - Three-tier property resolution on per-render view models
//! - A component renderer with a deterministic fallback for unknown ids
//! - An authoring kit (`prelude`, `export_plugins!`) for plugin crates

pub mod components;
pub mod error;
pub mod exports;
pub mod ffi;
pub mod hooks;
pub mod host;
pub mod html;
pub mod loader;
pub mod macros;
pub mod manager;
pub mod manifest;
pub mod prelude;
pub mod registry;
pub mod traits;

pub use components::{ComponentViewModel, Renderer};
pub use error::{DiscoveryError, HandlerError, LoadError, ManifestError, PropertyError};
pub use exports::{PluginBuilder, PluginSet};
pub use hooks::{HookContext, HookRegistry};
pub use host::Host;
pub use manager::{PluginManager, ScanReport};
pub use manifest::PluginManifest;
pub use registry::{Plugin, PluginInfo};
