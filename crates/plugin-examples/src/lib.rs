//! Example plugins for the GMS extension host.
//!
//! Built as a `cdylib` this crate is a loadable plugin unit; as an `rlib` the
//! same set can be registered statically with [`get_plugins`].

pub mod hello_world;
pub mod ui_kit;

use gms_plugin::prelude::*;

/// Every plugin this unit exports, keyed by plugin name.
pub fn get_plugins() -> PluginSet {
    PluginSet::new()
        .with(hello_world::PLUGIN_NAME, hello_world::plugin())
        .with(ui_kit::PLUGIN_NAME, ui_kit::plugin())
}

export_plugins!(get_plugins);
