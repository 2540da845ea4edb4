//! ABI definitions for dynamic plugins.
//!
//! A unit exports two unmangled functions, normally generated by
//! [`export_plugins!`](crate::export_plugins):
//!
//! ```text
//! extern "C" fn _gms_plugin_abi_tag() -> u32;
//! extern "C" fn _gms_get_plugins() -> *mut PluginSet;
//! ```
//!
//! The plugin set is a Rust value, so host and unit must be built by the same
//! toolchain against the same `gms-plugin`. The tag guards against mixing
//! incompatible builds; bump it whenever a type crossing the boundary changes.

use crate::exports::PluginSet;

/// Tag a unit must report for the host to accept it.
pub const PLUGIN_ABI_TAG: u32 = 1;

/// Name of the tag export.
pub const ABI_TAG_SYMBOL: &str = "_gms_plugin_abi_tag";

/// Name of the entry-point export.
pub const GET_PLUGINS_SYMBOL: &str = "_gms_get_plugins";

/// Signature of the tag export.
pub type AbiTagFn = unsafe extern "C" fn() -> u32;

/// Signature of the entry point.
///
/// Returns a boxed [`PluginSet`] the host takes ownership of, or null when the
/// unit's entry function panicked.
pub type GetPluginsFn = unsafe extern "C" fn() -> *mut PluginSet;

/// Runs a unit's entry function and hands the result across the boundary.
///
/// Used by [`export_plugins!`](crate::export_plugins); a panic in `entry`
/// becomes a null pointer.
#[doc(hidden)]
pub fn entry_shim(entry: fn() -> PluginSet) -> *mut PluginSet {
    match std::panic::catch_unwind(entry) {
        Ok(set) => Box::into_raw(Box::new(set)),
        Err(_) => std::ptr::null_mut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_names_match_generated_exports() {
        assert_eq!(ABI_TAG_SYMBOL, "_gms_plugin_abi_tag");
        assert_eq!(GET_PLUGINS_SYMBOL, "_gms_get_plugins");
        assert!(PLUGIN_ABI_TAG >= 1);
    }

    #[test]
    fn test_entry_shim_catches_panics() {
        fn exploding() -> PluginSet {
            panic!("entry exploded")
        }

        assert!(entry_shim(exploding).is_null());
    }

    #[test]
    fn test_entry_shim_boxes_the_set() {
        fn empty() -> PluginSet {
            PluginSet::new()
        }

        let raw = entry_shim(empty);
        assert!(!raw.is_null());
        // SAFETY: `raw` came from `Box::into_raw` above.
        let set = unsafe { Box::from_raw(raw) };
        assert!(set.is_empty());
    }
}
