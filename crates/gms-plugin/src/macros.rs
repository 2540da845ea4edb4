//! Convenience macros for plugin development.

/// Generates the dynamic entry points for a plugin unit.
///
/// `$entry` is a function `fn() -> PluginSet`. A panic inside it is caught
/// and reported to the host as a null entry instead of unwinding across the
/// boundary.
///
/// # Example
/// ```rust,ignore
/// fn get_plugins() -> PluginSet {
///     PluginSet::new().with("hello-world", PluginBuilder::new("Hello World").build())
/// }
///
/// gms_plugin::export_plugins!(get_plugins);
/// ```
#[macro_export]
macro_rules! export_plugins {
    ($entry:path) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn _gms_plugin_abi_tag() -> u32 {
            $crate::ffi::abi::PLUGIN_ABI_TAG
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _gms_get_plugins() -> *mut $crate::exports::PluginSet {
            $crate::ffi::abi::entry_shim($entry)
        }
    };
}

/// Builds a `HookArgs` map.
///
/// # Example
/// ```rust,ignore
/// let args = hook_args! {
///     "action" => json!("increment"),
///     "count" => json!(3),
/// };
/// ```
#[macro_export]
macro_rules! hook_args {
    () => {
        $crate::hooks::definitions::HookArgs::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::hooks::definitions::HookArgs::new();
        $(
            args.insert(::std::string::ToString::to_string(&$key), $value);
        )+
        args
    }};
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::exports::PluginSet;
    use crate::ffi::abi::PLUGIN_ABI_TAG;
    use crate::registry::PluginInfo;

    mod healthy {
        use crate::exports::{PluginBuilder, PluginSet};

        fn entry() -> PluginSet {
            PluginSet::new().with("beacon", PluginBuilder::new("Beacon").version("0.1.0").build())
        }

        crate::export_plugins!(entry);
    }

    #[test]
    fn test_generated_exports_hand_over_the_set() {
        assert_eq!(healthy::_gms_plugin_abi_tag(), PLUGIN_ABI_TAG);

        let raw = healthy::_gms_get_plugins();
        assert!(!raw.is_null());
        // SAFETY: the generated export returns a pointer from `Box::into_raw`.
        let set: Box<PluginSet> = unsafe { Box::from_raw(raw) };
        assert_eq!(set.names(), vec!["beacon"]);
        let expected = PluginInfo {
            name: "Beacon".to_string(),
            version: "0.1.0".to_string(),
            ..PluginInfo::default()
        };
        assert_eq!(set.get("beacon").map(|p| &p.info), Some(&expected));
    }

    #[test]
    fn test_hook_args_macro() {
        let empty = hook_args!();
        assert!(empty.is_empty());

        let args = hook_args! {
            "action" => json!("increment"),
            "count" => json!(3),
        };
        assert_eq!(args.len(), 2);
        assert_eq!(args["action"], json!("increment"));
    }
}
