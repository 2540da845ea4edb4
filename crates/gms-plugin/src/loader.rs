//! Dynamic plugin loader using `libloading` (feature-gated).

#[cfg(feature = "dynamic")]
pub mod dynamic_loader {
    use std::path::Path;

    use tracing::{debug, info};

    use crate::error::LoadError;
    use crate::exports::PluginSet;
    use crate::ffi::abi::{ABI_TAG_SYMBOL, AbiTagFn, GET_PLUGINS_SYMBOL, GetPluginsFn, PLUGIN_ABI_TAG};

    /// Loads plugin sets from shared libraries (.so / .dll / .dylib).
    pub struct DynamicLoader {
        /// Loaded libraries, kept alive until [`DynamicLoader::unload_all`].
        libraries: Vec<libloading::Library>,
    }

    impl DynamicLoader {
        /// Creates a new dynamic loader.
        pub fn new() -> Self {
            Self {
                libraries: Vec::new(),
            }
        }

        /// Opens a unit, checks its ABI tag and takes its plugin set.
        ///
        /// On success the library stays loaded for the lifetime of the
        /// loader; on any failure it is closed again.
        ///
        /// # Safety
        /// This runs initialisers and the entry point of arbitrary native
        /// code. Only load trusted plugins built against this crate.
        pub unsafe fn load_from_path(&mut self, path: &Path) -> Result<PluginSet, LoadError> {
            // SAFETY: forwarded to the caller.
            let lib = unsafe { libloading::Library::new(path) }.map_err(|e| LoadError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

            let found = {
                // SAFETY: the symbol type matches the signature generated by `export_plugins!`.
                let tag_fn: libloading::Symbol<AbiTagFn> = unsafe { lib.get(ABI_TAG_SYMBOL.as_bytes()) }
                    .map_err(|e| LoadError::MissingSymbol {
                        path: path.to_path_buf(),
                        symbol: ABI_TAG_SYMBOL,
                        reason: e.to_string(),
                    })?;
                // SAFETY: the export takes no arguments and only returns a constant.
                unsafe { tag_fn() }
            };

            check_abi_tag(path, found)?;

            let raw = {
                // SAFETY: same as above, for the entry point.
                let entry: libloading::Symbol<GetPluginsFn> = unsafe { lib.get(GET_PLUGINS_SYMBOL.as_bytes()) }
                    .map_err(|e| LoadError::MissingSymbol {
                        path: path.to_path_buf(),
                        symbol: GET_PLUGINS_SYMBOL,
                        reason: e.to_string(),
                    })?;
                // SAFETY: the entry point catches panics and returns either null
                // or a pointer produced by `Box::into_raw`.
                unsafe { entry() }
            };

            // SAFETY: `raw` is what the entry point returned.
            let set = unsafe { take_plugin_set(path, raw) }?;

            info!(
                path = %path.display(),
                plugins = set.len(),
                "Dynamic plugin unit loaded"
            );

            self.libraries.push(lib);

            Ok(set)
        }

        /// Number of libraries currently held open.
        pub fn library_count(&self) -> usize {
            self.libraries.len()
        }

        /// Closes every library. Anything created by them must already be dropped.
        pub fn unload_all(&mut self) -> usize {
            let count = self.libraries.len();
            self.libraries.clear();
            debug!(count = count, "Plugin libraries closed");
            count
        }
    }

    impl Default for DynamicLoader {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Rejects a unit whose tag differs from [`PLUGIN_ABI_TAG`].
    pub(crate) fn check_abi_tag(path: &Path, found: u32) -> Result<(), LoadError> {
        if found == PLUGIN_ABI_TAG {
            Ok(())
        } else {
            Err(LoadError::AbiMismatch {
                path: path.to_path_buf(),
                expected: PLUGIN_ABI_TAG,
                found,
            })
        }
    }

    /// Takes ownership of the set returned by an entry point.
    ///
    /// # Safety
    /// `raw` must be null or a pointer produced by `Box::into_raw` that
    /// nothing else owns.
    pub(crate) unsafe fn take_plugin_set(path: &Path, raw: *mut PluginSet) -> Result<PluginSet, LoadError> {
        if raw.is_null() {
            return Err(LoadError::EmptyEntry {
                path: path.to_path_buf(),
            });
        }
        // SAFETY: non-null and owned, per the contract above.
        Ok(*unsafe { Box::from_raw(raw) })
    }

    impl std::fmt::Debug for DynamicLoader {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("DynamicLoader")
                .field("loaded_count", &self.libraries.len())
                .finish()
        }
    }
}

/// Stub loader when dynamic feature is not enabled.
#[cfg(not(feature = "dynamic"))]
pub mod dynamic_loader {
    use std::path::Path;

    use crate::error::LoadError;
    use crate::exports::PluginSet;

    /// Stub dynamic loader. Every load fails with
    /// [`LoadError::DynamicLoadingDisabled`].
    #[derive(Debug)]
    pub struct DynamicLoader;

    impl DynamicLoader {
        /// Creates a stub loader.
        pub fn new() -> Self {
            Self
        }

        /// Always fails.
        ///
        /// # Safety
        /// Always safe; kept `unsafe` to match the dynamic build.
        pub unsafe fn load_from_path(&mut self, path: &Path) -> Result<PluginSet, LoadError> {
            Err(LoadError::DynamicLoadingDisabled {
                path: path.to_path_buf(),
            })
        }

        /// Always zero.
        pub fn library_count(&self) -> usize {
            0
        }

        /// Nothing to close.
        pub fn unload_all(&mut self) -> usize {
            0
        }
    }

    impl Default for DynamicLoader {
        fn default() -> Self {
            Self::new()
        }
    }
}

pub use dynamic_loader::DynamicLoader;

#[cfg(all(test, feature = "dynamic"))]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use super::dynamic_loader::{check_abi_tag, take_plugin_set};
    use super::*;
    use crate::error::LoadError;
    use crate::exports::{PluginBuilder, PluginSet};
    use crate::ffi::abi::{ABI_TAG_SYMBOL, PLUGIN_ABI_TAG, entry_shim};

    #[test]
    fn test_abi_tag_check() {
        let path = Path::new("/plugins/libold.so");
        assert!(check_abi_tag(path, PLUGIN_ABI_TAG).is_ok());

        let err = check_abi_tag(path, PLUGIN_ABI_TAG + 1).unwrap_err();
        assert!(matches!(
            err,
            LoadError::AbiMismatch { expected, found, .. }
                if expected == PLUGIN_ABI_TAG && found == PLUGIN_ABI_TAG + 1
        ));
    }

    #[test]
    fn test_null_entry_is_empty_entry() {
        let path = Path::new("/plugins/libpanicky.so");
        let err = unsafe { take_plugin_set(path, std::ptr::null_mut()) }.unwrap_err();
        assert!(matches!(err, LoadError::EmptyEntry { .. }));
        assert_eq!(err.path(), path);
    }

    #[test]
    fn test_entry_pointer_is_taken_over() {
        fn entry() -> PluginSet {
            PluginSet::new().with("sample", PluginBuilder::new("Sample").build())
        }

        let raw = entry_shim(entry);
        let set = unsafe { take_plugin_set(Path::new("/plugins/libsample.so"), raw) }.unwrap();
        assert_eq!(set.names(), vec!["sample"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_library_without_exports_is_missing_symbol() {
        let mut loader = DynamicLoader::new();
        let err = unsafe { loader.load_from_path(Path::new("libc.so.6")) }.unwrap_err();
        assert!(
            matches!(err, LoadError::MissingSymbol { symbol, .. } if symbol == ABI_TAG_SYMBOL),
            "unexpected: {err}"
        );
        assert_eq!(loader.library_count(), 0);
    }

    #[test]
    fn test_garbage_file_is_open_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".so")
            .tempfile()
            .unwrap();
        file.write_all(b"definitely not an ELF object").unwrap();

        let mut loader = DynamicLoader::new();
        let err = unsafe { loader.load_from_path(file.path()) }.unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }), "unexpected: {err}");
        assert_eq!(err.path(), file.path());
        assert_eq!(loader.library_count(), 0);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = DynamicLoader::new();
        let err = unsafe { loader.load_from_path(&dir.path().join("absent.so")) }.unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
