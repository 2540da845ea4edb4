//! Entry-point contract shared by the host and dynamic plugin units.

pub mod abi;

pub use abi::{ABI_TAG_SYMBOL, AbiTagFn, GET_PLUGINS_SYMBOL, GetPluginsFn, PLUGIN_ABI_TAG};
