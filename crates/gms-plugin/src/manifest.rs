//! Plugin manifest (`manifest.json`) reader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::model::{PropertyDef, PropertyKind};
use crate::error::ManifestError;
use crate::registry::PluginInfo;

/// File name looked up by [`PluginManifest::load_from_directory`].
pub const MANIFEST_FILE: &str = "manifest.json";

/// Descriptor shipped alongside a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginManifest {
    /// Plugin name.
    pub name: String,
    /// Plugin version.
    pub version: String,
    /// Author.
    pub author: String,
    /// Description.
    pub description: String,
    /// Host version the plugin was written for.
    #[serde(rename = "gmsVersion")]
    pub gms_version: String,
    /// Requested permissions.
    pub permissions: Vec<String>,
    /// Hooks the plugin handles.
    pub hooks: Vec<HookDefinition>,
    /// Components the plugin provides.
    pub components: Vec<ComponentDefinition>,
    /// Static assets.
    pub assets: AssetDefinition,
}

/// A hook handled by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookDefinition {
    /// Hook name.
    pub name: String,
    /// Handler priority.
    pub priority: i32,
}

/// A component provided by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentDefinition {
    /// Component slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Declared properties.
    pub properties: Vec<PropertyDefinition>,
}

/// A declared component property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDefinition {
    /// Property slug.
    pub slug: String,
    /// Type name (`string`, `int`, `bool`, `list`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether a value is mandatory.
    pub required: bool,
    /// Default literal.
    pub default: String,
}

/// Static assets bundled with the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDefinition {
    /// Stylesheets.
    pub css: Vec<String>,
    /// Scripts.
    pub js: Vec<String>,
}

impl PluginManifest {
    /// Reads a manifest from a file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let data = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Self = serde_json::from_str(&data).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), plugin = %manifest.name, "Manifest loaded");
        Ok(manifest)
    }

    /// Reads `manifest.json` from a plugin directory.
    pub fn load_from_directory(dir: &Path) -> Result<Self, ManifestError> {
        Self::load(&dir.join(MANIFEST_FILE))
    }

    /// Checks that the mandatory fields are present.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::MissingField {
                field: "name",
                message: "plugin name is required",
            });
        }
        if self.version.trim().is_empty() {
            return Err(ManifestError::MissingField {
                field: "version",
                message: "plugin version is required",
            });
        }
        Ok(())
    }

    /// Whether the plugin declares a handler for `hook`.
    pub fn has_hook(&self, hook: &str) -> bool {
        self.hooks.iter().any(|h| h.name == hook)
    }

    /// Whether the plugin declares component `slug`.
    pub fn has_component(&self, slug: &str) -> bool {
        self.components.iter().any(|c| c.slug == slug)
    }

    /// Whether the plugin requests `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Metadata in the shape the plugin catalog uses.
    pub fn plugin_info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name.clone(),
            author: self.author.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

impl ComponentDefinition {
    /// Converts the declared properties. Unknown type names are read as `string`.
    pub fn property_defs(&self) -> Vec<PropertyDef> {
        self.properties
            .iter()
            .map(|p| {
                let kind = PropertyKind::from_name(&p.kind).unwrap_or_else(|| {
                    debug!(component = %self.slug, property = %p.slug, kind = %p.kind, "Unknown property type, using string");
                    PropertyKind::String
                });
                let mut def = PropertyDef::new(p.slug.clone(), kind).with_default(p.default.clone());
                if p.required {
                    def = def.required();
                }
                def
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = r#"{
        "name": "hello-world",
        "version": "1.0.0",
        "author": "GMS Team",
        "description": "A simple hello world component example",
        "gmsVersion": ">=0.1.0",
        "permissions": ["pages.read"],
        "hooks": [{ "name": "counterUpdated", "priority": 0 }],
        "components": [{
            "slug": "counter",
            "name": "Counter",
            "description": "Interactive counter",
            "properties": [
                { "slug": "initialCount", "type": "int", "required": true, "default": "0" },
                { "slug": "label", "type": "fancy" }
            ]
        }],
        "assets": { "css": ["counter.css"], "js": [] }
    }"#;

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), HELLO).unwrap();

        let manifest = PluginManifest::load_from_directory(dir.path()).unwrap();
        assert_eq!(manifest.name, "hello-world");
        assert_eq!(manifest.gms_version, ">=0.1.0");
        assert_eq!(manifest.assets.css, vec!["counter.css"]);
        assert!(manifest.validate().is_ok());

        assert!(manifest.has_hook("counterUpdated"));
        assert!(!manifest.has_hook("pageRendered"));
        assert!(manifest.has_component("counter"));
        assert!(manifest.has_permission("pages.read"));
        assert!(!manifest.has_permission("pages.write"));

        let info = manifest.plugin_info();
        assert_eq!(info.author, "GMS Team");
        assert_eq!(info.permissions, vec!["pages.read"]);
    }

    #[test]
    fn test_property_defs() {
        let manifest: PluginManifest = serde_json::from_str(HELLO).unwrap();
        let defs = manifest.components[0].property_defs();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].kind, PropertyKind::Int);
        assert!(defs[0].required);
        assert_eq!(defs[0].default, "0");
        assert_eq!(defs[1].kind, PropertyKind::String);
        assert!(!defs[1].required);
    }

    #[test]
    fn test_validate_requires_name_then_version() {
        let mut manifest = PluginManifest::default();
        let err = manifest.validate().unwrap_err();
        assert_eq!(err.to_string(), "name: plugin name is required");

        manifest.name = "x".to_string();
        let err = manifest.validate().unwrap_err();
        assert_eq!(err.to_string(), "version: plugin version is required");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PluginManifest::load_from_directory(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = PluginManifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }
}
