//! Error taxonomy for plugin discovery, loading, handlers and components.
//!
//! Duplicate plugin names and unknown components have no variant here:
//! the first is recorded in a scan report, the second renders a fallback.

use std::path::{Path, PathBuf};

use thiserror::Error;

use gms_core::error::{AppError, ErrorKind};

use crate::components::model::PropertyKind;

/// The plugin directory itself could not be enumerated.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Reading the directory failed.
    #[error("Plugin directory '{}' could not be read: {source}", .path.display())]
    Unreadable {
        /// Directory that was scanned.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// A single unit failed to load. Never aborts the surrounding scan.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The shared library could not be opened.
    #[error("Failed to open plugin library '{}': {reason}", .path.display())]
    Open {
        /// Library path.
        path: PathBuf,
        /// Loader message.
        reason: String,
    },
    /// A required export is missing.
    #[error("Plugin '{}' is missing the '{symbol}' export: {reason}", .path.display())]
    MissingSymbol {
        /// Library path.
        path: PathBuf,
        /// Name of the missing symbol.
        symbol: &'static str,
        /// Loader message.
        reason: String,
    },
    /// The unit was built against a different host interface.
    #[error("Plugin '{}' reports ABI tag {found}, host expects {expected}", .path.display())]
    AbiMismatch {
        /// Library path.
        path: PathBuf,
        /// Host tag.
        expected: u32,
        /// Tag reported by the unit.
        found: u32,
    },
    /// The entry point returned a null plugin set (it panicked plugin-side).
    #[error("Plugin '{}' entry point returned no plugin set", .path.display())]
    EmptyEntry {
        /// Library path.
        path: PathBuf,
    },
    /// The host was built without the `dynamic` feature.
    #[error("Dynamic loading is disabled in this build; cannot load '{}'", .path.display())]
    DynamicLoadingDisabled {
        /// Library path.
        path: PathBuf,
    },
}

impl LoadError {
    /// Returns the path of the unit that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. }
            | Self::MissingSymbol { path, .. }
            | Self::AbiMismatch { path, .. }
            | Self::EmptyEntry { path }
            | Self::DynamicLoadingDisabled { path } => path,
        }
    }
}

/// Failure returned by a hook handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// An argument was missing or had the wrong shape.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The handler observed a cancelled or expired context.
    #[error("handler cancelled")]
    Cancelled,
    /// Any other handler failure.
    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    /// Creates an `InvalidArgument` error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a generic failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// A property value is missing or does not match its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// A required property resolved to an empty value.
    #[error("property '{slug}' is required")]
    Missing {
        /// Property slug.
        slug: String,
    },
    /// The value does not parse as the declared type.
    #[error("property '{slug}' expects {expected}, got '{value}'")]
    InvalidValue {
        /// Property slug.
        slug: String,
        /// Declared type.
        expected: PropertyKind,
        /// Raw value.
        value: String,
    },
}

impl PropertyError {
    /// Returns the slug the error refers to.
    pub fn slug(&self) -> &str {
        match self {
            Self::Missing { slug } | Self::InvalidValue { slug, .. } => slug,
        }
    }
}

/// A plugin manifest could not be read or is incomplete.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The file could not be read.
    #[error("Failed to read manifest '{}': {source}", .path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid manifest JSON.
    #[error("Failed to parse manifest '{}': {source}", .path.display())]
    Parse {
        /// Manifest path.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// A mandatory field is empty.
    #[error("{field}: {message}")]
    MissingField {
        /// Field name.
        field: &'static str,
        /// Human-readable message.
        message: &'static str,
    },
}

impl From<DiscoveryError> for AppError {
    fn from(err: DiscoveryError) -> Self {
        AppError::with_source(ErrorKind::Storage, err.to_string(), err)
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::with_source(ErrorKind::Plugin, err.to_string(), err)
    }
}

impl From<HandlerError> for AppError {
    fn from(err: HandlerError) -> Self {
        AppError::with_source(ErrorKind::Plugin, err.to_string(), err)
    }
}

impl From<PropertyError> for AppError {
    fn from(err: PropertyError) -> Self {
        AppError::with_source(ErrorKind::Validation, err.to_string(), err)
    }
}

impl From<ManifestError> for AppError {
    fn from(err: ManifestError) -> Self {
        let kind = match &err {
            ManifestError::Io { .. } => ErrorKind::Storage,
            ManifestError::Parse { .. } => ErrorKind::Serialization,
            ManifestError::MissingField { .. } => ErrorKind::Validation,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_path() {
        let err = LoadError::AbiMismatch {
            path: PathBuf::from("/plugins/libcounter.so"),
            expected: 1,
            found: 7,
        };
        assert_eq!(err.path(), Path::new("/plugins/libcounter.so"));
        let msg = err.to_string();
        assert!(msg.contains("libcounter.so"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_load_error_into_app_error() {
        let err = LoadError::EmptyEntry {
            path: PathBuf::from("/plugins/libbroken.so"),
        };
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::Plugin);
        assert!(app.message.contains("libbroken.so"));
    }

    #[test]
    fn test_property_error_slug() {
        let err = PropertyError::InvalidValue {
            slug: "initialCount".to_string(),
            expected: PropertyKind::Int,
            value: "ten".to_string(),
        };
        assert_eq!(err.slug(), "initialCount");
        assert_eq!(
            err.to_string(),
            "property 'initialCount' expects int, got 'ten'"
        );
    }

    #[test]
    fn test_manifest_missing_field_display() {
        let err = ManifestError::MissingField {
            field: "name",
            message: "plugin name is required",
        };
        assert_eq!(err.to_string(), "name: plugin name is required");
    }
}
