//! Component catalog entries and their property/media schema.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::components::viewmodel::ComponentViewModel;
use crate::error::PropertyError;
use crate::html::Node;

/// Render capability of a component.
pub type RenderFn = Arc<dyn Fn(&ComponentViewModel) -> Node + Send + Sync>;

/// Precedence level of a property value, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyTier {
    /// System default declared by the component.
    Default,
    /// Override applied to every page using a layout.
    LayoutOverride,
    /// Override applied to a single page.
    PageOverride,
}

impl PropertyTier {
    /// All tiers, lowest precedence first.
    pub const ALL: [PropertyTier; 3] = [Self::Default, Self::LayoutOverride, Self::PageOverride];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Default => 0,
            Self::LayoutOverride => 1,
            Self::PageOverride => 2,
        }
    }
}

/// Declared value type of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Free text.
    #[default]
    String,
    /// Signed integer.
    Int,
    /// Boolean flag.
    Bool,
    /// Comma-separated list.
    List,
}

impl PropertyKind {
    /// Returns the manifest spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::List => "list",
        }
    }

    /// Parses the manifest spelling; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Some(Self::String),
            "int" | "integer" | "number" => Some(Self::Int),
            "bool" | "boolean" => Some(Self::Bool),
            "list" | "array" => Some(Self::List),
            _ => None,
        }
    }

    /// Parses a string-encoded value of this kind.
    pub fn parse(&self, slug: &str, raw: &str) -> Result<PropertyValue, PropertyError> {
        let invalid = || PropertyError::InvalidValue {
            slug: slug.to_string(),
            expected: *self,
            value: raw.to_string(),
        };

        match self {
            Self::String => Ok(PropertyValue::String(raw.to_string())),
            Self::Int => raw
                .trim()
                .parse::<i64>()
                .map(PropertyValue::Int)
                .map_err(|_| invalid()),
            Self::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(PropertyValue::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(PropertyValue::Bool(false)),
                _ => Err(invalid()),
            },
            Self::List => Ok(PropertyValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Text value.
    String(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// List value.
    List(Vec<String>),
}

impl PropertyValue {
    /// Returns the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the flag, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// One configured property value at a given tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProperty {
    /// Stable key.
    pub slug: String,
    /// Human-readable key.
    pub key: String,
    /// String-encoded value.
    pub value: String,
    /// Precedence tier.
    pub tier: PropertyTier,
    /// Declared value type.
    pub kind: PropertyKind,
    /// Whether the property must resolve to a non-empty value.
    pub required: bool,
    /// Default literal from the schema.
    pub default: String,
}

impl ComponentProperty {
    /// Creates a string property value at the given tier.
    pub fn new(slug: impl Into<String>, value: impl Into<String>, tier: PropertyTier) -> Self {
        let slug = slug.into();
        Self {
            key: slug.clone(),
            slug,
            value: value.into(),
            tier,
            kind: PropertyKind::String,
            required: false,
            default: String::new(),
        }
    }

    /// Sets the declared type.
    pub fn with_kind(mut self, kind: PropertyKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Declared property of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Stable key.
    pub slug: String,
    /// Human-readable label.
    pub key: String,
    /// Declared value type.
    pub kind: PropertyKind,
    /// Whether a value is mandatory.
    pub required: bool,
    /// Default literal.
    pub default: String,
}

impl PropertyDef {
    /// Declares an optional property with an empty default.
    pub fn new(slug: impl Into<String>, kind: PropertyKind) -> Self {
        let slug = slug.into();
        Self {
            key: slug.clone(),
            slug,
            kind,
            required: false,
            default: String::new(),
        }
    }

    /// Marks the property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default literal.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Sets the human-readable label.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The default-tier property value carried by this declaration.
    pub fn default_property(&self) -> ComponentProperty {
        ComponentProperty {
            slug: self.slug.clone(),
            key: self.key.clone(),
            value: self.default.clone(),
            tier: PropertyTier::Default,
            kind: self.kind,
            required: self.required,
            default: self.default.clone(),
        }
    }
}

/// Declared media slot of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDef {
    /// Stable key.
    pub slug: String,
    /// Accepted MIME types; empty accepts anything.
    pub accept: Vec<String>,
}

/// A reference to an external asset attached to a component instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMedia {
    /// Media slot.
    pub slug: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub file_type: String,
    /// Resolved URL.
    pub url: String,
}

/// A renderable catalog entry.
#[derive(Clone)]
pub struct Component {
    /// Identifier under which the component is registered.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Declared properties.
    pub properties: Vec<PropertyDef>,
    /// Declared media slots.
    pub media: Vec<MediaDef>,
    /// Nested components of a composite.
    pub children: Vec<Component>,
    render: RenderFn,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("slug", &self.slug)
            .field("name", &self.name)
            .field("properties", &self.properties.len())
            .field("media", &self.media.len())
            .field("children", &self.children.len())
            .field("render", &"<fn>")
            .finish()
    }
}

impl Component {
    /// Starts building a component with the given render capability.
    pub fn builder<F>(slug: impl Into<String>, render: F) -> ComponentBuilder
    where
        F: Fn(&ComponentViewModel) -> Node + Send + Sync + 'static,
    {
        let slug = slug.into();
        ComponentBuilder {
            component: Component {
                name: slug.clone(),
                slug,
                description: String::new(),
                properties: Vec::new(),
                media: Vec::new(),
                children: Vec::new(),
                render: Arc::new(render),
            },
        }
    }

    /// Invokes the render capability.
    pub fn render(&self, vm: &ComponentViewModel) -> Node {
        (self.render)(vm)
    }

    /// Looks up a declared property.
    pub fn property_def(&self, slug: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.slug == slug)
    }

    /// Default-tier values for every declared property.
    pub fn default_properties(&self) -> Vec<ComponentProperty> {
        self.properties
            .iter()
            .map(PropertyDef::default_property)
            .collect()
    }
}

/// Builder for [`Component`].
#[derive(Debug)]
pub struct ComponentBuilder {
    component: Component,
}

impl ComponentBuilder {
    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.component.name = name.into();
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.component.description = description.into();
        self
    }

    /// Declares a property.
    pub fn property(mut self, def: PropertyDef) -> Self {
        self.component.properties.push(def);
        self
    }

    /// Declares several properties.
    pub fn properties(mut self, defs: impl IntoIterator<Item = PropertyDef>) -> Self {
        self.component.properties.extend(defs);
        self
    }

    /// Declares a media slot.
    pub fn media(mut self, slug: impl Into<String>, accept: &[&str]) -> Self {
        self.component.media.push(MediaDef {
            slug: slug.into(),
            accept: accept.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Adds a nested child component.
    pub fn child(mut self, child: Component) -> Self {
        self.component.children.push(child);
        self
    }

    /// Finishes the component.
    pub fn build(self) -> Component {
        self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        let value = PropertyKind::Int.parse("initialCount", " 42 ").unwrap();
        assert_eq!(value.as_int(), Some(42));

        let err = PropertyKind::Int.parse("initialCount", "forty").unwrap_err();
        assert_eq!(err.slug(), "initialCount");
    }

    #[test]
    fn test_parse_bool_spellings() {
        for raw in ["true", "1", "YES", "on"] {
            assert_eq!(PropertyKind::Bool.parse("flag", raw).unwrap().as_bool(), Some(true));
        }
        for raw in ["false", "0", "no", "Off"] {
            assert_eq!(PropertyKind::Bool.parse("flag", raw).unwrap().as_bool(), Some(false));
        }
        assert!(PropertyKind::Bool.parse("flag", "maybe").is_err());
    }

    #[test]
    fn test_parse_list_drops_blank_items() {
        let value = PropertyKind::List.parse("tags", "a, b,, c ,").unwrap();
        assert_eq!(
            value,
            PropertyValue::List(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(PropertyKind::from_name("int"), Some(PropertyKind::Int));
        assert_eq!(PropertyKind::from_name("Boolean"), Some(PropertyKind::Bool));
        assert_eq!(PropertyKind::from_name("blob"), None);
    }

    #[test]
    fn test_tier_order() {
        assert!(PropertyTier::PageOverride > PropertyTier::LayoutOverride);
        assert!(PropertyTier::LayoutOverride > PropertyTier::Default);
    }

    #[test]
    fn test_builder_and_defaults() {
        let component = Component::builder("counter", |_| Node::text("0"))
            .name("Counter")
            .property(
                PropertyDef::new("initialCount", PropertyKind::Int)
                    .required()
                    .with_default("0"),
            )
            .media("icon", &["image/png"])
            .build();

        assert_eq!(component.name, "Counter");
        assert!(component.property_def("initialCount").is_some());
        let defaults = component.default_properties();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].tier, PropertyTier::Default);
        assert_eq!(defaults[0].value, "0");
        assert_eq!(component.media[0].accept, vec!["image/png".to_string()]);
    }
}
