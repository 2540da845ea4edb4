//! Per-render view model and the three-tier property resolver.
//!
//! Properties are stored per slug with one slot per tier, so resolution does
//! not depend on the order in which tiers were supplied. When the input holds
//! two values for the same slug and tier, the last Default or LayoutOverride
//! value is kept and the first PageOverride value is kept.

use std::collections::HashMap;

use crate::components::model::{
    Component, ComponentMedia, ComponentProperty, PropertyKind, PropertyTier, PropertyValue,
};
use crate::error::PropertyError;

/// Base path of the admin instance editor.
pub const ADMIN_INSTANCES_PATH: &str = "/admin/instances";

/// Base path for component-scoped REST actions.
pub const COMPONENT_REST_BASE: &str = "/sys/components";

/// Which base a REST path is built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestScope {
    /// `/sys/components/{instance}`.
    Component,
    /// The page context supplied by the HTTP layer.
    Page,
}

type TierSlots = [Option<ComponentProperty>; 3];

/// Transient context for one render call.
#[derive(Debug, Clone)]
pub struct ComponentViewModel {
    /// Slug of the placed component instance.
    pub instance_slug: String,
    /// Identifier of the component to render.
    pub component_id: String,
    /// Whether the instance is being edited.
    pub is_edit: bool,
    /// Form submit target.
    pub submit_url: String,
    /// Form cancel target.
    pub cancel_url: String,
    /// Field name → validation message.
    pub form_errors: HashMap<String, String>,
    /// Page context path for page-scoped actions.
    pub rest_context: String,
    properties: HashMap<String, TierSlots>,
    media: Vec<ComponentMedia>,
}

impl ComponentViewModel {
    /// Creates a view model for one instance.
    pub fn new(
        instance_slug: impl Into<String>,
        component_id: impl Into<String>,
        properties: impl IntoIterator<Item = ComponentProperty>,
        media: impl IntoIterator<Item = ComponentMedia>,
        is_edit: bool,
        rest_context: impl Into<String>,
    ) -> Self {
        let component_id = component_id.into();
        let mut vm = Self {
            instance_slug: instance_slug.into(),
            submit_url: format!("{ADMIN_INSTANCES_PATH}/{component_id}"),
            cancel_url: ADMIN_INSTANCES_PATH.to_string(),
            component_id,
            is_edit,
            form_errors: HashMap::new(),
            rest_context: rest_context.into(),
            properties: HashMap::new(),
            media: media.into_iter().collect(),
        };
        for property in properties {
            vm.insert_property(property);
        }
        vm
    }

    /// Fills in default-tier values declared by the component where the
    /// caller supplied none.
    pub fn with_component_defaults(mut self, component: &Component) -> Self {
        for property in component.default_properties() {
            let index = property.tier.index();
            let slots = self.properties.entry(property.slug.clone()).or_default();
            if slots[index].is_none() {
                slots[index] = Some(property);
            }
        }
        self
    }

    /// Adds a value as if it came later in the input.
    ///
    /// A Default or LayoutOverride value replaces the one already held at
    /// that tier; a PageOverride value is kept only if the tier is empty.
    pub fn insert_property(&mut self, property: ComponentProperty) {
        let index = property.tier.index();
        let first_wins = property.tier == PropertyTier::PageOverride;
        let slots = self.properties.entry(property.slug.clone()).or_default();
        if !first_wins || slots[index].is_none() {
            slots[index] = Some(property);
        }
    }

    /// Sets a value, replacing any existing value at that tier.
    pub fn set_property(&mut self, property: ComponentProperty) {
        let index = property.tier.index();
        let slots = self.properties.entry(property.slug.clone()).or_default();
        slots[index] = Some(property);
    }

    /// Iterates over the stored values, at most one per slug and tier.
    ///
    /// Same-tier duplicates from the input are not retained; this yields the
    /// values that took part in resolution.
    pub fn properties(&self) -> impl Iterator<Item = &ComponentProperty> {
        self.properties.values().flat_map(|slots| slots.iter().flatten())
    }

    /// Returns the winning property entry for a slug.
    ///
    /// PageOverride beats LayoutOverride beats Default.
    pub fn resolve_property(&self, slug: &str) -> Option<&ComponentProperty> {
        let slots = self.properties.get(slug)?;
        PropertyTier::ALL
            .iter()
            .rev()
            .find_map(|tier| slots[tier.index()].as_ref())
    }

    /// Returns the effective value of a property, or `""` when none is set.
    pub fn resolve(&self, slug: &str) -> String {
        self.resolve_property(slug)
            .map(|p| p.value.clone())
            .unwrap_or_default()
    }

    /// Resolves a property and parses it as `kind`.
    pub fn resolve_typed(&self, slug: &str, kind: PropertyKind) -> Result<PropertyValue, PropertyError> {
        kind.parse(slug, &self.resolve(slug))
    }

    /// Returns the URL of the first media entry with this slug, or `""`.
    pub fn resolve_media(&self, slug: &str) -> String {
        self.media
            .iter()
            .find(|m| m.slug == slug)
            .map(|m| m.url.clone())
            .unwrap_or_default()
    }

    /// Returns the validation message for a field, or `""`.
    pub fn resolve_form_error(&self, field: &str) -> String {
        self.form_errors.get(field).cloned().unwrap_or_default()
    }

    /// Records a validation message for a field.
    pub fn set_form_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.form_errors.insert(field.into(), message.into());
    }

    /// Builds a REST path for an action under the given scope.
    pub fn rest_path(&self, sub_path: &str, scope: RestScope) -> String {
        match scope {
            RestScope::Component => {
                format!("{COMPONENT_REST_BASE}/{}{sub_path}", self.instance_slug)
            }
            RestScope::Page => format!("{}{sub_path}", self.rest_context),
        }
    }

    /// Checks resolved values against the component's declared schema.
    ///
    /// Each failure is also recorded as a form error under the property slug.
    pub fn validate_against(&mut self, component: &Component) -> Vec<PropertyError> {
        let mut errors = Vec::new();
        for def in &component.properties {
            let value = self.resolve(&def.slug);
            if value.trim().is_empty() {
                if def.required {
                    errors.push(PropertyError::Missing {
                        slug: def.slug.clone(),
                    });
                }
                continue;
            }
            if let Err(e) = def.kind.parse(&def.slug, &value) {
                errors.push(e);
            }
        }
        for error in &errors {
            self.form_errors
                .insert(error.slug().to_string(), error.to_string());
        }
        errors
    }
}
