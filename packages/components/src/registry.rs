//! # Component Registry
//!
//! Mapping from component-type id to its definition. The registry is an
//! ordinary value: build it at startup, register every type, then share it
//! read-only (typically behind an `Arc`) with the editor and serializers.
//! Lookups of unknown ids return `None`; callers decide how to degrade.

use crate::contract::{ComponentKind, HtmlElement, NodeContract, Normalized, RenderedElement};
use crate::metadata::{ComponentCategory, ComponentMetadata};
use crate::{button, container};
use indexmap::IndexMap;
use serde_json::Value;
use uibuilder_model::{Attrs, ID_ATTR};

/// Registered component type: metadata plus its node contract
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    pub metadata: ComponentMetadata,
    pub kind: ComponentKind,
}

impl ComponentDefinition {
    pub fn new(metadata: ComponentMetadata, kind: ComponentKind) -> Self {
        Self { metadata, kind }
    }

    pub fn button() -> Self {
        Self::new(button::metadata(), ComponentKind::Button)
    }

    pub fn container() -> Self {
        Self::new(container::metadata(), ComponentKind::Container)
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn contract(&self) -> &'static NodeContract {
        self.kind.contract()
    }

    /// Atomic components have no content and no interior cursor positions
    pub fn is_atom(&self) -> bool {
        self.contract().atom
    }

    /// Canonical attributes for `raw`
    pub fn normalize(&self, raw: &Attrs) -> Attrs {
        self.normalize_with_diagnostics(raw).attrs
    }

    /// Canonical attributes for `raw`, with the mismatches that were
    /// replaced by defaults
    pub fn normalize_with_diagnostics(&self, raw: &Attrs) -> Normalized {
        (self.contract().normalize)(&self.metadata, raw)
    }

    pub fn matches(&self, element: &HtmlElement) -> bool {
        self.contract().matches(element)
    }

    /// Canonical attributes read off an external element
    pub fn parse_external(&self, element: &HtmlElement) -> Attrs {
        let raw = (self.contract().parse_external)(element);
        self.normalize(&raw)
    }

    pub fn render_external(&self, attrs: &Attrs) -> RenderedElement {
        (self.contract().render_external)(attrs)
    }

    /// Attributes for a freshly created node: defaults plus `id`
    pub fn create_attrs(&self, id: &str) -> Attrs {
        let mut raw = self.metadata.default_props.clone();
        raw.insert(ID_ATTR.to_string(), Value::String(id.to_string()));
        self.normalize(&raw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: IndexMap<String, ComponentDefinition>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in component type
    pub fn with_builtin_components() -> Self {
        let mut registry = Self::new();
        registry.register(ComponentDefinition::button());
        registry.register(ComponentDefinition::container());
        registry
    }

    /// Store a definition under its id, replacing any previous one
    pub fn register(&mut self, definition: ComponentDefinition) {
        for warning in definition.metadata.lint() {
            tracing::warn!("{}", warning);
        }

        let id = definition.id().to_string();
        if self.components.insert(id.clone(), definition).is_some() {
            tracing::debug!(component = %id, "replaced component definition");
        } else {
            tracing::debug!(component = %id, "registered component");
        }
    }

    pub fn get(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// All definitions. The order is for display only.
    pub fn get_all(&self) -> Vec<&ComponentDefinition> {
        self.components.values().collect()
    }

    pub fn get_by_category(&self, category: ComponentCategory) -> Vec<&ComponentDefinition> {
        self.components
            .values()
            .filter(|def| def.metadata.category == category)
            .collect()
    }

    /// Categories that have at least one registered component
    pub fn categories(&self) -> Vec<ComponentCategory> {
        ComponentCategory::ALL
            .into_iter()
            .filter(|category| !self.get_by_category(*category).is_empty())
            .collect()
    }

    /// Palette search: case-insensitive match on name or description,
    /// optionally narrowed to one category
    pub fn search(
        &self,
        query: &str,
        category: Option<ComponentCategory>,
    ) -> Vec<&ComponentDefinition> {
        let query = query.to_lowercase();
        self.components
            .values()
            .filter(|def| category.map_or(true, |c| def.metadata.category == c))
            .filter(|def| {
                def.metadata.name.to_lowercase().contains(&query)
                    || def.metadata.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Definition whose contract recognizes `element`
    pub fn find_for_element(&self, element: &HtmlElement) -> Option<&ComponentDefinition> {
        self.components.values().find(|def| def.matches(element))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
