//! Static descriptors for component types: palette metadata plus the
//! property schema the property panel edits against.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uibuilder_model::Attrs;

/// Palette category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Basic,
    Layout,
    Form,
    Media,
    Advanced,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 5] = [
        ComponentCategory::Basic,
        ComponentCategory::Layout,
        ComponentCategory::Form,
        ComponentCategory::Media,
        ComponentCategory::Advanced,
    ];

    /// Display label shown in the palette
    pub fn label(self) -> &'static str {
        match self {
            ComponentCategory::Basic => "Basic",
            ComponentCategory::Layout => "Layout",
            ComponentCategory::Form => "Form",
            ComponentCategory::Media => "Media",
            ComponentCategory::Advanced => "Advanced",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentCategory::Basic => "basic",
            ComponentCategory::Layout => "layout",
            ComponentCategory::Form => "form",
            ComponentCategory::Media => "media",
            ComponentCategory::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// How a property is edited and what values it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    String,
    Number,
    Boolean,
    Color,
    Select,
    Textarea,
}

impl PropKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PropKind::String => "string",
            PropKind::Number => "number",
            PropKind::Boolean => "boolean",
            PropKind::Color => "color",
            PropKind::Select => "select",
            PropKind::Textarea => "textarea",
        }
    }
}

/// Property panel entry for one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    #[serde(rename = "type")]
    pub kind: PropKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl PropSpec {
    pub fn new(kind: PropKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            default: None,
            options: vec![],
            min: None,
            max: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

/// Static descriptor for a component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ComponentCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub default_props: Attrs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_schema: Option<IndexMap<String, PropSpec>>,
}

impl ComponentMetadata {
    /// Property spec for `name`, if the schema declares one
    pub fn prop(&self, name: &str) -> Option<&PropSpec> {
        self.prop_schema.as_ref().and_then(|schema| schema.get(name))
    }

    /// Default for `name`, from `default_props` first, then the schema
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.default_props
            .get(name)
            .or_else(|| self.prop(name).and_then(|spec| spec.default.as_ref()))
    }

    /// Every attribute the type declares, in schema order, followed by
    /// defaults that have no schema entry
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .prop_schema
            .iter()
            .flat_map(|schema| schema.keys())
            .map(String::as_str)
            .collect();

        for key in self.default_props.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key.as_str());
            }
        }

        names
    }

    /// Contract violations: defaults the property panel has no editor for,
    /// and select defaults outside their options
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for key in self.default_props.keys() {
            if self.prop(key).is_none() {
                warnings.push(format!(
                    "{}: default prop \"{}\" has no schema entry",
                    self.id, key
                ));
            }
        }

        for (key, spec) in self.prop_schema.iter().flatten() {
            if spec.kind != PropKind::Select {
                continue;
            }
            if let Some(Value::String(default)) = self.default_for(key) {
                if !spec.options.iter().any(|o| o == default) {
                    warnings.push(format!(
                        "{}: default \"{}\" for \"{}\" is not one of its options",
                        self.id, default, key
                    ));
                }
            }
        }

        warnings
    }
}
