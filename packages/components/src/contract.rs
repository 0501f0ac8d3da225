//! # Node contract
//!
//! Each component type supplies three pure operations:
//!
//! - **normalize**: fill schema defaults, coerce values, drop unknown keys
//! - **parse_external**: read attributes off a recognized HTML element
//! - **render_external**: produce the HTML element for canonical attributes
//!
//! The operations live in a static record per [`ComponentKind`]; adding a
//! type means adding a variant and its record.
//!
//! Round-trip law: `parse(render(normalize(a))) == normalize(a)`.

use crate::metadata::{ComponentMetadata, PropKind, PropSpec};
use crate::{button, container};
use serde_json::{Number, Value};
use thiserror::Error;
use uibuilder_model::{Attrs, ID_ATTR};

/// Externally authored HTML element, reduced to what the contracts read
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlElement {
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content
    pub text: String,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// HTML produced for a component node: tag, ordered attributes and text.
/// Children of non-atomic components are rendered by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
}

impl RenderedElement {
    /// Same element as an [`HtmlElement`], as a parser would see it
    pub fn to_html_element(&self) -> HtmlElement {
        HtmlElement {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            text: self.text.clone().unwrap_or_default(),
        }
    }
}

/// An attribute value that failed its declared kind
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Schema mismatch for \"{attribute}\": expected {expected}, found {found}")]
pub struct SchemaMismatch {
    pub attribute: String,
    pub expected: String,
    pub found: Value,
}

/// Canonical attributes plus the mismatches resolved along the way
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub attrs: Attrs,
    pub mismatches: Vec<SchemaMismatch>,
}

/// Record of pure functions implementing one component type
pub struct NodeContract {
    /// Tag name of the rendered element
    pub tag: &'static str,
    /// `data-type` marker identifying the element
    pub marker: &'static str,
    /// Atomic nodes have no content and no interior positions
    pub atom: bool,
    pub normalize: fn(&ComponentMetadata, &Attrs) -> Normalized,
    pub parse_external: fn(&HtmlElement) -> Attrs,
    pub render_external: fn(&Attrs) -> RenderedElement,
}

impl NodeContract {
    /// True when `element` has this contract's tag and `data-type` marker
    pub fn matches(&self, element: &HtmlElement) -> bool {
        element.tag.eq_ignore_ascii_case(self.tag) && element.get("data-type") == Some(self.marker)
    }
}

/// Built-in component implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Button,
    Container,
}

impl ComponentKind {
    pub fn contract(self) -> &'static NodeContract {
        match self {
            ComponentKind::Button => &button::CONTRACT,
            ComponentKind::Container => &container::CONTRACT,
        }
    }
}

/// Schema-driven normalization shared by the built-in contracts
///
/// Keeps a non-empty string `id`, then walks the declared attributes in
/// schema order. Values failing their kind fall back to the default (or
/// are dropped when the attribute has none). Attributes without a default
/// stay absent when unset, and an empty string counts as unset for them.
pub fn normalize_with_schema(meta: &ComponentMetadata, raw: &Attrs) -> Normalized {
    let mut out = Normalized::default();

    match raw.get(ID_ATTR) {
        Some(Value::String(id)) if !id.is_empty() => {
            out.attrs.insert(ID_ATTR.to_string(), Value::String(id.clone()));
        }
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => out.mismatches.push(SchemaMismatch {
            attribute: ID_ATTR.to_string(),
            expected: "string".to_string(),
            found: other.clone(),
        }),
    }

    for name in meta.attribute_names() {
        let default = meta.default_for(name);
        let value = match raw.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => match coerce(value, meta.prop(name), default) {
                Ok(value) => Some(value),
                Err(expected) => {
                    out.mismatches.push(SchemaMismatch {
                        attribute: name.to_string(),
                        expected,
                        found: value.clone(),
                    });
                    None
                }
            },
        };

        let value = match (value, default) {
            (Some(Value::String(s)), None) if s.is_empty() => None,
            (Some(value), _) => Some(value),
            (None, default) => default.cloned(),
        };

        if let Some(value) = value {
            out.attrs.insert(name.to_string(), value);
        }
    }

    out
}

/// Coerce `value` to the attribute's declared kind. Markup delivers every
/// value as a string, so numeric and boolean strings are accepted.
fn coerce(value: &Value, spec: Option<&PropSpec>, default: Option<&Value>) -> Result<Value, String> {
    let Some(spec) = spec else {
        // no schema entry: the default's JSON type is the contract
        return match default {
            Some(default) if !same_json_type(value, default) => {
                Err(json_type_name(default).to_string())
            }
            _ => Ok(value.clone()),
        };
    };

    match spec.kind {
        PropKind::String | PropKind::Textarea | PropKind::Color => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(spec.kind.as_str().to_string()),
        },
        PropKind::Select => match value {
            Value::String(s) if spec.options.is_empty() || spec.options.contains(s) => {
                Ok(value.clone())
            }
            _ => Err(format!("one of [{}]", spec.options.join(", "))),
        },
        PropKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err("boolean".to_string()),
        },
        PropKind::Number => {
            let number = match value {
                Value::Number(n) => Some(n.clone()),
                Value::String(s) => parse_number(s.trim()),
                _ => None,
            };
            let expected = match (spec.min, spec.max) {
                (Some(min), Some(max)) => format!("number in {}..={}", min, max),
                _ => "number".to_string(),
            };
            let number = number.ok_or_else(|| expected.clone())?;
            let as_f64 = number.as_f64().ok_or_else(|| expected.clone())?;
            let below = spec.min.is_some_and(|min| as_f64 < min);
            let above = spec.max.is_some_and(|max| as_f64 > max);
            if below || above {
                return Err(expected);
            }
            Ok(Value::Number(number))
        }
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(Number::from(n));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn same_json_type(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// String form of an attribute value for markup
pub(crate) fn attr_string(attrs: &Attrs, name: &str) -> Option<String> {
    match attrs.get(name)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Copy an element attribute into `attrs` when present
pub(crate) fn read_attr(attrs: &mut Attrs, element: &HtmlElement, html_name: &str, attr: &str) {
    if let Some(value) = element.get(html_name) {
        attrs.insert(attr.to_string(), Value::String(value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ComponentCategory;
    use indexmap::IndexMap;
    use serde_json::json;

    fn attrs(value: Value) -> Attrs {
        value.as_object().cloned().unwrap()
    }

    fn metadata() -> ComponentMetadata {
        let mut schema = IndexMap::new();
        schema.insert("title".to_string(), PropSpec::new(PropKind::String, "Title"));
        schema.insert(
            "columns".to_string(),
            PropSpec::new(PropKind::Number, "Columns")
                .with_default(json!(2))
                .with_range(1.0, 12.0),
        );
        schema.insert(
            "align".to_string(),
            PropSpec::new(PropKind::Select, "Align")
                .with_options(&["left", "right"])
                .with_default(json!("left")),
        );
        schema.insert(
            "bordered".to_string(),
            PropSpec::new(PropKind::Boolean, "Bordered").with_default(json!(false)),
        );
        schema.insert("note".to_string(), PropSpec::new(PropKind::Textarea, "Note"));

        ComponentMetadata {
            id: "grid".to_string(),
            name: "Grid".to_string(),
            description: "Grid".to_string(),
            category: ComponentCategory::Layout,
            icon: None,
            default_props: attrs(json!({ "title": "Untitled" })),
            prop_schema: Some(schema),
        }
    }

    #[test]
    fn test_fills_defaults_in_schema_order() {
        let normalized = normalize_with_schema(&metadata(), &Attrs::new());

        assert!(normalized.mismatches.is_empty());
        assert_eq!(
            Value::Object(normalized.attrs),
            json!({ "title": "Untitled", "columns": 2, "align": "left", "bordered": false })
        );
    }

    #[test]
    fn test_drops_keys_outside_schema() {
        let raw = attrs(json!({ "id": "grid-1", "bogus": 1, "title": "T" }));
        let normalized = normalize_with_schema(&metadata(), &raw);

        assert_eq!(normalized.attrs.get("id"), Some(&json!("grid-1")));
        assert!(normalized.attrs.get("bogus").is_none());
        assert_eq!(normalized.attrs.keys().next().map(String::as_str), Some("id"));
    }

    #[test]
    fn test_mismatch_falls_back_per_attribute() {
        let raw = attrs(json!({ "columns": 40, "align": "center", "bordered": "yes", "title": 3 }));
        let normalized = normalize_with_schema(&metadata(), &raw);

        assert_eq!(normalized.attrs["columns"], json!(2));
        assert_eq!(normalized.attrs["align"], json!("left"));
        assert_eq!(normalized.attrs["bordered"], json!(false));
        assert_eq!(normalized.attrs["title"], json!("Untitled"));
        assert_eq!(normalized.mismatches.len(), 4);
    }

    #[test]
    fn test_coerces_markup_strings() {
        let raw = attrs(json!({ "columns": "3", "bordered": "true" }));
        let normalized = normalize_with_schema(&metadata(), &raw);

        assert_eq!(normalized.attrs["columns"], json!(3));
        assert_eq!(normalized.attrs["bordered"], json!(true));
        assert!(normalized.mismatches.is_empty());
    }

    #[test]
    fn test_optional_attribute_without_default() {
        let unset = normalize_with_schema(&metadata(), &attrs(json!({ "note": "" })));
        assert!(unset.attrs.get("note").is_none());

        let set = normalize_with_schema(&metadata(), &attrs(json!({ "note": "hello" })));
        assert_eq!(set.attrs["note"], json!("hello"));
    }

    #[test]
    fn test_empty_or_invalid_id() {
        let empty = normalize_with_schema(&metadata(), &attrs(json!({ "id": "" })));
        assert!(empty.attrs.get("id").is_none());

        let numeric = normalize_with_schema(&metadata(), &attrs(json!({ "id": 5 })));
        assert!(numeric.attrs.get("id").is_none());
        assert_eq!(numeric.mismatches[0].attribute, "id");
    }

    #[test]
    fn test_html_element_lookup() {
        let element = HtmlElement::new("button")
            .with_attr("data-type", "ui-button")
            .with_attr("disabled", "disabled")
            .with_text("Go");

        assert_eq!(element.get("data-type"), Some("ui-button"));
        assert!(element.has("disabled"));
        assert!(!element.has("class"));
        assert!(ComponentKind::Button.contract().matches(&element));
        assert!(!ComponentKind::Container.contract().matches(&element));
    }
}
