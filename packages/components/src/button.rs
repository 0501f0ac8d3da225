//! Button component: `<button data-type="ui-button">`
//!
//! `text` travels as the element's text content, `disabled` as a presence
//! attribute. `onClick` records a handler reference by name only.

use crate::contract::{
    attr_string, normalize_with_schema, read_attr, HtmlElement, NodeContract, RenderedElement,
};
use crate::metadata::{ComponentCategory, ComponentMetadata, PropKind, PropSpec};
use indexmap::IndexMap;
use serde_json::{json, Value};
use uibuilder_model::{Attrs, ID_ATTR};

pub const TYPE: &str = "button";
pub const MARKER: &str = "ui-button";

pub static CONTRACT: NodeContract = NodeContract {
    tag: "button",
    marker: MARKER,
    atom: true,
    normalize: normalize_with_schema,
    parse_external,
    render_external,
};

pub fn metadata() -> ComponentMetadata {
    let mut defaults = Attrs::new();
    defaults.insert("text".to_string(), json!("Click me"));
    defaults.insert("variant".to_string(), json!("primary"));
    defaults.insert("size".to_string(), json!("medium"));
    defaults.insert("disabled".to_string(), json!(false));

    let mut schema = IndexMap::new();
    schema.insert(
        "text".to_string(),
        PropSpec::new(PropKind::String, "Text").with_default(json!("Click me")),
    );
    schema.insert(
        "variant".to_string(),
        PropSpec::new(PropKind::Select, "Variant")
            .with_options(&["primary", "secondary", "outline"])
            .with_default(json!("primary")),
    );
    schema.insert(
        "size".to_string(),
        PropSpec::new(PropKind::Select, "Size")
            .with_options(&["small", "medium", "large"])
            .with_default(json!("medium")),
    );
    schema.insert(
        "disabled".to_string(),
        PropSpec::new(PropKind::Boolean, "Disabled").with_default(json!(false)),
    );
    schema.insert("onClick".to_string(), PropSpec::new(PropKind::String, "On Click"));
    schema.insert("className".to_string(), PropSpec::new(PropKind::String, "Class Name"));

    ComponentMetadata {
        id: TYPE.to_string(),
        name: "Button".to_string(),
        description: "Interactive button component".to_string(),
        category: ComponentCategory::Basic,
        icon: Some("🔘".to_string()),
        default_props: defaults,
        prop_schema: Some(schema),
    }
}

fn parse_external(element: &HtmlElement) -> Attrs {
    let mut attrs = Attrs::new();
    read_attr(&mut attrs, element, "data-id", ID_ATTR);
    attrs.insert("text".to_string(), Value::String(element.text.clone()));
    read_attr(&mut attrs, element, "data-variant", "variant");
    read_attr(&mut attrs, element, "data-size", "size");
    attrs.insert("disabled".to_string(), Value::Bool(element.has("disabled")));
    read_attr(&mut attrs, element, "data-onclick", "onClick");
    read_attr(&mut attrs, element, "class", "className");
    attrs
}

fn render_external(attrs: &Attrs) -> RenderedElement {
    let mut attributes = vec![("data-type".to_string(), MARKER.to_string())];

    for (attr, html_name) in [
        (ID_ATTR, "data-id"),
        ("variant", "data-variant"),
        ("size", "data-size"),
        ("onClick", "data-onclick"),
    ] {
        if let Some(value) = attr_string(attrs, attr) {
            attributes.push((html_name.to_string(), value));
        }
    }

    if attrs.get("disabled") == Some(&Value::Bool(true)) {
        attributes.push(("disabled".to_string(), "disabled".to_string()));
    }

    if let Some(class) = attr_string(attrs, "className") {
        attributes.push(("class".to_string(), class));
    }

    let text = attrs
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    RenderedElement {
        tag: "button".to_string(),
        attributes,
        text: Some(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(value: Value) -> Attrs {
        (CONTRACT.normalize)(&metadata(), value.as_object().unwrap()).attrs
    }

    fn round_trip(attrs: &Attrs) -> Attrs {
        let rendered = (CONTRACT.render_external)(attrs);
        let parsed = (CONTRACT.parse_external)(&rendered.to_html_element());
        (CONTRACT.normalize)(&metadata(), &parsed).attrs
    }

    #[test]
    fn test_render_scenario_button() {
        let attrs = normalize(json!({
            "id": "button-1",
            "text": "Save",
            "variant": "secondary",
            "size": "small",
            "disabled": false,
        }));
        let rendered = (CONTRACT.render_external)(&attrs);

        assert_eq!(rendered.tag, "button");
        assert_eq!(
            rendered.attributes,
            vec![
                ("data-type".to_string(), "ui-button".to_string()),
                ("data-id".to_string(), "button-1".to_string()),
                ("data-variant".to_string(), "secondary".to_string()),
                ("data-size".to_string(), "small".to_string()),
            ]
        );
        assert_eq!(rendered.text.as_deref(), Some("Save"));
    }

    #[test]
    fn test_parse_missing_attributes_fall_back_to_defaults() {
        let element = HtmlElement::new("button").with_attr("data-type", "ui-button");
        let parsed = (CONTRACT.parse_external)(&element);
        let attrs = (CONTRACT.normalize)(&metadata(), &parsed).attrs;

        assert_eq!(
            Value::Object(attrs),
            json!({ "text": "", "variant": "primary", "size": "medium", "disabled": false })
        );
    }

    #[test]
    fn test_round_trip_law() {
        let samples = [
            json!({}),
            json!({ "id": "button-7", "text": "Save", "variant": "outline", "size": "large" }),
            json!({ "text": "", "disabled": true, "onClick": "handleSubmit", "className": "cta wide" }),
            json!({ "text": "Fish & <Chips>", "variant": "nope", "disabled": "true" }),
            json!({ "id": "", "onClick": "" }),
        ];

        for sample in samples {
            let canonical = normalize(sample);
            assert_eq!(round_trip(&canonical), canonical);
        }
    }

    #[test]
    fn test_disabled_renders_only_when_true() {
        let on = (CONTRACT.render_external)(&normalize(json!({ "disabled": true })));
        assert!(on.attributes.iter().any(|(name, _)| name == "disabled"));

        let off = (CONTRACT.render_external)(&normalize(json!({ "disabled": false })));
        assert!(!off.attributes.iter().any(|(name, _)| name == "disabled"));
    }

    #[test]
    fn test_metadata_contract_is_clean() {
        assert!(metadata().lint().is_empty());
    }
}
