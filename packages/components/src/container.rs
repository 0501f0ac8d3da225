//! Container component: `<div data-type="ui-container">` holding block
//! children. Derived from the generic UI wrapper element, it is the one
//! built-in type with editable content.

use crate::contract::{
    attr_string, normalize_with_schema, read_attr, HtmlElement, NodeContract, RenderedElement,
};
use crate::metadata::{ComponentCategory, ComponentMetadata, PropKind, PropSpec};
use indexmap::IndexMap;
use serde_json::json;
use uibuilder_model::{Attrs, ID_ATTR};

pub const TYPE: &str = "container";
pub const MARKER: &str = "ui-container";

pub static CONTRACT: NodeContract = NodeContract {
    tag: "div",
    marker: MARKER,
    atom: false,
    normalize: normalize_with_schema,
    parse_external,
    render_external,
};

pub fn metadata() -> ComponentMetadata {
    let mut defaults = Attrs::new();
    defaults.insert("direction".to_string(), json!("column"));
    defaults.insert("gap".to_string(), json!(8));

    let mut schema = IndexMap::new();
    schema.insert(
        "direction".to_string(),
        PropSpec::new(PropKind::Select, "Direction")
            .with_options(&["column", "row"])
            .with_default(json!("column")),
    );
    schema.insert(
        "gap".to_string(),
        PropSpec::new(PropKind::Number, "Gap")
            .with_default(json!(8))
            .with_range(0.0, 64.0),
    );
    schema.insert("background".to_string(), PropSpec::new(PropKind::Color, "Background"));
    schema.insert("className".to_string(), PropSpec::new(PropKind::String, "Class Name"));
    schema.insert("style".to_string(), PropSpec::new(PropKind::Textarea, "Inline Style"));

    ComponentMetadata {
        id: TYPE.to_string(),
        name: "Container".to_string(),
        description: "Layout wrapper grouping other blocks".to_string(),
        category: ComponentCategory::Layout,
        icon: Some("▭".to_string()),
        default_props: defaults,
        prop_schema: Some(schema),
    }
}

const ATTRIBUTE_MAP: [(&str, &str); 6] = [
    (ID_ATTR, "data-id"),
    ("direction", "data-direction"),
    ("gap", "data-gap"),
    ("background", "data-background"),
    ("className", "class"),
    ("style", "style"),
];

fn parse_external(element: &HtmlElement) -> Attrs {
    let mut attrs = Attrs::new();
    for (attr, html_name) in ATTRIBUTE_MAP {
        read_attr(&mut attrs, element, html_name, attr);
    }
    attrs
}

fn render_external(attrs: &Attrs) -> RenderedElement {
    let mut attributes = vec![("data-type".to_string(), MARKER.to_string())];
    for (attr, html_name) in ATTRIBUTE_MAP {
        if let Some(value) = attr_string(attrs, attr) {
            attributes.push((html_name.to_string(), value));
        }
    }

    RenderedElement {
        tag: "div".to_string(),
        attributes,
        text: None,
    }
}
