use serde_json::Value;
use std::sync::Arc;
use uibuilder_components::ComponentRegistry;
use uibuilder_model::{Attrs, Node, ID_ATTR};

/// Options for block markup compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Prefix of every component block name
    pub namespace: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            namespace: "ui-builder".to_string(),
        }
    }
}

/// Render a document as block markup. Components without a registered
/// definition contribute nothing, not even a separator.
pub fn to_block_markup(
    document: &Node,
    registry: &ComponentRegistry,
    options: CompileOptions,
) -> String {
    compile_blocks(document.content(), registry, &options)
}

fn compile_blocks(
    blocks: &[Arc<Node>],
    registry: &ComponentRegistry,
    options: &CompileOptions,
) -> String {
    blocks
        .iter()
        .map(|block| compile_block(block, registry, options))
        .filter(|output| !output.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn compile_block(node: &Node, registry: &ComponentRegistry, options: &CompileOptions) -> String {
    match node {
        Node::Paragraph { .. } => format!(
            "<!-- block:paragraph -->\n<p>{}</p>\n<!-- /block:paragraph -->",
            escape_text(&node.text_content())
        ),
        Node::Component {
            component_type,
            attrs,
            content,
        } => {
            let Some(definition) = registry.get(component_type) else {
                tracing::debug!(component = %component_type, "skipping unregistered component");
                return String::new();
            };

            let name = format!("{}/{}", options.namespace, component_type);
            let attrs = compile_attrs(attrs);
            let inner = if definition.is_atom() {
                String::new()
            } else {
                compile_blocks(content, registry, options)
            };

            if inner.is_empty() {
                format!("<!-- block:{}{} /-->", name, attrs)
            } else {
                format!(
                    "<!-- block:{}{} -->\n{}\n<!-- /block:{} -->",
                    name, attrs, inner, name
                )
            }
        }
        Node::Text { .. } | Node::Document { .. } => String::new(),
    }
}

/// ` {json}` of every attribute but `id`, or nothing when none remain.
/// `--` only occurs inside JSON strings, where it is written as unicode
/// escapes so a value can never close the surrounding comment.
fn compile_attrs(attrs: &Attrs) -> String {
    let attrs: Attrs = attrs
        .iter()
        .filter(|(name, _)| name.as_str() != ID_ATTR)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    if attrs.is_empty() {
        String::new()
    } else {
        let json = Value::Object(attrs).to_string();
        format!(" {}", json.replace("--", "\\u002d\\u002d"))
    }
}

/// Escapes `&`, `<`, `>` and `"`; apostrophes are left alone
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
