//! # Document JSON format
//!
//! ```json
//! {
//!   "type": "document",
//!   "content": [
//!     { "type": "paragraph", "content": [{ "type": "text", "text": "Hi" }] },
//!     { "type": "button", "attrs": { "id": "button-1", "text": "Save" } }
//!   ]
//! }
//! ```
//!
//! `attrs` and `content` are omitted when empty, except for the root which
//! always carries `content`. Any type name other than the structural ones is
//! read as a component node, registered or not.

use crate::error::{ParseError, ParseResult};
use crate::node::{Attrs, Node};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct JsonNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    attrs: Option<Attrs>,
    #[serde(default)]
    content: Option<Vec<JsonNode>>,
    #[serde(default)]
    text: Option<String>,
}

/// Pretty-printed JSON dump of a document tree
pub fn to_json(doc: &Node) -> String {
    format!("{:#}", to_value(doc))
}

/// Structural JSON value of a node
pub fn to_value(node: &Node) -> Value {
    match node {
        Node::Document { content } => json!({
            "type": "document",
            "content": content.iter().map(|child| to_value(child)).collect::<Vec<_>>(),
        }),
        Node::Text { text } => json!({ "type": "text", "text": text }),
        Node::Paragraph { content } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("paragraph"));
            insert_content(&mut map, content);
            Value::Object(map)
        }
        Node::Component {
            component_type,
            attrs,
            content,
        } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!(component_type));
            if !attrs.is_empty() {
                map.insert("attrs".to_string(), Value::Object(attrs.clone()));
            }
            insert_content(&mut map, content);
            Value::Object(map)
        }
    }
}

fn insert_content(map: &mut Map<String, Value>, content: &[Arc<Node>]) {
    if !content.is_empty() {
        map.insert(
            "content".to_string(),
            Value::Array(content.iter().map(|child| to_value(child)).collect()),
        );
    }
}

/// Read a document tree back from its JSON dump
pub fn from_json(source: &str) -> ParseResult<Node> {
    let root: JsonNode = serde_json::from_str(source)?;
    from_json_node(root)
}

/// Read a document tree from an already parsed JSON value
pub fn from_value(value: Value) -> ParseResult<Node> {
    let root: JsonNode = serde_json::from_value(value)?;
    from_json_node(root)
}

fn from_json_node(root: JsonNode) -> ParseResult<Node> {
    if root.kind != "document" && root.kind != "doc" {
        return Err(ParseError::invalid_structure(
            "$",
            format!("expected a document root, found \"{}\"", root.kind),
        ));
    }

    let content = read_blocks(root.content.unwrap_or_default(), "$")?;
    Ok(Node::Document { content })
}

fn read_blocks(nodes: Vec<JsonNode>, path: &str) -> ParseResult<Vec<Arc<Node>>> {
    nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| read_block(node, &format!("{}.content[{}]", path, i)).map(Arc::new))
        .collect()
}

fn read_block(node: JsonNode, path: &str) -> ParseResult<Node> {
    match node.kind.as_str() {
        "paragraph" => {
            let content = node
                .content
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(i, child)| {
                    read_inline(child, &format!("{}.content[{}]", path, i)).map(Arc::new)
                })
                .collect::<ParseResult<Vec<_>>>()?;
            Ok(Node::Paragraph { content })
        }
        "text" => Err(ParseError::invalid_structure(
            path,
            "text is only allowed inside a paragraph",
        )),
        "document" | "doc" => Err(ParseError::invalid_structure(
            path,
            "nested document node",
        )),
        _ => {
            let content = read_blocks(node.content.unwrap_or_default(), path)?;
            Ok(Node::Component {
                component_type: node.kind,
                attrs: node.attrs.unwrap_or_default(),
                content,
            })
        }
    }
}

fn read_inline(node: JsonNode, path: &str) -> ParseResult<Node> {
    match (node.kind.as_str(), node.text) {
        ("text", Some(text)) => Ok(Node::Text { text }),
        ("text", None) => Err(ParseError::invalid_structure(path, "text node without text")),
        (other, _) => Err(ParseError::invalid_structure(
            path,
            format!("\"{}\" is not allowed inside a paragraph", other),
        )),
    }
}
