use serde_json::Value;
use std::sync::Arc;

/// Ordered attribute map carried by component nodes
pub type Attrs = serde_json::Map<String, Value>;

/// Attribute key holding a component node's identifier
pub const ID_ATTR: &str = "id";

/// Document tree node
///
/// Children are reference counted so that an edited tree shares every
/// untouched subtree with the snapshot it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root node, ordered block children
    Document { content: Vec<Arc<Node>> },

    /// Text block, ordered text runs
    Paragraph { content: Vec<Arc<Node>> },

    /// Typed component node. Atomic types never carry content.
    Component {
        component_type: String,
        attrs: Attrs,
        content: Vec<Arc<Node>>,
    },

    /// Plain text run
    Text { text: String },
}

impl Node {
    pub fn document(content: Vec<Node>) -> Self {
        Node::Document {
            content: content.into_iter().map(Arc::new).collect(),
        }
    }

    /// Paragraph holding a single text run (or nothing for empty text)
    pub fn paragraph(text: &str) -> Self {
        let content = if text.is_empty() {
            vec![]
        } else {
            vec![Arc::new(Node::text(text))]
        };
        Node::Paragraph { content }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn component(component_type: impl Into<String>, attrs: Attrs) -> Self {
        Node::Component {
            component_type: component_type.into(),
            attrs,
            content: vec![],
        }
    }

    /// Replace the children of a container node
    pub fn with_content(mut self, children: Vec<Node>) -> Self {
        if let Some(content) = self.content_mut() {
            *content = children.into_iter().map(Arc::new).collect();
        }
        self
    }

    /// Type name as used by the document JSON format
    pub fn type_name(&self) -> &str {
        match self {
            Node::Document { .. } => "document",
            Node::Paragraph { .. } => "paragraph",
            Node::Component { component_type, .. } => component_type,
            Node::Text { .. } => "text",
        }
    }

    pub fn content(&self) -> &[Arc<Node>] {
        match self {
            Node::Document { content }
            | Node::Paragraph { content }
            | Node::Component { content, .. } => content,
            Node::Text { .. } => &[],
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut Vec<Arc<Node>>> {
        match self {
            Node::Document { content }
            | Node::Paragraph { content }
            | Node::Component { content, .. } => Some(content),
            Node::Text { .. } => None,
        }
    }

    pub fn attrs(&self) -> Option<&Attrs> {
        match self {
            Node::Component { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    pub fn attrs_mut(&mut self) -> Option<&mut Attrs> {
        match self {
            Node::Component { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Value of the `id` attribute, if this is a component carrying one
    pub fn id(&self) -> Option<&str> {
        self.attrs()
            .and_then(|attrs| attrs.get(ID_ATTR))
            .and_then(Value::as_str)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    pub fn is_textblock(&self) -> bool {
        matches!(self, Node::Paragraph { .. })
    }

    pub fn is_component(&self) -> bool {
        matches!(self, Node::Component { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Paragraph { .. } | Node::Component { .. })
    }

    /// Size of the content, in positions
    pub fn content_size(&self) -> usize {
        self.content().iter().map(|child| child.node_size()).sum()
    }

    /// Size of the node itself: text counts chars, every other node adds an
    /// opening and a closing token around its content.
    pub fn node_size(&self) -> usize {
        match self {
            Node::Text { text } => text.chars().count(),
            _ => self.content_size() + 2,
        }
    }

    /// Concatenated text of all descendant text runs
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            _ => self
                .content()
                .iter()
                .map(|child| child.text_content())
                .collect(),
        }
    }

    /// Pre-order walk over all descendants with the position before each
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(self)
    }

    /// First node (pre-order) whose `id` attribute equals `id`, with the
    /// position directly before it
    pub fn find_by_id(&self, id: &str) -> Option<(&Node, usize)> {
        self.descendants().find(|(node, _)| node.id() == Some(id))
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Document { content: vec![] }
    }
}

/// Iterative depth-first pre-order traversal with an explicit stack
pub struct Descendants<'a> {
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> Descendants<'a> {
    fn new(root: &'a Node) -> Self {
        let mut walker = Self { stack: Vec::new() };
        // the root has no opening token, its first child sits at 0
        walker.push_children(root, 0);
        walker
    }

    fn push_children(&mut self, node: &'a Node, content_start: usize) {
        let mut pos = content_start;
        let mut children = Vec::with_capacity(node.content().len());
        for child in node.content() {
            children.push((child.as_ref(), pos));
            pos += child.node_size();
        }
        self.stack.extend(children.into_iter().rev());
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (&'a Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, pos) = self.stack.pop()?;
        if !node.is_text() {
            self.push_children(node, pos + 1);
        }
        Some((node, pos))
    }
}
