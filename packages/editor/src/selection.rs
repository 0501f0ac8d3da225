//! # Selection
//!
//! A selection is either a text cursor/range inside paragraphs or a whole
//! component node. After every transaction the selection is snapped back to
//! a valid one: carets only live inside paragraphs, and positions that fall
//! inside an atomic component turn into a selection of that component.

use crate::steps::StepMap;
use uibuilder_components::ComponentRegistry;
use uibuilder_model::{resolve, Node, ResolvedPos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Text cursor (`anchor == head`) or text range
    Text { anchor: usize, head: usize },

    /// A whole node, addressed by the position directly before it
    Node { pos: usize },
}

impl Selection {
    pub fn caret(pos: usize) -> Self {
        Selection::Text {
            anchor: pos,
            head: pos,
        }
    }

    pub fn anchor(&self) -> usize {
        match self {
            Selection::Text { anchor, .. } => *anchor,
            Selection::Node { pos } => *pos,
        }
    }

    pub fn head(&self) -> usize {
        match self {
            Selection::Text { head, .. } => *head,
            Selection::Node { pos } => *pos,
        }
    }

    pub fn is_caret(&self) -> bool {
        matches!(self, Selection::Text { anchor, head } if anchor == head)
    }

    /// Ordered `(from, to)` range covered in `doc`
    pub fn range(&self, doc: &Node) -> (usize, usize) {
        match *self {
            Selection::Text { anchor, head } => (anchor.min(head), anchor.max(head)),
            Selection::Node { pos } => {
                let size = resolve(doc, pos)
                    .and_then(|rp| rp.node_after())
                    .map(Node::node_size)
                    .unwrap_or(0);
                (pos, pos + size)
            }
        }
    }

    /// Follow a document change
    pub fn map(&self, map: &StepMap) -> Self {
        match *self {
            Selection::Text { anchor, head } => Selection::Text {
                anchor: map.map(anchor),
                head: map.map(head),
            },
            Selection::Node { pos } => Selection::Node { pos: map.map(pos) },
        }
    }

    /// Whether the selection addresses something a user can actually select
    pub fn is_valid(&self, doc: &Node, registry: &ComponentRegistry) -> bool {
        match *self {
            Selection::Text { anchor, head } => {
                is_caret_position(doc, anchor, registry) && is_caret_position(doc, head, registry)
            }
            Selection::Node { pos } => resolve(doc, pos)
                .and_then(|rp| rp.node_after())
                .map_or(false, Node::is_component),
        }
    }

    /// This selection if it is still valid in `doc`, otherwise the nearest
    /// valid one to its head
    pub fn snap(self, doc: &Node, registry: &ComponentRegistry) -> Self {
        if self.is_valid(doc, registry) {
            self
        } else {
            Selection::near(doc, self.head(), registry)
        }
    }

    /// Nearest valid selection to `pos`
    ///
    /// Inside an atomic component, and directly in front of any component,
    /// this selects the component. Inside a paragraph it is a caret.
    /// Anywhere else the closest paragraph or leaf component wins, searching
    /// forward first.
    pub fn near(doc: &Node, pos: usize, registry: &ComponentRegistry) -> Self {
        let pos = pos.min(doc.content_size());
        let Some(rp) = resolve(doc, pos) else {
            return Selection::caret(0);
        };

        // a component's own position wins over any atomic ancestor
        if rp.node_after().map_or(false, Node::is_component) {
            return Selection::Node { pos };
        }

        if let Some(depth) = atomic_depth(&rp, registry) {
            return Selection::Node {
                pos: rp.before(depth),
            };
        }

        if rp.parent().is_textblock() {
            return Selection::caret(pos);
        }

        let leaves = leaf_blocks(doc, registry);
        find_near(&leaves, pos, true)
            .or_else(|| find_near(&leaves, pos, false))
            .unwrap_or(Selection::caret(pos))
    }
}

/// Components without a registered definition are treated as atomic
pub(crate) fn is_atomic(registry: &ComponentRegistry, node: &Node) -> bool {
    node.is_component()
        && registry
            .get(node.type_name())
            .map_or(true, |def| def.is_atom())
}

/// Depth of the outermost atomic ancestor containing the position
pub(crate) fn atomic_depth(rp: &ResolvedPos<'_>, registry: &ComponentRegistry) -> Option<usize> {
    rp.ancestors()
        .filter(|(depth, node)| *depth > 0 && is_atomic(registry, node))
        .map(|(depth, _)| depth)
        .last()
}

fn is_caret_position(doc: &Node, pos: usize, registry: &ComponentRegistry) -> bool {
    resolve(doc, pos).map_or(false, |rp| {
        rp.parent().is_textblock() && atomic_depth(&rp, registry).is_none()
    })
}

/// Blocks a selection can land on, in document order: paragraphs, atomic
/// components and empty containers. Nothing inside an atomic node counts.
fn leaf_blocks<'a>(doc: &'a Node, registry: &ComponentRegistry) -> Vec<(&'a Node, usize)> {
    fn walk<'a>(
        node: &'a Node,
        start: usize,
        registry: &ComponentRegistry,
        out: &mut Vec<(&'a Node, usize)>,
    ) {
        let mut pos = start;
        for child in node.content() {
            if child.is_textblock() || is_atomic(registry, child) || child.content().is_empty() {
                if child.is_block() {
                    out.push((child.as_ref(), pos));
                }
            } else {
                walk(child, pos + 1, registry, out);
            }
            pos += child.node_size();
        }
    }

    let mut out = Vec::new();
    walk(doc, 0, registry, &mut out);
    out
}

fn find_near(leaves: &[(&Node, usize)], pos: usize, forward: bool) -> Option<Selection> {
    let found = if forward {
        leaves.iter().find(|(_, start)| *start >= pos)
    } else {
        leaves
            .iter()
            .rev()
            .find(|(node, start)| start + node.node_size() <= pos)
    };

    found.map(|(node, start)| {
        if node.is_textblock() {
            let at = if forward { start + 1 } else { start + node.node_size() - 1 };
            Selection::caret(at)
        } else {
            Selection::Node { pos: *start }
        }
    })
}
