//! # Selection & editing coordinator
//!
//! Derived state recomputed after every transaction and every selection
//! change: which component is selected, and which one (if any) is in
//! inline editing mode.
//!
//! ## Editing mode
//!
//! ```text
//!            double activation(id)
//!  Viewing ─────────────────────────→ Editing(id)
//!     ↑                                   │
//!     └──── escape / stop_editing() ──────┘
//! ```

use crate::document::Document;
use crate::selection::Selection;
use uibuilder_model::{resolve, Node};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditingState {
    #[default]
    Viewing,
    Editing(String),
}

/// External signals driving the editing toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditingEvent {
    /// Double click (or equivalent) on the component with this id
    DoubleActivate { node_id: String },
    /// Escape key
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    selected: Option<SelectedNode>,
    editing: EditingState,
}

#[derive(Debug, Clone, PartialEq)]
struct SelectedNode {
    node: Node,
    pos: usize,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the derived state from the document. Leaves editing mode
    /// when the node being edited no longer exists.
    pub fn sync(&mut self, doc: &Document) {
        self.selected = selected_node(doc.tree(), doc.selection()).map(|(node, pos)| SelectedNode {
            node: node.clone(),
            pos,
        });

        if let EditingState::Editing(id) = &self.editing {
            if doc.find_node_by_id(id).is_none() {
                tracing::debug!(node_id = %id, "edited node is gone, leaving editing mode");
                self.editing = EditingState::Viewing;
            }
        }
    }

    /// Nearest enclosing component of the selection
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_ref().map(|selected| &selected.node)
    }

    /// Position directly before the selected node
    pub fn selected_pos(&self) -> Option<usize> {
        self.selected.as_ref().map(|selected| selected.pos)
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node().and_then(Node::id)
    }

    pub fn editing_state(&self) -> &EditingState {
        &self.editing
    }

    pub fn editing_node_id(&self) -> Option<&str> {
        match &self.editing {
            EditingState::Editing(id) => Some(id),
            EditingState::Viewing => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.editing, EditingState::Editing(_))
    }

    /// Enter editing mode for `node_id`, replacing any other node being
    /// edited. Returns whether the state changed.
    pub fn start_editing(&mut self, node_id: impl Into<String>) -> bool {
        let next = EditingState::Editing(node_id.into());
        if self.editing == next {
            return false;
        }
        self.editing = next;
        true
    }

    /// Back to viewing. Returns whether the state changed.
    pub fn stop_editing(&mut self) -> bool {
        if self.editing == EditingState::Viewing {
            return false;
        }
        self.editing = EditingState::Viewing;
        true
    }

    pub fn handle(&mut self, event: EditingEvent) -> bool {
        match event {
            EditingEvent::DoubleActivate { node_id } => self.start_editing(node_id),
            EditingEvent::Cancel => self.stop_editing(),
        }
    }
}

/// The node a selection designates: the selected node itself for a node
/// selection, otherwise the innermost ancestor of the anchor that is
/// neither the root nor a paragraph
pub fn selected_node(doc: &Node, selection: Selection) -> Option<(&Node, usize)> {
    match selection {
        Selection::Node { pos } => {
            let rp = resolve(doc, pos)?;
            rp.node_after()
                .filter(|node| node.is_component())
                .map(|node| (node, pos))
        }
        Selection::Text { anchor, .. } => {
            let rp = resolve(doc, anchor)?;
            let (depth, node) = rp
                .ancestors()
                .find(|(depth, node)| *depth > 0 && !node.is_textblock())?;
            Some((node, rp.before(depth)))
        }
    }
}
