//! # Document Handle
//!
//! Owns the current snapshot of a document together with its selection.
//! Nothing else mutates the tree: collaborators read snapshots and hand in
//! transactions.
//!
//! ## Lifecycle
//!
//! ```text
//!  snapshot ──(transaction)──→ new snapshot ──→ observers
//!     ↑                             │
//!     └──────── current slot ←──────┘
//! ```

use crate::layout::{Coords, PositionMap};
use crate::selection::Selection;
use crate::steps::Step;
use crate::transaction::Transaction;
use crate::EditorError;
use std::sync::Arc;
use uibuilder_components::{ComponentDefinition, ComponentRegistry};
use uibuilder_model::{from_json, resolve, to_json, IdGenerator, Node};

/// Editable document
#[derive(Debug, Clone)]
pub struct Document {
    /// Current version number (increments on each applied transaction)
    pub version: u64,

    snapshot: Arc<Node>,
    selection: Selection,
    ids: IdGenerator,
}

/// Result of applying a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionResult {
    pub version: u64,
    pub doc_changed: bool,
    pub selection_changed: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Document holding a single empty paragraph
    pub fn new() -> Self {
        Self::from_node(Node::document(vec![Node::paragraph("")]))
    }

    /// Wrap an existing tree. The selection starts at the first selectable
    /// spot and ids continue past every id already in the tree.
    pub fn from_node(root: Node) -> Self {
        Self::from_node_with(root, &ComponentRegistry::with_builtin_components())
    }

    /// Like [`Document::from_node`], snapping the initial selection with
    /// the registry later transactions will use
    pub fn from_node_with(root: Node, registry: &ComponentRegistry) -> Self {
        let ids = IdGenerator::seeded_from(&root);
        let selection = Selection::near(&root, 0, registry);

        Self {
            version: 0,
            snapshot: Arc::new(root),
            selection,
            ids,
        }
    }

    /// Load from the canonical JSON format
    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        Ok(Self::from_node(from_json(source)?))
    }

    pub fn to_json(&self) -> String {
        to_json(&self.snapshot)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Node> {
        Arc::clone(&self.snapshot)
    }

    /// Current tree
    pub fn tree(&self) -> &Node {
        &self.snapshot
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Apply a transaction. Either every step applies and the result
    /// becomes the current snapshot, or nothing changes.
    pub fn dispatch(
        &mut self,
        tx: &Transaction,
        registry: &ComponentRegistry,
    ) -> Result<TransactionResult, EditorError> {
        let applied = tx.apply(&self.snapshot, self.selection, registry)?;

        let doc_changed = tx.changes_document();
        let selection_changed = applied.selection != self.selection;

        self.snapshot = applied.doc;
        self.selection = applied.selection;
        self.version += 1;

        for step in tx.steps() {
            if let Step::InsertNode { node, .. } | Step::ReplaceSelection { node } = step {
                self.observe_ids(node);
            }
        }

        tracing::debug!(
            version = self.version,
            steps = tx.steps().len(),
            doc_changed,
            "applied transaction"
        );

        Ok(TransactionResult {
            version: self.version,
            doc_changed,
            selection_changed,
        })
    }

    /// Insert `node` at `pos`
    pub fn insert_node(
        &mut self,
        pos: usize,
        node: Node,
        registry: &ComponentRegistry,
    ) -> Result<TransactionResult, EditorError> {
        self.dispatch(&Transaction::new().insert_node(pos, node), registry)
    }

    /// Replace the selected range with `node`; a caret inserts at the caret
    pub fn replace_selection(
        &mut self,
        node: Node,
        registry: &ComponentRegistry,
    ) -> Result<TransactionResult, EditorError> {
        self.dispatch(&Transaction::new().replace_selection(node), registry)
    }

    /// Move the selection to the nearest valid spot around `pos`
    pub fn set_selection(
        &mut self,
        pos: usize,
        registry: &ComponentRegistry,
    ) -> Result<TransactionResult, EditorError> {
        self.dispatch(&Transaction::new().set_selection(pos), registry)
    }

    /// Re-snap the selection against `registry`
    pub fn snap_selection(&mut self, registry: &ComponentRegistry) {
        self.selection = self.selection.snap(&self.snapshot, registry);
    }

    /// Tree position under an external coordinate
    pub fn resolve_position(&self, coords: Coords, layout: &dyn PositionMap) -> Option<usize> {
        layout
            .pos_at_coords(&self.snapshot, coords)
            .filter(|pos| resolve(&self.snapshot, *pos).is_some())
    }

    /// First node (depth-first pre-order) with the given id, and the
    /// position directly before it
    pub fn find_node_by_id(&self, id: &str) -> Option<(&Node, usize)> {
        self.snapshot.find_by_id(id)
    }

    /// Fresh id for a node of `component_type`
    pub fn next_id(&mut self, component_type: &str) -> String {
        self.ids.new_id(component_type)
    }

    /// New node of the given type: defaults plus a fresh id
    pub fn create_component(&mut self, definition: &ComponentDefinition) -> Node {
        let id = self.next_id(definition.id());
        Node::component(definition.id(), definition.create_attrs(&id))
    }

    fn observe_ids(&mut self, node: &Node) {
        if let Some(id) = node.id() {
            self.ids.observe(id);
        }
        for (child, _) in node.descendants() {
            if let Some(id) = child.id() {
                self.ids.observe(id);
            }
        }
    }
}
