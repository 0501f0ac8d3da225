//! # Edit Session
//!
//! One user's editing surface over a document: the palette, property
//! panel, drop target and drag handles all go through here. Commands that
//! cannot apply (unknown component type, invalid position, missing node)
//! are logged and ignored; they never abort the session.

use crate::coordinator::{EditingEvent, EditingState, SelectionCoordinator};
use crate::document::{Document, TransactionResult};
use crate::layout::{Coords, PositionMap};
use crate::transaction::Transaction;
use crate::EditorError;
use std::sync::Arc;
use uibuilder_components::ComponentRegistry;
use uibuilder_model::{Attrs, Node};

/// Notification sent to session listeners
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A transaction was applied
    Transaction { version: u64, doc_changed: bool },

    /// The selected component changed
    SelectionChanged { node_id: Option<String> },

    /// Editing mode changed
    EditingChanged(EditingState),
}

type Listener = Box<dyn FnMut(&EditorEvent)>;

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    document: Document,
    registry: Arc<ComponentRegistry>,
    coordinator: SelectionCoordinator,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("version", &self.document.version)
            .field("selection", &self.document.selection())
            .field("editing", self.coordinator.editing_state())
            .finish()
    }
}

impl EditSession {
    pub fn new(id: impl Into<String>, mut document: Document, registry: Arc<ComponentRegistry>) -> Self {
        document.snap_selection(&registry);
        let mut coordinator = SelectionCoordinator::new();
        coordinator.sync(&document);

        Self {
            id: id.into(),
            document,
            registry,
            coordinator,
            listeners: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Register a listener for transactions and derived state changes
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a transaction and bring the derived state up to date
    pub fn dispatch(&mut self, tx: &Transaction) -> Result<TransactionResult, EditorError> {
        let result = self.document.dispatch(tx, &self.registry)?;

        let previous_selection = self.coordinator.selected_node_id().map(str::to_string);
        let previous_editing = self.coordinator.editing_state().clone();
        self.coordinator.sync(&self.document);

        self.emit(EditorEvent::Transaction {
            version: result.version,
            doc_changed: result.doc_changed,
        });
        let node_id = self.coordinator.selected_node_id().map(str::to_string);
        if node_id != previous_selection {
            self.emit(EditorEvent::SelectionChanged { node_id });
        }
        if self.coordinator.editing_state() != &previous_editing {
            self.emit(EditorEvent::EditingChanged(self.coordinator.editing_state().clone()));
        }

        Ok(result)
    }

    /// Palette insertion: put a new component of `component_id` in place of
    /// the selection and select it. Returns the new node's id.
    pub fn insert_component(&mut self, component_id: &str) -> Option<String> {
        let Some(definition) = self.registry.get(component_id).cloned() else {
            tracing::warn!(component = %component_id, "unknown component type, nothing inserted");
            return None;
        };

        let node = self.document.create_component(&definition);
        let node_id = node.id().map(str::to_string)?;

        let tx = Transaction::new()
            .replace_selection(node)
            .select_node(node_id.clone());
        match self.dispatch(&tx) {
            Ok(_) => Some(node_id),
            Err(err) => {
                tracing::warn!(component = %component_id, error = %err, "insert failed");
                None
            }
        }
    }

    /// Drop handling: `payload` names the dragged component type, `coords`
    /// is where it was dropped. Returns the new node's id.
    pub fn drop_component(
        &mut self,
        payload: &str,
        coords: Coords,
        layout: &dyn PositionMap,
    ) -> Option<String> {
        let component_id = payload.trim();
        let Some(definition) = self.registry.get(component_id).cloned() else {
            tracing::warn!(payload = %payload, "dropped payload is not a component type");
            return None;
        };

        let Some(pos) = self.document.resolve_position(coords, layout) else {
            tracing::debug!(left = coords.left, top = coords.top, "drop outside the document");
            return None;
        };

        let node = self.document.create_component(&definition);
        let node_id = node.id().map(str::to_string);

        match self.dispatch(&Transaction::new().insert_node(pos, node)) {
            Ok(_) => node_id,
            Err(err) => {
                tracing::warn!(component = %component_id, pos, error = %err, "drop failed");
                None
            }
        }
    }

    /// Property panel edit
    pub fn update_attributes(&mut self, node_id: &str, attrs: Attrs) -> bool {
        self.try_dispatch(Transaction::new().update_attributes(node_id, attrs))
    }

    /// Drag handle delete
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        self.try_dispatch(Transaction::new().remove_node(node_id))
    }

    /// Select the component with `node_id`
    pub fn select_node(&mut self, node_id: &str) -> bool {
        let Some((_, pos)) = self.document.find_node_by_id(node_id) else {
            tracing::debug!(node_id = %node_id, "no node to select");
            return false;
        };
        self.try_dispatch(Transaction::new().set_selection(pos))
    }

    /// Move the selection near `pos`
    pub fn set_selection(&mut self, pos: usize) -> bool {
        self.try_dispatch(Transaction::new().set_selection(pos))
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.coordinator.selected_node()
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.coordinator.selected_node_id()
    }

    pub fn editing_state(&self) -> &EditingState {
        self.coordinator.editing_state()
    }

    pub fn start_editing(&mut self, node_id: &str) {
        self.handle_editing(EditingEvent::DoubleActivate {
            node_id: node_id.to_string(),
        });
    }

    pub fn stop_editing(&mut self) {
        self.handle_editing(EditingEvent::Cancel);
    }

    pub fn handle_editing(&mut self, event: EditingEvent) {
        if self.coordinator.handle(event) {
            self.emit(EditorEvent::EditingChanged(self.coordinator.editing_state().clone()));
        }
    }

    fn try_dispatch(&mut self, tx: Transaction) -> bool {
        match self.dispatch(&tx) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "command ignored");
                false
            }
        }
    }

    fn emit(&mut self, event: EditorEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
