//! # Transactions
//!
//! An ordered list of steps applied all-or-nothing to an immutable
//! snapshot. The snapshot handed in is never touched: edits unshare only
//! the nodes on the edited paths, every other subtree stays shared with it.

use crate::errors::StepError;
use crate::selection::Selection;
use crate::steps::{EditState, Step, StepMap};
use std::sync::Arc;
use uibuilder_components::ComponentRegistry;
use uibuilder_model::{Attrs, Node};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    steps: Vec<Step>,
}

/// Outcome of a successful transaction
#[derive(Debug, Clone)]
pub struct Applied {
    pub doc: Arc<Node>,
    pub selection: Selection,
    pub maps: Vec<StepMap>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn insert_node(self, pos: usize, node: Node) -> Self {
        self.step(Step::InsertNode { pos, node })
    }

    pub fn replace_selection(self, node: Node) -> Self {
        self.step(Step::ReplaceSelection { node })
    }

    pub fn set_selection(self, pos: usize) -> Self {
        self.step(Step::SetSelection { pos })
    }

    pub fn select_node(self, node_id: impl Into<String>) -> Self {
        self.step(Step::SelectNode {
            node_id: node_id.into(),
        })
    }

    pub fn update_attributes(self, node_id: impl Into<String>, attrs: Attrs) -> Self {
        self.step(Step::UpdateAttributes {
            node_id: node_id.into(),
            attrs,
        })
    }

    pub fn remove_node(self, node_id: impl Into<String>) -> Self {
        self.step(Step::RemoveNode {
            node_id: node_id.into(),
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any step edits the tree (as opposed to only the selection)
    pub fn changes_document(&self) -> bool {
        self.steps.iter().any(Step::changes_document)
    }

    /// Apply every step in order to `doc`. The resulting selection is
    /// snapped to a valid one.
    pub fn apply(
        &self,
        doc: &Arc<Node>,
        selection: Selection,
        registry: &ComponentRegistry,
    ) -> Result<Applied, StepError> {
        let mut state = EditState {
            doc: Arc::clone(doc),
            selection,
        };
        let mut maps = Vec::new();

        for step in &self.steps {
            maps.extend(step.apply(&mut state, registry)?);
        }

        let selection = state.selection.snap(&state.doc, registry);
        Ok(Applied {
            doc: state.doc,
            selection,
            maps,
        })
    }
}
