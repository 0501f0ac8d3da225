//! # Transaction steps
//!
//! Atomic edits a transaction is built from. Each step validates against
//! the working tree and either applies completely or fails; a failing step
//! fails its whole transaction.
//!
//! ## Step semantics
//!
//! ### InsertNode
//! - Block nodes go between blocks. Inside a paragraph the paragraph is
//!   split (or the block lands before/after it when the position is at
//!   its start/end)
//! - Text inside a paragraph is spliced in; text between blocks is wrapped
//!   in a new paragraph
//! - Positions inside an atomic component are rejected
//!
//! ### ReplaceSelection
//! - Deletes the selected range, then inserts at its start
//! - The selection ends up after the inserted node
//!
//! ### SetSelection / SelectNode
//! - Snap the selection near a position, or near the node with an id
//!
//! ### UpdateAttributes
//! - Merges into the node's attributes and renormalizes them; `null`
//!   resets an attribute to its default. The node's id never changes.
//!
//! ### RemoveNode
//! - Removes the node and its whole subtree

use crate::errors::StepError;
use crate::selection::{atomic_depth, Selection};
use serde_json::Value;
use std::sync::Arc;
use uibuilder_components::ComponentRegistry;
use uibuilder_model::{resolve, Attrs, Node, ResolvedPos, ID_ATTR};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Insert a node at a position
    InsertNode { pos: usize, node: Node },

    /// Replace the current selection with a node
    ReplaceSelection { node: Node },

    /// Move the selection near a position
    SetSelection { pos: usize },

    /// Select the component with the given id
    SelectNode { node_id: String },

    /// Merge attributes into the component with the given id
    UpdateAttributes { node_id: String, attrs: Attrs },

    /// Remove the component with the given id
    RemoveNode { node_id: String },
}

/// One replaced range: `old_size` positions at `start` became `new_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMap {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepMap {
    pub const IDENTITY: StepMap = StepMap {
        start: 0,
        old_size: 0,
        new_size: 0,
    };

    pub fn new(start: usize, old_size: usize, new_size: usize) -> Self {
        Self {
            start,
            old_size,
            new_size,
        }
    }

    /// Where `pos` ends up. Positions inside the replaced range, and at an
    /// insertion point, move to the end of the new content.
    pub fn map(&self, pos: usize) -> usize {
        if pos < self.start {
            pos
        } else if pos <= self.start + self.old_size {
            self.start + self.new_size
        } else {
            pos - self.old_size + self.new_size
        }
    }
}

/// Tree and selection a transaction threads through its steps
#[derive(Debug, Clone)]
pub struct EditState {
    pub doc: Arc<Node>,
    pub selection: Selection,
}

impl Step {
    pub fn changes_document(&self) -> bool {
        !matches!(self, Step::SetSelection { .. } | Step::SelectNode { .. })
    }

    /// Apply to `state`, returning the position maps of the change
    pub fn apply(
        &self,
        state: &mut EditState,
        registry: &ComponentRegistry,
    ) -> Result<Vec<StepMap>, StepError> {
        match self {
            Step::InsertNode { pos, node } => {
                let node = prepare_node(node, registry)?;
                let (map, _) = insert_at(Arc::make_mut(&mut state.doc), *pos, node, registry)?;
                state.selection = state.selection.map(&map);
                Ok(vec![map])
            }

            Step::ReplaceSelection { node } => {
                let node = prepare_node(node, registry)?;
                let (from, to) = state.selection.range(&state.doc);
                let doc = Arc::make_mut(&mut state.doc);
                let deleted = delete_range(doc, from, to, registry)?;
                let (inserted, after) = insert_at(doc, from, node, registry)?;
                state.selection = Selection::near(&state.doc, after, registry);
                Ok(vec![deleted, inserted])
            }

            Step::SetSelection { pos } => {
                if *pos > state.doc.content_size() {
                    return Err(StepError::invalid_position(*pos, "outside the document"));
                }
                state.selection = Selection::near(&state.doc, *pos, registry);
                Ok(vec![])
            }

            Step::SelectNode { node_id } => {
                let (_, pos) = state
                    .doc
                    .find_by_id(node_id)
                    .ok_or_else(|| StepError::NodeNotFound(node_id.clone()))?;
                state.selection = Selection::near(&state.doc, pos, registry);
                Ok(vec![])
            }

            Step::UpdateAttributes { node_id, attrs } => {
                update_attributes(Arc::make_mut(&mut state.doc), node_id, attrs, registry)?;
                Ok(vec![StepMap::IDENTITY])
            }

            Step::RemoveNode { node_id } => {
                let (pos, size) = state
                    .doc
                    .find_by_id(node_id)
                    .map(|(node, pos)| (pos, node.node_size()))
                    .ok_or_else(|| StepError::NodeNotFound(node_id.clone()))?;
                let map = delete_range(Arc::make_mut(&mut state.doc), pos, pos + size, registry)?;
                state.selection = state.selection.map(&map);
                Ok(vec![map])
            }
        }
    }
}

/// Validate a node for insertion and normalize the attributes of every
/// component in it
fn prepare_node(node: &Node, registry: &ComponentRegistry) -> Result<Node, StepError> {
    match node {
        Node::Document { .. } => Err(StepError::invalid_structure(
            "a document cannot be inserted into a document",
        )),
        Node::Text { .. } => Ok(node.clone()),
        Node::Paragraph { content } => {
            if content.iter().any(|child| !child.is_text()) {
                return Err(StepError::invalid_structure(
                    "paragraphs may only contain text",
                ));
            }
            Ok(node.clone())
        }
        Node::Component {
            component_type,
            attrs,
            content,
        } => {
            let definition = registry
                .get(component_type)
                .ok_or_else(|| StepError::UnknownComponentType(component_type.clone()))?;

            if definition.is_atom() && !content.is_empty() {
                return Err(StepError::invalid_structure(format!(
                    "\"{}\" is atomic and cannot have content",
                    component_type
                )));
            }

            let content = content
                .iter()
                .map(|child| {
                    if !child.is_block() {
                        return Err(StepError::invalid_structure(format!(
                            "\"{}\" may only contain blocks",
                            component_type
                        )));
                    }
                    prepare_node(child, registry).map(Arc::new)
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Node::Component {
                component_type: component_type.clone(),
                attrs: definition.normalize(attrs),
                content,
            })
        }
    }
}

enum InsertTarget {
    /// Between the blocks of a document or container
    Block { path: Vec<usize>, index: usize },
    /// Text into a paragraph
    Text { path: Vec<usize>, offset: usize },
    /// Block into a paragraph
    Split {
        path: Vec<usize>,
        offset: usize,
        paragraph_size: usize,
        before: usize,
    },
}

/// Insert `node` at `pos`, returning the position map and the position
/// directly after the inserted node
fn insert_at(
    doc: &mut Node,
    pos: usize,
    node: Node,
    registry: &ComponentRegistry,
) -> Result<(StepMap, usize), StepError> {
    let target = {
        let rp = resolve_editable(doc, pos, registry)?;
        let depth = rp.depth();
        let parent = rp.parent();

        if parent.is_textblock() {
            if node.is_text() {
                InsertTarget::Text {
                    path: path_to_parent(&rp),
                    offset: rp.parent_offset,
                }
            } else {
                InsertTarget::Split {
                    path: path_to_parent(&rp),
                    offset: rp.parent_offset,
                    paragraph_size: parent.content_size(),
                    before: rp.before(depth),
                }
            }
        } else {
            InsertTarget::Block {
                path: path_to_parent(&rp),
                index: rp.index(),
            }
        }
    };

    match target {
        InsertTarget::Block { path, index } => {
            let node = match node {
                Node::Text { text } => Node::paragraph(&text),
                block => block,
            };
            let size = node.node_size();
            children_at_path_mut(doc, &path)?.insert(index, Arc::new(node));
            Ok((StepMap::new(pos, 0, size), pos + size))
        }

        InsertTarget::Text { path, offset } => {
            let inserted = node.text_content();
            let size = inserted.chars().count();
            let paragraph = node_at_path_mut(doc, &path)?;
            let mut text = paragraph.text_content();
            text.insert_str(byte_offset(&text, offset), &inserted);
            set_paragraph_text(paragraph, text);
            Ok((StepMap::new(pos, 0, size), pos + size))
        }

        InsertTarget::Split {
            path,
            offset,
            paragraph_size,
            before,
        } => {
            let size = node.node_size();
            let (parent_path, index) = split_path(&path)?;

            if offset == 0 {
                children_at_path_mut(doc, parent_path)?.insert(index, Arc::new(node));
                return Ok((StepMap::new(before, 0, size), before + size));
            }

            if offset == paragraph_size {
                let after = pos + 1;
                children_at_path_mut(doc, parent_path)?.insert(index + 1, Arc::new(node));
                return Ok((StepMap::new(after, 0, size), after + size));
            }

            let children = children_at_path_mut(doc, parent_path)?;
            let text = children[index].text_content();
            let split = byte_offset(&text, offset);
            let (left, right) = text.split_at(split);
            children.splice(
                index..=index,
                [
                    Arc::new(Node::paragraph(left)),
                    Arc::new(node),
                    Arc::new(Node::paragraph(right)),
                ],
            );
            Ok((StepMap::new(pos, 0, size + 2), pos + 1 + size))
        }
    }
}

enum DeletePlan {
    /// Chars of one paragraph
    Text {
        path: Vec<usize>,
        from: usize,
        to: usize,
    },
    /// Whole blocks of one parent
    Blocks {
        path: Vec<usize>,
        from: usize,
        to: usize,
    },
    /// From inside one paragraph to inside a later sibling paragraph; the
    /// two remainders are joined
    Join {
        path: Vec<usize>,
        from_index: usize,
        from_offset: usize,
        to_index: usize,
        to_offset: usize,
    },
}

/// Delete the content between `from` and `to`
fn delete_range(
    doc: &mut Node,
    from: usize,
    to: usize,
    registry: &ComponentRegistry,
) -> Result<StepMap, StepError> {
    if from >= to {
        return Ok(StepMap::IDENTITY);
    }

    let plan = {
        let start = resolve_editable(doc, from, registry)?;
        let end = resolve_editable(doc, to, registry)?;
        let depth = start.depth();

        if depth == end.depth() && start.start(depth) == end.start(depth) {
            if start.parent().is_textblock() {
                DeletePlan::Text {
                    path: path_to_parent(&start),
                    from: start.parent_offset,
                    to: end.parent_offset,
                }
            } else {
                DeletePlan::Blocks {
                    path: path_to_parent(&start),
                    from: start.index(),
                    to: end.index(),
                }
            }
        } else if depth == end.depth()
            && depth > 0
            && start.parent().is_textblock()
            && end.parent().is_textblock()
            && start.start(depth - 1) == end.start(depth - 1)
        {
            let mut path = path_to_parent(&start);
            path.pop();
            DeletePlan::Join {
                path,
                from_index: start.index_at(depth - 1),
                from_offset: start.parent_offset,
                to_index: end.index_at(depth - 1),
                to_offset: end.parent_offset,
            }
        } else {
            return Err(StepError::invalid_position(
                from,
                format!("range to {} crosses node boundaries", to),
            ));
        }
    };

    match plan {
        DeletePlan::Text { path, from, to } => {
            let paragraph = node_at_path_mut(doc, &path)?;
            let text = paragraph.text_content();
            let kept = format!(
                "{}{}",
                &text[..byte_offset(&text, from)],
                &text[byte_offset(&text, to)..]
            );
            set_paragraph_text(paragraph, kept);
        }

        DeletePlan::Blocks { path, from, to } => {
            children_at_path_mut(doc, &path)?.drain(from..to);
        }

        DeletePlan::Join {
            path,
            from_index,
            from_offset,
            to_index,
            to_offset,
        } => {
            let children = children_at_path_mut(doc, &path)?;
            let left = children[from_index].text_content();
            let right = children[to_index].text_content();
            let joined = format!(
                "{}{}",
                &left[..byte_offset(&left, from_offset)],
                &right[byte_offset(&right, to_offset)..]
            );
            children.splice(from_index..=to_index, [Arc::new(Node::paragraph(&joined))]);
        }
    }

    Ok(StepMap::new(from, to - from, 0))
}

fn update_attributes(
    doc: &mut Node,
    node_id: &str,
    attrs: &Attrs,
    registry: &ComponentRegistry,
) -> Result<(), StepError> {
    let (path, normalized) = {
        let (node, pos) = doc
            .find_by_id(node_id)
            .ok_or_else(|| StepError::NodeNotFound(node_id.to_string()))?;
        let definition = registry
            .get(node.type_name())
            .ok_or_else(|| StepError::UnknownComponentType(node.type_name().to_string()))?;

        let mut merged = node.attrs().cloned().unwrap_or_default();
        for (key, value) in attrs {
            if key == ID_ATTR {
                continue;
            }
            match value {
                Value::Null => {
                    merged.remove(key);
                }
                value => {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        let rp = resolve(doc, pos)
            .ok_or_else(|| StepError::invalid_position(pos, "outside the document"))?;
        let mut path = path_to_parent(&rp);
        path.push(rp.index());
        (path, definition.normalize(&merged))
    };

    let target = node_at_path_mut(doc, &path)?;
    let attrs = target
        .attrs_mut()
        .ok_or_else(|| StepError::invalid_structure(format!("{} is not a component", node_id)))?;
    *attrs = normalized;
    Ok(())
}

/// Resolve a position that an edit may touch
fn resolve_editable<'a>(
    doc: &'a Node,
    pos: usize,
    registry: &ComponentRegistry,
) -> Result<ResolvedPos<'a>, StepError> {
    let rp = resolve(doc, pos)
        .ok_or_else(|| StepError::invalid_position(pos, "outside the document"))?;
    if let Some(depth) = atomic_depth(&rp, registry) {
        return Err(StepError::invalid_position(
            pos,
            format!("inside atomic node \"{}\"", rp.node(depth).type_name()),
        ));
    }
    Ok(rp)
}

/// Child indices leading from the root to the innermost parent
fn path_to_parent(rp: &ResolvedPos<'_>) -> Vec<usize> {
    (0..rp.depth()).map(|depth| rp.index_at(depth)).collect()
}

fn split_path(path: &[usize]) -> Result<(&[usize], usize), StepError> {
    path.split_last()
        .map(|(index, parent)| (parent, *index))
        .ok_or_else(|| StepError::invalid_structure("paragraph without a parent"))
}

/// Follow `path` from the root, unsharing every node on the way
fn node_at_path_mut<'a>(root: &'a mut Node, path: &[usize]) -> Result<&'a mut Node, StepError> {
    let mut node = root;
    for &index in path {
        let child = node
            .content_mut()
            .and_then(|content| content.get_mut(index))
            .ok_or_else(|| StepError::invalid_structure("path does not exist"))?;
        node = Arc::make_mut(child);
    }
    Ok(node)
}

fn children_at_path_mut<'a>(
    root: &'a mut Node,
    path: &[usize],
) -> Result<&'a mut Vec<Arc<Node>>, StepError> {
    node_at_path_mut(root, path)?
        .content_mut()
        .ok_or_else(|| StepError::invalid_structure("text has no children"))
}

fn set_paragraph_text(paragraph: &mut Node, text: String) {
    if let Some(content) = paragraph.content_mut() {
        *content = if text.is_empty() {
            vec![]
        } else {
            vec![Arc::new(Node::text(text))]
        };
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ComponentRegistry {
        ComponentRegistry::with_builtin_components()
    }

    fn button(id: &str) -> Node {
        let mut attrs = Attrs::new();
        attrs.insert("id".to_string(), json!(id));
        Node::component("button", attrs)
    }

    fn state(doc: Node) -> EditState {
        EditState {
            doc: Arc::new(doc),
            selection: Selection::caret(1),
        }
    }

    fn types(doc: &Node) -> Vec<String> {
        doc.content()
            .iter()
            .map(|child| match child.as_ref() {
                Node::Paragraph { .. } => format!("p:{}", child.text_content()),
                other => other.type_name().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_step_map() {
        let insert = StepMap::new(4, 0, 2);
        assert_eq!(insert.map(3), 3);
        assert_eq!(insert.map(4), 6);
        assert_eq!(insert.map(5), 7);

        let delete = StepMap::new(2, 3, 0);
        assert_eq!(delete.map(1), 1);
        assert_eq!(delete.map(4), 2);
        assert_eq!(delete.map(9), 6);

        assert_eq!(StepMap::IDENTITY.map(7), 7);
    }

    #[test]
    fn test_insert_between_blocks() {
        let mut state = state(Node::document(vec![Node::paragraph("Hi")]));
        let step = Step::InsertNode {
            pos: 4,
            node: button("button-1"),
        };
        let maps = step.apply(&mut state, &registry()).unwrap();

        assert_eq!(maps, vec![StepMap::new(4, 0, 2)]);
        assert_eq!(types(&state.doc), vec!["p:Hi", "button"]);
        // defaults filled in
        let attrs = state.doc.content()[1].attrs().unwrap();
        assert_eq!(attrs["text"], "Click me");
        assert_eq!(attrs["id"], "button-1");
    }

    #[test]
    fn test_insert_splits_paragraph() {
        let mut state = state(Node::document(vec![Node::paragraph("Hello")]));
        let step = Step::InsertNode {
            pos: 3,
            node: button("button-1"),
        };
        step.apply(&mut state, &registry()).unwrap();
        assert_eq!(types(&state.doc), vec!["p:He", "button", "p:llo"]);
    }

    #[test]
    fn test_insert_at_paragraph_edges_does_not_split() {
        let mut state = state(Node::document(vec![Node::paragraph("Hi")]));
        Step::InsertNode {
            pos: 1,
            node: button("button-1"),
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(types(&state.doc), vec!["button", "p:Hi"]);

        // paragraph now spans 2..6, its end is at 5
        Step::InsertNode {
            pos: 5,
            node: button("button-2"),
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(types(&state.doc), vec!["button", "p:Hi", "button"]);
        assert_eq!(state.doc.content()[2].id(), Some("button-2"));
    }

    #[test]
    fn test_insert_text() {
        let mut state = state(Node::document(vec![Node::paragraph("Hlo")]));
        Step::InsertNode {
            pos: 2,
            node: Node::text("el"),
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(types(&state.doc), vec!["p:Hello"]);

        Step::InsertNode {
            pos: 0,
            node: Node::text("Top"),
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(types(&state.doc), vec!["p:Top", "p:Hello"]);
    }

    #[test]
    fn test_insert_inside_atomic_rejected() {
        let mut state = state(Node::document(vec![button("button-1")]));
        let err = Step::InsertNode {
            pos: 1,
            node: button("button-2"),
        }
        .apply(&mut state, &registry())
        .unwrap_err();
        assert!(matches!(err, StepError::InvalidPosition { pos: 1, .. }));
    }

    #[test]
    fn test_insert_unknown_type_rejected() {
        let mut state = state(Node::document(vec![]));
        let err = Step::InsertNode {
            pos: 0,
            node: Node::component("slider", Attrs::new()),
        }
        .apply(&mut state, &registry())
        .unwrap_err();
        assert_eq!(err, StepError::UnknownComponentType("slider".to_string()));
    }

    #[test]
    fn test_insert_into_container() {
        let container = Node::component("container", Attrs::new());
        let mut state = state(Node::document(vec![container]));
        Step::InsertNode {
            pos: 1,
            node: button("button-1"),
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(state.doc.content()[0].content()[0].type_name(), "button");
        assert_eq!(state.doc.content_size(), 4);
    }

    #[test]
    fn test_atomic_node_with_content_rejected() {
        let mut state = state(Node::document(vec![]));
        let err = Step::InsertNode {
            pos: 0,
            node: button("button-1").with_content(vec![Node::paragraph("x")]),
        }
        .apply(&mut state, &registry())
        .unwrap_err();
        assert!(matches!(err, StepError::InvalidStructure(_)));
    }

    #[test]
    fn test_replace_node_selection() {
        let mut state = EditState {
            doc: Arc::new(Node::document(vec![
                Node::paragraph("a"),
                button("button-1"),
            ])),
            selection: Selection::Node { pos: 3 },
        };
        Step::ReplaceSelection {
            node: Node::component("container", Attrs::new()),
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(types(&state.doc), vec!["p:a", "container"]);
        assert_eq!(state.selection, Selection::Node { pos: 3 });
    }

    #[test]
    fn test_replace_text_range_across_paragraphs() {
        let mut state = EditState {
            doc: Arc::new(Node::document(vec![
                Node::paragraph("abc"),
                Node::paragraph("def"),
            ])),
            // from after "a" to after "de"
            selection: Selection::Text { anchor: 2, head: 8 },
        };
        Step::ReplaceSelection {
            node: button("button-1"),
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(types(&state.doc), vec!["p:a", "button", "p:f"]);
        assert_eq!(state.selection, Selection::caret(6));
    }

    #[test]
    fn test_update_attributes() {
        let mut state = state(Node::document(vec![button("button-1")]));
        let mut attrs = Attrs::new();
        attrs.insert("text".to_string(), json!("Save"));
        attrs.insert("size".to_string(), json!("huge"));
        attrs.insert("id".to_string(), json!("other"));
        Step::UpdateAttributes {
            node_id: "button-1".to_string(),
            attrs,
        }
        .apply(&mut state, &registry())
        .unwrap();

        let node = &state.doc.content()[0];
        assert_eq!(node.id(), Some("button-1"));
        assert_eq!(node.attrs().unwrap()["text"], "Save");
        assert_eq!(node.attrs().unwrap()["size"], "medium");
    }

    #[test]
    fn test_update_attributes_null_resets() {
        let mut state = state(Node::document(vec![button("button-1")]));
        let mut attrs = Attrs::new();
        attrs.insert("text".to_string(), json!("Save"));
        let step = Step::UpdateAttributes {
            node_id: "button-1".to_string(),
            attrs,
        };
        step.apply(&mut state, &registry()).unwrap();

        let mut reset = Attrs::new();
        reset.insert("text".to_string(), Value::Null);
        Step::UpdateAttributes {
            node_id: "button-1".to_string(),
            attrs: reset,
        }
        .apply(&mut state, &registry())
        .unwrap();
        assert_eq!(state.doc.content()[0].attrs().unwrap()["text"], "Click me");
    }

    #[test]
    fn test_remove_node() {
        let container = Node::component("container", Attrs::new())
            .with_content(vec![button("button-1"), Node::paragraph("x")]);
        let mut state = state(Node::document(vec![container]));
        let maps = Step::RemoveNode {
            node_id: "button-1".to_string(),
        }
        .apply(&mut state, &registry())
        .unwrap();

        assert_eq!(maps, vec![StepMap::new(1, 2, 0)]);
        assert_eq!(state.doc.content()[0].content().len(), 1);

        let err = Step::RemoveNode {
            node_id: "button-1".to_string(),
        }
        .apply(&mut state, &registry())
        .unwrap_err();
        assert_eq!(err, StepError::NodeNotFound("button-1".to_string()));
    }

    #[test]
    fn test_set_selection_out_of_range() {
        let mut state = state(Node::document(vec![Node::paragraph("a")]));
        let err = Step::SetSelection { pos: 9 }
            .apply(&mut state, &registry())
            .unwrap_err();
        assert!(matches!(err, StepError::InvalidPosition { pos: 9, .. }));
    }
}
