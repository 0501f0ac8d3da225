//! # Position resolution
//!
//! Positions are offsets into the flattened document. Every non-text node
//! contributes an opening and a closing token, text contributes one position
//! per char, and the root contributes nothing. A position resolves to the
//! chain of ancestors that contain it, from the root (depth 0) down to the
//! innermost parent.
//!
//! ```text
//!  0   1 2 3   4   5   6
//!  <p> H i </p> <btn> </btn>
//! ```

use crate::node::Node;

#[derive(Debug, Clone, Copy)]
struct Level<'a> {
    node: &'a Node,
    /// Index of the child the position points at (or into)
    index: usize,
    /// Absolute position where this node's content starts
    start: usize,
    /// Offset, relative to `start`, of the child at `index`
    child_offset: usize,
}

/// A position together with the ancestors that contain it
#[derive(Debug, Clone)]
pub struct ResolvedPos<'a> {
    pub pos: usize,
    levels: Vec<Level<'a>>,
    /// Offset of the position inside its innermost parent
    pub parent_offset: usize,
}

/// Resolve `pos` against `doc`; `None` when it lies outside the document
pub fn resolve(doc: &Node, pos: usize) -> Option<ResolvedPos<'_>> {
    if pos > doc.content_size() {
        return None;
    }

    let mut levels = Vec::new();
    let mut node = doc;
    let mut start = 0;
    let mut parent_offset = pos;

    loop {
        let (index, offset) = find_index(node, parent_offset);
        let rem = parent_offset - offset;
        levels.push(Level {
            node,
            index,
            start,
            child_offset: offset,
        });

        if rem == 0 {
            break;
        }

        let child = node.content()[index].as_ref();
        if child.is_text() {
            break;
        }

        node = child;
        start += offset + 1;
        parent_offset = rem - 1;
    }

    Some(ResolvedPos {
        pos,
        levels,
        parent_offset,
    })
}

/// Child index containing `offset` and that child's start offset. An
/// offset on a boundary reports the child after it.
fn find_index(node: &Node, offset: usize) -> (usize, usize) {
    let content = node.content();
    if offset == 0 {
        return (0, 0);
    }

    let mut cur = 0;
    for (i, child) in content.iter().enumerate() {
        let end = cur + child.node_size();
        if end >= offset {
            if end == offset {
                return (i + 1, end);
            }
            return (i, cur);
        }
        cur = end;
    }

    (content.len(), cur)
}

impl<'a> ResolvedPos<'a> {
    /// Depth of the innermost parent (0 = root)
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Ancestor at `depth`
    pub fn node(&self, depth: usize) -> &'a Node {
        self.levels[depth].node
    }

    /// Innermost parent
    pub fn parent(&self) -> &'a Node {
        self.node(self.depth())
    }

    /// Index into the innermost parent's content
    pub fn index(&self) -> usize {
        self.levels[self.depth()].index
    }

    /// Index into the content of the ancestor at `depth`
    pub fn index_at(&self, depth: usize) -> usize {
        self.levels[depth].index
    }

    /// Absolute position where the content of the ancestor at `depth` starts
    pub fn start(&self, depth: usize) -> usize {
        self.levels[depth].start
    }

    /// Absolute position where the content of the ancestor at `depth` ends
    pub fn end(&self, depth: usize) -> usize {
        self.start(depth) + self.node(depth).content_size()
    }

    /// Position directly before the ancestor at `depth` (depth >= 1)
    pub fn before(&self, depth: usize) -> usize {
        self.start(depth) - 1
    }

    /// Position directly after the ancestor at `depth` (depth >= 1)
    pub fn after(&self, depth: usize) -> usize {
        self.end(depth) + 1
    }

    /// Offset into the text run the position falls inside, 0 on boundaries
    pub fn text_offset(&self) -> usize {
        self.parent_offset - self.levels[self.depth()].child_offset
    }

    /// True when the position sits between two children of its parent
    pub fn is_boundary(&self) -> bool {
        self.text_offset() == 0
    }

    /// Node starting directly at this position
    pub fn node_after(&self) -> Option<&'a Node> {
        if !self.is_boundary() {
            return None;
        }
        self.parent()
            .content()
            .get(self.index())
            .map(|child| child.as_ref())
    }

    /// Node ending directly at this position
    pub fn node_before(&self) -> Option<&'a Node> {
        if !self.is_boundary() {
            return None;
        }
        let index = self.index();
        if index == 0 {
            return None;
        }
        self.parent()
            .content()
            .get(index - 1)
            .map(|child| child.as_ref())
    }

    /// Ancestors from the innermost parent outwards, with their depth
    pub fn ancestors(&self) -> impl Iterator<Item = (usize, &'a Node)> + '_ {
        (0..=self.depth()).rev().map(move |depth| (depth, self.node(depth)))
    }
}
