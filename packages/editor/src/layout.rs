//! Mapping from external coordinates to tree positions.
//!
//! The host (a renderer, a test) owns the actual layout; the editor only
//! asks it which position lies under a point. `LineLayout` is a simple
//! fixed-metrics layout for headless hosts: every leaf block is one line.

use uibuilder_model::Node;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub left: f64,
    pub top: f64,
}

impl Coords {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

pub trait PositionMap {
    /// Position under `coords`, or `None` outside every resolvable region
    fn pos_at_coords(&self, doc: &Node, coords: Coords) -> Option<usize>;
}

/// One line per paragraph or childless component, stacked top to bottom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    pub origin: Coords,
    pub width: f64,
    pub line_height: f64,
    pub char_width: f64,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            origin: Coords::new(0.0, 0.0),
            width: 800.0,
            line_height: 20.0,
            char_width: 8.0,
        }
    }
}

impl LineLayout {
    fn lines<'a>(&self, doc: &'a Node) -> Vec<(&'a Node, usize)> {
        doc.descendants()
            .filter(|(node, _)| node.is_textblock() || (node.is_component() && node.content().is_empty()))
            .collect()
    }
}

impl PositionMap for LineLayout {
    fn pos_at_coords(&self, doc: &Node, coords: Coords) -> Option<usize> {
        let left = coords.left - self.origin.left;
        let top = coords.top - self.origin.top;
        if left < 0.0 || top < 0.0 || left > self.width {
            return None;
        }

        let line = (top / self.line_height) as usize;
        let (node, start) = self.lines(doc).into_iter().nth(line)?;

        if node.is_textblock() {
            let column = (left / self.char_width).round() as usize;
            return Some(start + 1 + column.min(node.content_size()));
        }

        // childless component: left half drops before it, right half after
        if left < self.width / 2.0 {
            Some(start)
        } else {
            Some(start + node.node_size())
        }
    }
}
