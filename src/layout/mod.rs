//! Deterministic node-link layout.
//!
//! Layout runs in two pure passes over a [`VisibleNode`] tree: a bottom-up
//! sizing pass ([`size`]) followed by a top-down positioning pass
//! ([`position`]). Both return fresh records; nothing is mutated in place.

use eframe::egui::{Pos2, Rect, pos2, vec2};

use crate::tree::NodeId;
use crate::view::VisibleNode;

mod cache;
mod position;
mod size;
mod text_block;

pub use cache::LayoutCache;
pub use position::position_tree;
pub use size::{SizedNode, children_span, size_tree};
pub use text_block::{BlockSize, line_height, measure_block, wrap_text};

/// Horizontal gap between a parent block and its children's column.
pub const HORIZONTAL_GAP: f32 = 100.0;
/// Vertical gap between sibling subtree bands.
pub const VERTICAL_GAP: f32 = 32.0;
/// Extra leading per line, as a fraction of the font size.
pub const LINE_SPACING_FACTOR: f32 = 0.25;
/// Distance between a block edge and its connector anchor.
pub const ANCHOR_X_OFFSET: f32 = 16.0;

/// Text measuring capability. Widths are in content-space units.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub max_width: f32,
    pub font_size: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            max_width: 800.0,
            font_size: 32.0,
        }
    }
}

/// A positioned node. `x`/`y` are the absolute content-space top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
    pub tree_width: f32,
    pub tree_height: f32,
    pub x: f32,
    pub y: f32,
    pub collapsed: bool,
    /// Descendants hidden behind a collapsed node; zero when expanded.
    pub hidden_descendants: usize,
    pub nodes: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(pos2(self.x, self.y), vec2(self.width, self.height))
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, point: Pos2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn node_count(&self) -> usize {
        1 + self.nodes.iter().map(LayoutNode::node_count).sum::<usize>()
    }

    /// Bounding box of this node's whole subtree.
    pub fn tree_rect(&self) -> Rect {
        Rect::from_min_size(
            pos2(self.x, self.mid_y() - self.tree_height / 2.0),
            vec2(self.tree_width, self.tree_height),
        )
    }
}

/// Word-wraps, sizes and positions a visible tree.
pub fn layout_tree(measure: &dyn TextMeasure, tree: &VisibleNode, params: LayoutParams) -> LayoutNode {
    let sized = size_tree(measure, tree, params);
    position_tree(&sized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedWidthMeasure;
    use crate::tree::TreeBuilder;
    use crate::view::{CollapsedSet, collapse_tree};

    const CHAR: f32 = 10.0;

    fn params() -> LayoutParams {
        LayoutParams {
            max_width: 60.0,
            font_size: 20.0,
        }
    }

    #[test]
    fn wrapped_leaf_scenario_centers_root_on_children_span() {
        let mut builder = TreeBuilder::new();
        let tree = builder.node("root", |b| vec![b.leaf("a"), b.leaf("bbbbb bbbbb")]);
        let visible = collapse_tree(&tree, &CollapsedSet::default());

        let layout = layout_tree(&FixedWidthMeasure::new(CHAR), &visible, params());
        let line = line_height(params().font_size);

        let a = &layout.nodes[0];
        let b = &layout.nodes[1];
        assert_eq!(a.lines.len(), 1);
        assert_eq!(b.lines, vec!["bbbbb", "bbbbb"]);
        assert_eq!(a.height, line);
        assert_eq!(b.height, 2.0 * line);
        assert_eq!(layout.tree_height, a.height + b.height + VERTICAL_GAP);

        let span_top = a.y;
        let span_bottom = b.y + b.height;
        assert!((layout.mid_y() - (span_top + span_bottom) / 2.0).abs() < 1e-3);
        assert_eq!(layout.x, 0.0);
        assert_eq!(a.x, layout.width + HORIZONTAL_GAP);
    }

    #[test]
    fn tall_parent_with_short_child_keeps_its_own_height() {
        let mut builder = TreeBuilder::new();
        let tree = builder.node("aaaaa aaaaa aaaaa aaaaa", |b| vec![b.leaf("c")]);
        let visible = collapse_tree(&tree, &CollapsedSet::default());

        let layout = layout_tree(&FixedWidthMeasure::new(CHAR), &visible, params());

        assert_eq!(layout.lines.len(), 4);
        assert_eq!(layout.tree_height, layout.height);
        assert_eq!(layout.y, 0.0);
        assert!((layout.nodes[0].mid_y() - layout.mid_y()).abs() < 1e-3);
    }

    #[test]
    fn relayout_is_deterministic() {
        let mut builder = TreeBuilder::new();
        let tree = builder.node("root", |b| {
            vec![b.node("one two three", |b| vec![b.leaf("x"), b.leaf("y")]), b.leaf("z")]
        });
        let visible = collapse_tree(&tree, &CollapsedSet::default());
        let measure = FixedWidthMeasure::new(CHAR);

        let sized = size_tree(&measure, &visible, params());
        assert_eq!(position_tree(&sized), position_tree(&sized));
        assert_eq!(layout_tree(&measure, &visible, params()), position_tree(&sized));
    }
}
