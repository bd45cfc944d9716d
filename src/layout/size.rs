use crate::tree::NodeId;
use crate::view::VisibleNode;

use super::{HORIZONTAL_GAP, LayoutParams, TextMeasure, VERTICAL_GAP, measure_block, wrap_text};

/// Output of the sizing pass: block and subtree sizes, no positions yet.
#[derive(Clone, Debug, PartialEq)]
pub struct SizedNode {
    pub id: NodeId,
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
    pub tree_width: f32,
    pub tree_height: f32,
    pub collapsed: bool,
    pub hidden_descendants: usize,
    pub nodes: Vec<SizedNode>,
}

/// Height of the stacked child bands, gaps included. Zero for a leaf.
pub fn children_span(nodes: &[SizedNode]) -> f32 {
    if nodes.is_empty() {
        return 0.0;
    }
    let bands = nodes.iter().map(|node| node.tree_height).sum::<f32>();
    bands + (nodes.len() - 1) as f32 * VERTICAL_GAP
}

/// Bottom-up sizing.
///
/// A node's `tree_height` is the larger of its own height and its children's
/// span, so a tall block with a short subtree still reserves its own height.
pub fn size_tree(measure: &dyn TextMeasure, node: &VisibleNode, params: LayoutParams) -> SizedNode {
    let lines = wrap_text(measure, &node.text, params.max_width, params.font_size);
    let block = measure_block(measure, &lines, params.font_size);

    let nodes = node
        .nodes
        .iter()
        .map(|child| size_tree(measure, child, params))
        .collect::<Vec<_>>();

    let (tree_width, tree_height) = if nodes.is_empty() {
        (block.width, block.height)
    } else {
        let widest_child = nodes.iter().map(|child| child.tree_width).fold(0.0_f32, f32::max);
        (
            block.width + HORIZONTAL_GAP + widest_child,
            block.height.max(children_span(&nodes)),
        )
    };

    SizedNode {
        id: node.id,
        lines,
        width: block.width,
        height: block.height,
        tree_width,
        tree_height,
        collapsed: node.collapsed,
        hidden_descendants: node.hidden_descendants,
        nodes,
    }
}
