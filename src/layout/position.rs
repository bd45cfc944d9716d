use super::{HORIZONTAL_GAP, LayoutNode, SizedNode, VERTICAL_GAP, children_span};

/// Top-down placement. The root sits at `x = 0`, vertically centered in the
/// full tree's bounding box.
pub fn position_tree(root: &SizedNode) -> LayoutNode {
    let y = root.tree_height / 2.0 - root.height / 2.0;
    place(root, 0.0, y)
}

fn place(node: &SizedNode, x: f32, y: f32) -> LayoutNode {
    let child_x = x + node.width + HORIZONTAL_GAP;
    let mid_y = y + node.height / 2.0;
    let mut band_top = mid_y - children_span(&node.nodes) / 2.0;

    let nodes = node
        .nodes
        .iter()
        .map(|child| {
            let child_y = band_top + child.tree_height / 2.0 - child.height / 2.0;
            band_top += child.tree_height + VERTICAL_GAP;
            place(child, child_x, child_y)
        })
        .collect();

    LayoutNode {
        id: node.id,
        lines: node.lines.clone(),
        width: node.width,
        height: node.height,
        tree_width: node.tree_width,
        tree_height: node.tree_height,
        x,
        y,
        collapsed: node.collapsed,
        hidden_descendants: node.hidden_descendants,
        nodes,
    }
}
