//! Property tests for sizing, placement and the derived-tree transforms over
//! randomly shaped trees.

use mindmap_view::layout::{HORIZONTAL_GAP, LayoutNode, LayoutParams, VERTICAL_GAP, layout_tree};
use mindmap_view::test_support::FixedWidthMeasure;
use mindmap_view::tree::{TreeBuilder, TreeNode};
use mindmap_view::view::{CollapsedSet, SearchQuery, ViewState, collapse_tree, search_prune, visible_tree};
use proptest::prelude::*;

const EPSILON: f32 = 1e-2;

#[derive(Clone, Debug)]
struct Shape {
    text: String,
    children: Vec<Shape>,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = "[a-z]{1,8}( [a-z]{1,8}){0,5}".prop_map(|text| Shape {
        text,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 40, 4, |inner| {
        ("[a-z]{1,8}( [a-z]{1,8}){0,5}", prop::collection::vec(inner, 0..4))
            .prop_map(|(text, children)| Shape { text, children })
    })
}

fn build(builder: &mut TreeBuilder, shape: &Shape) -> TreeNode {
    builder.node(&shape.text, |builder| {
        shape
            .children
            .iter()
            .map(|child| build(builder, child))
            .collect()
    })
}

fn tree_from(shape: &Shape) -> TreeNode {
    build(&mut TreeBuilder::new(), shape)
}

fn params() -> LayoutParams {
    LayoutParams {
        max_width: 120.0,
        font_size: 16.0,
    }
}

fn layout_with(tree: &TreeNode, collapsed: &CollapsedSet) -> LayoutNode {
    layout_tree(&FixedWidthMeasure::new(9.0), &collapse_tree(tree, collapsed), params())
}

fn for_each_node(node: &LayoutNode, visit: &mut impl FnMut(&LayoutNode)) {
    visit(node);
    for child in &node.nodes {
        for_each_node(child, visit);
    }
}

proptest! {
    #[test]
    fn tree_size_contains_own_block(shape in shape_strategy()) {
        let layout = layout_with(&tree_from(&shape), &CollapsedSet::default());
        let mut violations = Vec::new();
        for_each_node(&layout, &mut |node| {
            if node.tree_width < node.width || node.tree_height < node.height {
                violations.push(node.id);
            }
        });
        prop_assert!(violations.is_empty(), "undersized subtrees: {:?}", violations);
    }
}

proptest! {
    #[test]
    fn child_bands_are_contiguous_and_centered(shape in shape_strategy()) {
        let layout = layout_with(&tree_from(&shape), &CollapsedSet::default());
        let mut failures = Vec::new();

        for_each_node(&layout, &mut |parent| {
            let tree_rect = parent.tree_rect();
            if (tree_rect.center().y - parent.mid_y()).abs() > EPSILON {
                failures.push(format!("{} is off its subtree midpoint", parent.id));
            }

            let mut previous_bottom: Option<f32> = None;
            for child in &parent.nodes {
                if (child.x - (parent.x + parent.width + HORIZONTAL_GAP)).abs() > EPSILON {
                    failures.push(format!("{} is not in its parent's column", child.id));
                }

                let band = child.tree_rect();
                if child.mid_y() < band.top() - EPSILON || child.mid_y() > band.bottom() + EPSILON {
                    failures.push(format!("{} midpoint escapes its band", child.id));
                }
                if let Some(bottom) = previous_bottom
                    && (band.top() - bottom - VERTICAL_GAP).abs() > EPSILON
                {
                    failures.push(format!("{} band is not contiguous", child.id));
                }
                previous_bottom = Some(band.bottom());
            }

            if let (Some(first), Some(last)) = (parent.nodes.first(), parent.nodes.last()) {
                let span_mid = (first.tree_rect().top() + last.tree_rect().bottom()) / 2.0;
                if (span_mid - parent.mid_y()).abs() > EPSILON {
                    failures.push(format!("{} children are not centered on it", parent.id));
                }
            }
        });

        prop_assert!(failures.is_empty(), "{:?}", failures);
    }
}

proptest! {
    #[test]
    fn collapse_then_expand_restores_layout(shape in shape_strategy(), pick in any::<prop::sample::Index>()) {
        let tree = tree_from(&shape);
        let baseline = layout_with(&tree, &CollapsedSet::default());

        let mut ids = Vec::new();
        for_each_node(&baseline, &mut |node| ids.push(node.id));
        let id = ids[pick.index(ids.len())];

        let mut view = ViewState::default();
        view.toggle_collapsed(id);
        let collapsed = layout_with(&tree, view.collapsed());
        prop_assert!(collapsed.node_count() <= baseline.node_count());

        view.toggle_collapsed(id);
        prop_assert!(view.collapsed().is_empty());
        prop_assert_eq!(layout_with(&tree, view.collapsed()), baseline);
    }
}

proptest! {
    #[test]
    fn collapsed_node_keeps_block_and_counts_descendants(shape in shape_strategy(), pick in any::<prop::sample::Index>()) {
        let tree = tree_from(&shape);
        let baseline = layout_with(&tree, &CollapsedSet::default());
        let mut nodes = Vec::new();
        for_each_node(&baseline, &mut |node| nodes.push((node.id, node.width, node.height, node.node_count() - 1)));
        let (id, width, height, descendants) = nodes[pick.index(nodes.len())];

        let collapsed_set = [id].into_iter().collect::<CollapsedSet>();
        let collapsed = layout_with(&tree, &collapsed_set);
        let mut found = None;
        for_each_node(&collapsed, &mut |node| {
            if node.id == id {
                found = Some(node.clone());
            }
        });

        let node = found.expect("collapsed node stays visible");
        prop_assert_eq!(node.width, width);
        prop_assert_eq!(node.height, height);
        prop_assert_eq!(node.tree_width, node.width);
        prop_assert_eq!(node.tree_height, node.height);
        prop_assert!(node.nodes.is_empty());
        prop_assert!(node.collapsed);
        prop_assert_eq!(node.hidden_descendants, descendants);
    }
}

proptest! {
    #[test]
    fn empty_query_is_identity(shape in shape_strategy()) {
        let tree = tree_from(&shape);
        prop_assert_eq!(search_prune(&tree, &SearchQuery::default()), Some(tree));
    }
}

proptest! {
    #[test]
    fn pruning_twice_equals_pruning_once(shape in shape_strategy(), needle in "[a-z]{1,2}") {
        let tree = tree_from(&shape);
        let query = SearchQuery::substring(&needle);

        match search_prune(&tree, &query) {
            Some(once) => {
                let twice = search_prune(&once, &query);
                prop_assert_eq!(twice, Some(once));
            }
            None => {
                let mut view = ViewState::default();
                view.set_search_text(&needle);
                prop_assert!(visible_tree(&tree, &view).is_none());
            }
        }
    }
}

proptest! {
    #[test]
    fn pruned_nodes_keep_their_ids(shape in shape_strategy(), needle in "[a-z]{1,2}") {
        let tree = tree_from(&shape);
        if let Some(pruned) = search_prune(&tree, &SearchQuery::substring(&needle)) {
            let mut stack = vec![&pruned];
            while let Some(node) = stack.pop() {
                let original = tree.find(node.id).expect("id exists in the canonical tree");
                prop_assert_eq!(&original.text, &node.text);
                stack.extend(node.nodes.iter());
            }
        }
    }
}
