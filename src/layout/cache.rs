use tracing::debug;

use crate::tree::TreeNode;
use crate::view::{ViewState, visible_tree};

use super::{LayoutNode, LayoutParams, TextMeasure, layout_tree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LayoutKey {
    tree_revision: u64,
    view_revision: u64,
    max_width_bits: u32,
    font_size_bits: u32,
}

impl LayoutKey {
    fn new(tree_revision: u64, view: &ViewState, params: LayoutParams) -> Self {
        Self {
            tree_revision,
            view_revision: view.structure_revision(),
            max_width_bits: params.max_width.to_bits(),
            font_size_bits: params.font_size.to_bits(),
        }
    }
}

/// Last positioned visible tree.
///
/// Rebuilt only when the tree, the collapse set, the search query or the font
/// metrics change. Pan and zoom never touch it.
#[derive(Debug, Default)]
pub struct LayoutCache {
    key: Option<LayoutKey>,
    layout: Option<LayoutNode>,
    rebuilds: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the layout for the current inputs, rebuilding it if needed.
    /// Without a measurer a stale layout is withheld and the rebuild is
    /// retried on the next call.
    pub fn ensure(
        &mut self,
        measure: Option<&dyn TextMeasure>,
        tree: &TreeNode,
        tree_revision: u64,
        view: &ViewState,
        params: LayoutParams,
    ) -> Option<&LayoutNode> {
        let key = LayoutKey::new(tree_revision, view, params);
        if self.key != Some(key) {
            let Some(measure) = measure else {
                debug!("layout skipped, no text measurer attached");
                return None;
            };

            self.layout = visible_tree(tree, view).map(|visible| layout_tree(measure, &visible, params));
            self.key = Some(key);
            self.rebuilds += 1;
            debug!(
                nodes = self.layout.as_ref().map_or(0, LayoutNode::node_count),
                tree_revision,
                view_revision = key.view_revision,
                "relayout"
            );
        }

        self.layout.as_ref()
    }

    /// Layout from the last successful rebuild, used for hit-testing.
    pub fn current(&self) -> Option<&LayoutNode> {
        self.layout.as_ref()
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
