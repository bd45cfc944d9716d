//! View state layered over the immutable canonical tree.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::NodeId;

mod transform;
mod viewport;

pub use hit_test::{hit_test, hit_test_node};
pub use transform::{QueryMatcher, SearchMode, SearchQuery, VisibleNode, collapse_tree, search_prune, visible_tree};
pub use viewport::{
    ModifierKey, ModifierKeys, PointerPhase, ViewportConfig, ViewportController, ViewportEvent,
    ViewportResponse, ViewportState,
};

/// Collapsed node ids. Keyed by id, never by tree position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedSet(BTreeSet<NodeId>);

impl CollapsedSet {
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    /// Flips one id and returns whether it is now collapsed.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    /// Returns whether the set changed.
    pub fn set(&mut self, id: NodeId, collapsed: bool) -> bool {
        if collapsed {
            self.0.insert(id)
        } else {
            self.0.remove(&id)
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<NodeId> for CollapsedSet {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the user can change about how the tree is shown.
///
/// All writes go through the methods below. Changes that alter the visible
/// tree's shape bump `structure_revision`; pan and zoom do not.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ViewState {
    viewport: ViewportController,
    collapsed: CollapsedSet,
    search: SearchQuery,
    #[serde(skip)]
    structure_revision: u64,
}

impl ViewState {
    pub fn new(config: ViewportConfig, search: SearchQuery) -> Self {
        Self {
            viewport: ViewportController::new(config),
            search,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn collapsed(&self) -> &CollapsedSet {
        &self.collapsed
    }

    pub fn search(&self) -> &SearchQuery {
        &self.search
    }

    pub fn structure_revision(&self) -> u64 {
        self.structure_revision
    }

    pub fn handle_input(&mut self, event: ViewportEvent) -> ViewportResponse {
        self.viewport.handle(event)
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.viewport.set_pixel_ratio(pixel_ratio);
    }

    pub fn reset_viewport(&mut self) {
        self.viewport.reset();
    }

    /// Returns whether the node is now collapsed.
    pub fn toggle_collapsed(&mut self, id: NodeId) -> bool {
        let collapsed = self.collapsed.toggle(id);
        self.bump();
        debug!(node = %id, collapsed, "toggled collapse");
        collapsed
    }

    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) {
        if self.collapsed.set(id, collapsed) {
            self.bump();
        }
    }

    pub fn collapse_all(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let next = ids.into_iter().collect::<CollapsedSet>();
        if next != self.collapsed {
            self.collapsed = next;
            self.bump();
        }
    }

    pub fn expand_all(&mut self) {
        if !self.collapsed.is_empty() {
            self.collapsed = CollapsedSet::default();
            self.bump();
        }
    }

    pub fn set_search_text(&mut self, text: &str) {
        if self.search.text != text {
            self.search.text = text.to_owned();
            self.bump();
        }
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        if self.search.mode != mode {
            self.search.mode = mode;
            self.bump();
        }
    }

    fn bump(&mut self) {
        self.structure_revision = self.structure_revision.wrapping_add(1);
    }
}

pub(crate) mod vec2_serde {
    use eframe::egui::{Vec2, vec2};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Vec2, serializer: S) -> Result<S::Ok, S::Error> {
        [value.x, value.y].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec2, D::Error> {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(vec2(x, y))
    }
}
