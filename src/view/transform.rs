use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, TreeNode};

use super::{CollapsedSet, ViewState};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Case-insensitive substring.
    #[default]
    Substring,
    Fuzzy,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub mode: SearchMode,
}

impl SearchQuery {
    pub fn substring(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            mode: SearchMode::Substring,
        }
    }

    /// Whitespace-only queries count as empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub struct QueryMatcher {
    needle: String,
    fuzzy: Option<SkimMatcherV2>,
}

impl QueryMatcher {
    pub fn new(query: &SearchQuery) -> Self {
        let needle = query.text.trim();
        match query.mode {
            SearchMode::Substring => Self {
                needle: needle.to_lowercase(),
                fuzzy: None,
            },
            SearchMode::Fuzzy => Self {
                needle: needle.to_owned(),
                fuzzy: Some(SkimMatcherV2::default()),
            },
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.fuzzy {
            None => text.to_lowercase().contains(&self.needle),
            Some(matcher) => matcher
                .fuzzy_match(text, &self.needle)
                .or_else(|| {
                    matcher.fuzzy_match(&text.to_ascii_lowercase(), &self.needle.to_ascii_lowercase())
                })
                .is_some(),
        }
    }
}

/// Keeps nodes whose text matches or that lead to a match. Returns `None`
/// when nothing in the tree matches. An empty query returns the tree as is.
pub fn search_prune(tree: &TreeNode, query: &SearchQuery) -> Option<TreeNode> {
    if query.is_empty() {
        return Some(tree.clone());
    }
    prune_node(tree, &QueryMatcher::new(query))
}

fn prune_node(node: &TreeNode, matcher: &QueryMatcher) -> Option<TreeNode> {
    let nodes = node
        .nodes
        .iter()
        .filter_map(|child| prune_node(child, matcher))
        .collect::<Vec<_>>();

    if nodes.is_empty() && !matcher.matches(&node.text) {
        return None;
    }

    Some(TreeNode {
        id: node.id,
        text: node.text.clone(),
        meta: node.meta.clone(),
        nodes,
    })
}

/// Tree handed to layout. Collapsed nodes keep their own block, drop their
/// children and remember how many descendants they hide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleNode {
    pub id: NodeId,
    pub text: String,
    pub collapsed: bool,
    pub hidden_descendants: usize,
    pub nodes: Vec<VisibleNode>,
}

pub fn collapse_tree(tree: &TreeNode, collapsed: &CollapsedSet) -> VisibleNode {
    if collapsed.contains(tree.id) {
        return VisibleNode {
            id: tree.id,
            text: tree.text.clone(),
            collapsed: true,
            hidden_descendants: tree.descendant_count(),
            nodes: Vec::new(),
        };
    }

    VisibleNode {
        id: tree.id,
        text: tree.text.clone(),
        collapsed: false,
        hidden_descendants: 0,
        nodes: tree
            .nodes
            .iter()
            .map(|child| collapse_tree(child, collapsed))
            .collect(),
    }
}

/// Search first, then collapse, so a collapsed node's badge counts the
/// descendants that survived the search.
pub fn visible_tree(tree: &TreeNode, view: &ViewState) -> Option<VisibleNode> {
    if view.search().is_empty() {
        return Some(collapse_tree(tree, view.collapsed()));
    }
    search_prune(tree, view.search()).map(|pruned| collapse_tree(&pruned, view.collapsed()))
}
