use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod load;
mod parse;

pub use load::load_tree_file;
pub use parse::{parse_tree_str, parse_tree_value};

/// Stable identity of a logical node, assigned once when the canonical tree
/// is built and carried unchanged through every derived tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    #[serde(default, rename = "fileUrl")]
    pub file_url: Option<String>,
}

/// Canonical tree. Never mutated once built; view state derives new trees from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub text: String,
    pub meta: Option<NodeMeta>,
    pub nodes: Vec<TreeNode>,
}

impl TreeNode {
    pub fn node_count(&self) -> usize {
        1 + self.descendant_count()
    }

    pub fn descendant_count(&self) -> usize {
        self.nodes.iter().map(TreeNode::node_count).sum()
    }

    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.nodes.iter().find_map(|child| child.find(id))
    }

    /// Ids of every node that has children, in pre-order.
    pub fn branch_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        collect_branch_ids(self, &mut ids);
        ids
    }
}

fn collect_branch_ids(node: &TreeNode, ids: &mut Vec<NodeId>) {
    if node.nodes.is_empty() {
        return;
    }
    ids.push(node.id);
    for child in &node.nodes {
        collect_branch_ids(child, ids);
    }
}

/// Builder that hands out ids in pre-order, so the same document always
/// yields the same ids.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    next_id: u32,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Convenience for tests and callers that build trees in code.
    pub fn node(&mut self, text: &str, build_children: impl FnOnce(&mut Self) -> Vec<TreeNode>) -> TreeNode {
        let id = self.next_id();
        let nodes = build_children(self);
        TreeNode {
            id,
            text: text.to_owned(),
            meta: None,
            nodes,
        }
    }

    pub fn leaf(&mut self, text: &str) -> TreeNode {
        self.node(text, |_| Vec::new())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("failed to read tree file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tree file is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("node at `{path}` has no string `text` field")]
    MissingText { path: String },
    #[error("node at `{path}` has a `nodes` field that is not an array")]
    InvalidNodes { path: String },
    #[error("node at `{path}` has a malformed `meta` field: {reason}")]
    InvalidMeta { path: String, reason: String },
    #[error("test record at `{path}` is malformed: {reason}")]
    InvalidRecord { path: String, reason: String },
    #[error("tree document must be an object or an array of test records")]
    InvalidRoot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_ids_in_pre_order() {
        let mut builder = TreeBuilder::new();
        let tree = builder.node("root", |b| {
            vec![b.node("a", |b| vec![b.leaf("a1")]), b.leaf("b")]
        });

        assert_eq!(tree.id, NodeId(0));
        assert_eq!(tree.nodes[0].id, NodeId(1));
        assert_eq!(tree.nodes[0].nodes[0].id, NodeId(2));
        assert_eq!(tree.nodes[1].id, NodeId(3));
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.descendant_count(), 3);
    }

    #[test]
    fn find_and_branch_ids_walk_the_whole_tree() {
        let mut builder = TreeBuilder::new();
        let tree = builder.node("root", |b| {
            vec![b.node("a", |b| vec![b.leaf("a1")]), b.leaf("b")]
        });

        assert_eq!(tree.find(NodeId(2)).map(|node| node.text.as_str()), Some("a1"));
        assert!(tree.find(NodeId(9)).is_none());
        assert_eq!(tree.branch_ids(), vec![NodeId(0), NodeId(1)]);
    }
}
