use std::fs;
use std::path::Path;

use tracing::info;

use super::{TreeError, TreeNode, parse_tree_str};

pub fn load_tree_file(path: &Path) -> Result<TreeNode, TreeError> {
    let raw = fs::read_to_string(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let tree = parse_tree_str(&raw)?;
    info!(path = %path.display(), nodes = tree.node_count(), "loaded tree");
    Ok(tree)
}
