use serde::Deserialize;
use serde_json::Value;

use super::{NodeMeta, TreeBuilder, TreeError, TreeNode};

const TEST_RECORDS_ROOT_TEXT: &str = "root";

/// One `describe` block as emitted by the test extractor.
#[derive(Clone, Debug, Deserialize)]
struct RawTestRecord {
    describe: String,
    #[serde(default)]
    tests: Vec<String>,
    #[serde(default)]
    nested: Vec<RawTestRecord>,
    #[serde(default)]
    meta: Option<NodeMeta>,
}

/// Parses a tree document of any depth. Every tree level costs two JSON
/// levels, so serde_json's default nesting limit is lifted.
pub fn parse_tree_str(raw: &str) -> Result<TreeNode, TreeError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    deserializer.disable_recursion_limit();
    let parsed = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    parse_tree_value(&parsed)
}

/// Accepts either a `{ text, nodes }` tree or an array of test records.
pub fn parse_tree_value(value: &Value) -> Result<TreeNode, TreeError> {
    let mut builder = TreeBuilder::new();
    match value {
        Value::Object(_) => parse_node(&mut builder, value, "root"),
        Value::Array(records) => parse_test_records(&mut builder, records),
        _ => Err(TreeError::InvalidRoot),
    }
}

fn parse_node(builder: &mut TreeBuilder, value: &Value, path: &str) -> Result<TreeNode, TreeError> {
    let text = value
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| TreeError::MissingText {
            path: path.to_owned(),
        })?
        .to_owned();

    let meta = match value.get("meta") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(NodeMeta::deserialize(raw).map_err(|error| TreeError::InvalidMeta {
            path: path.to_owned(),
            reason: error.to_string(),
        })?),
    };

    let id = builder.next_id();

    let nodes = match value.get("nodes") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(children)) => children
            .iter()
            .enumerate()
            .map(|(index, child)| parse_node(builder, child, &format!("{path}/{index}")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(TreeError::InvalidNodes {
                path: path.to_owned(),
            });
        }
    };

    Ok(TreeNode {
        id,
        text,
        meta,
        nodes,
    })
}

fn parse_test_records(builder: &mut TreeBuilder, records: &[Value]) -> Result<TreeNode, TreeError> {
    let id = builder.next_id();
    let mut nodes = Vec::with_capacity(records.len());
    for (index, raw) in records.iter().enumerate() {
        let path = format!("root/{index}");
        let record = RawTestRecord::deserialize(raw).map_err(|error| TreeError::InvalidRecord {
            path: path.clone(),
            reason: error.to_string(),
        })?;
        nodes.push(record_to_node(builder, record));
    }

    Ok(TreeNode {
        id,
        text: TEST_RECORDS_ROOT_TEXT.to_owned(),
        meta: None,
        nodes,
    })
}

// Tests come first, then nested describes.
fn record_to_node(builder: &mut TreeBuilder, record: RawTestRecord) -> TreeNode {
    let id = builder.next_id();
    let mut nodes = Vec::with_capacity(record.tests.len() + record.nested.len());
    for test in record.tests {
        nodes.push(TreeNode {
            id: builder.next_id(),
            text: test,
            meta: None,
            nodes: Vec::new(),
        });
    }
    for nested in record.nested {
        nodes.push(record_to_node(builder, nested));
    }

    TreeNode {
        id,
        text: record.describe,
        meta: record.meta,
        nodes,
    }
}
