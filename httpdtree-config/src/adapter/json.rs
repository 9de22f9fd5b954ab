//! JSON output adapter

use crate::node::{ConfigNode, ConfigTree};
use httpdtree_core::error::{Error, Result};

/// Renders configuration trees as JSON for inspection tooling
pub struct JsonAdapter;

impl JsonAdapter {
    /// Serialize a whole tree to pretty JSON
    pub fn serialize(tree: &ConfigTree) -> Result<String> {
        serde_json::to_string_pretty(tree)
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Serialize a single subtree
    pub fn serialize_node(node: ConfigNode<'_>) -> Result<String> {
        serde_json::to_string_pretty(&node)
            .map_err(|e| Error::Config(e.to_string()))
    }
}
