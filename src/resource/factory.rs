//! ResourceFactory - builds resources from documents and YAML streams.

use super::resource::Resource;
use crate::value::Map;
use crate::yaml::{Node, NodeError, StructuredNode};

const LIST_KIND: &str = "List";
const ITEMS_FIELD: &str = "items";

/// ResourceFactory makes [`Resource`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceFactory;

impl ResourceFactory {
    pub fn new() -> Self {
        ResourceFactory
    }

    pub fn from_node(&self, node: Node) -> Result<Resource, NodeError> {
        Resource::new(StructuredNode::from_node(node))
    }

    pub fn from_map(&self, map: &Map) -> Result<Resource, NodeError> {
        Resource::new(StructuredNode::from_map(map))
    }

    /// Parses a YAML stream into resources.
    ///
    /// Documents are separated by `---`; empty documents are skipped and a
    /// document of kind `List` contributes its `items`.
    pub fn slice_from_bytes(&self, bytes: &[u8]) -> Result<Vec<Resource>, NodeError> {
        self.slice_from_nodes(Node::from_yaml_stream(bytes)?)
    }

    pub fn slice_from_nodes(&self, nodes: Vec<Node>) -> Result<Vec<Resource>, NodeError> {
        let mut expanded = Vec::new();
        for node in nodes {
            expand_list(node, &mut expanded)?;
        }
        expanded.into_iter().map(|n| self.from_node(n)).collect()
    }
}

fn is_list(node: &Node) -> bool {
    node.as_mapping()
        .and_then(|m| m.get("kind"))
        .and_then(Node::as_scalar)
        .is_some_and(|kind| kind.text() == LIST_KIND)
}

fn expand_list(node: Node, out: &mut Vec<Node>) -> Result<(), NodeError> {
    if node.is_null() {
        return Ok(());
    }
    if !is_list(&node) {
        out.push(node);
        return Ok(());
    }
    let items = node.as_mapping().and_then(|m| m.get(ITEMS_FIELD));
    match items.map(Node::content) {
        None => Ok(()),
        Some(n) if n.is_null() => Ok(()),
        Some(Node::Sequence(items)) => {
            for item in items {
                expand_list(item.clone(), out)?;
            }
            Ok(())
        }
        Some(other) => Err(NodeError::type_mismatch(
            ITEMS_FIELD,
            "sequence",
            other.kind().to_string(),
        )),
    }
}
