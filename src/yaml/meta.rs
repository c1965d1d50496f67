//! Conventional resource metadata.

use super::error::NodeError;
use super::tree::{Mapping, Node};
use crate::resid::Gvk;
use std::collections::BTreeMap;

pub const API_VERSION_FIELD: &str = "apiVersion";
pub const KIND_FIELD: &str = "kind";
pub const METADATA_FIELD: &str = "metadata";
pub const NAME_FIELD: &str = "name";
pub const NAMESPACE_FIELD: &str = "namespace";
pub const LABELS_FIELD: &str = "labels";
pub const ANNOTATIONS_FIELD: &str = "annotations";

/// ResourceMeta holds the identifying parts of a resource document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMeta {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl ResourceMeta {
    /// Extracts metadata from the content of a document node.
    pub fn from_node(node: &Node) -> Result<ResourceMeta, NodeError> {
        let root = match node.content() {
            Node::Mapping(m) => m,
            other => {
                return Err(NodeError::invalid_metadata(format!(
                    "document is a {}, not a mapping",
                    other.kind()
                )))
            }
        };
        if !root.contains_key(API_VERSION_FIELD)
            && !root.contains_key(KIND_FIELD)
            && !root.contains_key(METADATA_FIELD)
        {
            return Err(NodeError::MissingMetadata);
        }

        let mut meta = ResourceMeta {
            api_version: scalar_field(root, API_VERSION_FIELD)?,
            kind: scalar_field(root, KIND_FIELD)?,
            ..Default::default()
        };
        let metadata = match root.get(METADATA_FIELD).map(Node::content) {
            None => return Ok(meta),
            Some(n) if n.is_null() => return Ok(meta),
            Some(Node::Mapping(m)) => m,
            Some(other) => {
                return Err(NodeError::invalid_metadata(format!(
                    "metadata is a {}, not a mapping",
                    other.kind()
                )))
            }
        };
        meta.name = scalar_field(metadata, NAME_FIELD)?;
        meta.namespace = scalar_field(metadata, NAMESPACE_FIELD)?;
        meta.labels = string_map(metadata.get(LABELS_FIELD), LABELS_FIELD)?;
        meta.annotations = string_map(metadata.get(ANNOTATIONS_FIELD), ANNOTATIONS_FIELD)?;
        Ok(meta)
    }

    pub fn gvk(&self) -> Gvk {
        Gvk::from_api_version(&self.api_version, self.kind.clone())
    }
}

fn scalar_field(mapping: &Mapping, field: &str) -> Result<String, NodeError> {
    match mapping.get(field).map(Node::content) {
        None => Ok(String::new()),
        Some(Node::Scalar(s)) => Ok(s.text()),
        Some(other) => Err(NodeError::invalid_metadata(format!(
            "{} is a {}, not a scalar",
            field,
            other.kind()
        ))),
    }
}

/// Reads a string-to-string map. Absent and null read as empty.
pub(crate) fn string_map(
    node: Option<&Node>,
    field: &str,
) -> Result<BTreeMap<String, String>, NodeError> {
    let node = match node.map(Node::content) {
        None => return Ok(BTreeMap::new()),
        Some(n) if n.is_null() => return Ok(BTreeMap::new()),
        Some(n) => n,
    };
    let mapping = node.as_mapping().ok_or_else(|| {
        NodeError::invalid_metadata(format!("{} is a {}, not a mapping", field, node.kind()))
    })?;
    mapping
        .iter()
        .map(|(k, v)| match v.content() {
            Node::Scalar(s) => Ok((k.clone(), s.text())),
            other => Err(NodeError::invalid_metadata(format!(
                "{}.{} is a {}, not a scalar",
                field,
                k,
                other.kind()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_node() {
        let node = Node::from_yaml(
            r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
  labels:
    app: web
  annotations:
    note: ~
"#,
        )
        .unwrap();
        let meta = ResourceMeta::from_node(&node).unwrap();
        assert_eq!(meta.gvk(), Gvk::new("apps", "v1", "Deployment"));
        assert_eq!(meta.name, "web");
        assert_eq!(meta.namespace, "prod");
        assert_eq!(meta.labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(meta.annotations.get("note").map(String::as_str), Some(""));
    }

    #[test]
    fn test_missing_metadata() {
        let node = Node::from_yaml("data:\n  a: b\n").unwrap();
        assert!(matches!(
            ResourceMeta::from_node(&node),
            Err(NodeError::MissingMetadata)
        ));
    }

    #[test]
    fn test_invalid_metadata() {
        for doc in [
            "- a\n- b\n",
            "kind: Pod\nmetadata: [1, 2]\n",
            "kind: Pod\nmetadata:\n  name: {a: b}\n",
            "kind: Pod\nmetadata:\n  labels: [x]\n",
        ] {
            let node = Node::from_yaml(doc).unwrap();
            assert!(
                matches!(
                    ResourceMeta::from_node(&node),
                    Err(NodeError::InvalidMetadata { .. })
                ),
                "{}",
                doc
            );
        }
    }
}
