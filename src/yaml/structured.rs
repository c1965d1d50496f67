//! StructuredNode - a path-addressable view over one resource document.

use super::error::NodeError;
use super::meta::{
    string_map, ResourceMeta, ANNOTATIONS_FIELD, API_VERSION_FIELD, KIND_FIELD, LABELS_FIELD,
    METADATA_FIELD, NAMESPACE_FIELD, NAME_FIELD,
};
use super::path::Path;
use super::tree::{Mapping, Node};
use crate::resid::Gvk;
use crate::selector::LabelSelector;
use crate::value::{Map, Value};
use std::collections::BTreeMap;

pub const DATA_FIELD: &str = "data";

/// StructuredNode wraps a document tree and gives typed access to its
/// fields and conventional metadata.
///
/// Every accessor returns a `Result`; a document with a corrupt metadata
/// section surfaces as [`NodeError::InvalidMetadata`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredNode {
    node: Node,
}

impl StructuredNode {
    /// Creates a node holding an empty mapping.
    pub fn new() -> Self {
        StructuredNode {
            node: Node::new_mapping(),
        }
    }

    pub fn from_node(node: Node) -> Self {
        StructuredNode { node }
    }

    pub fn from_map(map: &Map) -> Self {
        StructuredNode {
            node: Node::from_value(&Value::Map(map.clone())),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, NodeError> {
        Ok(StructuredNode {
            node: Node::from_yaml(yaml)?,
        })
    }

    pub fn from_json(json: &[u8]) -> Result<Self, NodeError> {
        Ok(StructuredNode {
            node: serde_json::from_slice(json)?,
        })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    /// Returns an independent deep copy.
    pub fn copy(&self) -> StructuredNode {
        self.clone()
    }

    /// Reads the value at a dotted path such as `spec.containers[0].image`.
    ///
    /// Mappings decode to [`Value::Map`], sequences to [`Value::List`] and
    /// scalars to their literal text as written (a bare `key:` reads as
    /// `""`). An absent path is [`NodeError::NoField`].
    pub fn get_field_value(&self, path: &str) -> Result<Value, NodeError> {
        let found = self
            .node
            .lookup(&Path::parse(path))?
            .ok_or_else(|| NodeError::no_field(path))?;
        Ok(match found.content() {
            node @ (Node::Mapping(_) | Node::Sequence(_)) => node.to_value(),
            Node::Scalar(s) => Value::String(s.literal()),
            Node::Document(_) | Node::Alias(_) => Value::Null,
        })
    }

    pub fn get_slice(&self, path: &str) -> Result<Vec<Value>, NodeError> {
        match self.get_field_value(path)? {
            Value::List(items) => Ok(items),
            other => Err(NodeError::type_mismatch(path, "list", other.type_name())),
        }
    }

    pub fn get_string(&self, path: &str) -> Result<String, NodeError> {
        match self.get_field_value(path)? {
            Value::String(s) => Ok(s),
            other => Err(NodeError::type_mismatch(path, "string", other.type_name())),
        }
    }

    pub fn get_meta(&self) -> Result<ResourceMeta, NodeError> {
        ResourceMeta::from_node(&self.node)
    }

    pub fn get_kind(&self) -> Result<String, NodeError> {
        Ok(self.get_meta()?.kind)
    }

    pub fn get_gvk(&self) -> Result<Gvk, NodeError> {
        Ok(self.get_meta()?.gvk())
    }

    pub fn get_name(&self) -> Result<String, NodeError> {
        Ok(self.get_meta()?.name)
    }

    pub fn get_namespace(&self) -> Result<String, NodeError> {
        Ok(self.get_meta()?.namespace)
    }

    pub fn get_labels(&self) -> Result<BTreeMap<String, String>, NodeError> {
        Ok(self.get_meta()?.labels)
    }

    pub fn get_annotations(&self) -> Result<BTreeMap<String, String>, NodeError> {
        Ok(self.get_meta()?.annotations)
    }

    /// Replaces `metadata.labels`. An empty map removes the field.
    pub fn set_labels(&mut self, labels: &BTreeMap<String, String>) -> Result<(), NodeError> {
        self.set_string_map(&[METADATA_FIELD, LABELS_FIELD], labels)
    }

    /// Replaces `metadata.annotations`. An empty map removes the field.
    pub fn set_annotations(
        &mut self,
        annotations: &BTreeMap<String, String>,
    ) -> Result<(), NodeError> {
        self.set_string_map(&[METADATA_FIELD, ANNOTATIONS_FIELD], annotations)
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), NodeError> {
        self.set_map_field(&[METADATA_FIELD, NAME_FIELD], Node::string(name))
    }

    /// Sets `metadata.namespace`; the empty string removes it.
    pub fn set_namespace(&mut self, namespace: &str) -> Result<(), NodeError> {
        if namespace.is_empty() {
            return self.clear_map_field(&[METADATA_FIELD, NAMESPACE_FIELD]);
        }
        self.set_map_field(&[METADATA_FIELD, NAMESPACE_FIELD], Node::string(namespace))
    }

    pub fn set_gvk(&mut self, gvk: &Gvk) -> Result<(), NodeError> {
        self.set_map_field(&[KIND_FIELD], Node::string(gvk.kind.clone()))?;
        self.set_map_field(&[API_VERSION_FIELD], Node::string(gvk.api_version()))
    }

    /// Reads the top-level `data` map. An absent field reads as empty.
    pub fn get_data_map(&self) -> Result<BTreeMap<String, String>, NodeError> {
        let data = self.node.as_mapping().and_then(|m| m.get(DATA_FIELD));
        string_map(data, DATA_FIELD)
    }

    /// Replaces the top-level `data` map. An empty map removes the field.
    pub fn set_data_map(&mut self, data: &BTreeMap<String, String>) -> Result<(), NodeError> {
        self.set_string_map(&[DATA_FIELD], data)
    }

    pub fn matches_label_selector(&self, selector: &str) -> Result<bool, NodeError> {
        let selector = LabelSelector::parse(selector)?;
        self.matches_labels(&selector)
    }

    pub fn matches_annotation_selector(&self, selector: &str) -> Result<bool, NodeError> {
        let selector = LabelSelector::parse(selector)?;
        self.matches_annotations(&selector)
    }

    pub fn matches_labels(&self, selector: &LabelSelector) -> Result<bool, NodeError> {
        Ok(selector.matches(&self.get_labels()?))
    }

    pub fn matches_annotations(&self, selector: &LabelSelector) -> Result<bool, NodeError> {
        Ok(selector.matches(&self.get_annotations()?))
    }

    /// Decodes the whole document into a generic map. Non-mapping documents
    /// yield an empty map.
    pub fn map(&self) -> Map {
        match self.node.to_value() {
            Value::Map(m) => m,
            _ => Map::new(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, NodeError> {
        Ok(serde_json::to_vec(&self.node)?)
    }

    pub fn to_yaml(&self) -> Result<String, NodeError> {
        self.node.to_yaml()
    }

    /// True for null or an empty mapping or sequence.
    pub fn is_nil_or_empty(&self) -> bool {
        match self.node.content() {
            Node::Scalar(s) => s.is_null(),
            Node::Mapping(m) => m.is_empty(),
            Node::Sequence(items) => items.is_empty(),
            _ => false,
        }
    }

    fn set_string_map(
        &mut self,
        path: &[&str],
        values: &BTreeMap<String, String>,
    ) -> Result<(), NodeError> {
        if values.is_empty() {
            return self.clear_map_field(path);
        }
        let mapping: Mapping = values
            .iter()
            .map(|(k, v)| (k.clone(), Node::string(v.clone())))
            .collect();
        self.set_map_field(path, Node::Mapping(mapping))
    }

    /// Writes `value` at `path`, creating intermediate mappings. A null on
    /// the way becomes a mapping; any other non-mapping is an error.
    fn set_map_field(&mut self, path: &[&str], value: Node) -> Result<(), NodeError> {
        let Some((last, parents)) = path.split_last() else {
            self.node = value;
            return Ok(());
        };
        let mut current = self.node.content_mut();
        for (depth, field) in parents.iter().enumerate() {
            current = ensure_mapping(current, &path[..depth])?
                .get_or_insert_null(field)
                .content_mut();
        }
        ensure_mapping(current, parents)?.set(*last, value);
        Ok(())
    }

    fn clear_map_field(&mut self, path: &[&str]) -> Result<(), NodeError> {
        let Some((last, parents)) = path.split_last() else {
            return Ok(());
        };
        let mut current = self.node.content_mut();
        for (depth, field) in parents.iter().enumerate() {
            if current.is_null() {
                return Ok(());
            }
            let mapping = ensure_mapping(current, &path[..depth])?;
            match mapping.get_mut(field) {
                Some(next) => current = next.content_mut(),
                None => return Ok(()),
            }
        }
        if current.is_null() {
            return Ok(());
        }
        ensure_mapping(current, parents)?.remove(last);
        Ok(())
    }
}

fn ensure_mapping<'a>(node: &'a mut Node, path: &[&str]) -> Result<&'a mut Mapping, NodeError> {
    if node.is_null() {
        *node = Node::new_mapping();
    }
    let kind = node.kind();
    match node {
        Node::Mapping(m) => Ok(m),
        _ => Err(NodeError::SetField {
            path: path.join("."),
            message: format!("expected mapping, got {}", kind),
        }),
    }
}

impl From<Node> for StructuredNode {
    fn from(node: Node) -> Self {
        StructuredNode::from_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POD: &str = r#"apiVersion: v1
kind: Pod
metadata:
  name: web
  labels:
    app: web
    tier: frontend
spec:
  containers:
  - name: app
    image: nginx
    ports:
    - containerPort: 80
"#;

    fn pod() -> StructuredNode {
        StructuredNode::from_yaml(POD).unwrap()
    }

    #[test]
    fn test_get_field_value_indexed_path() {
        let n = pod();
        assert_eq!(
            n.get_field_value("spec.containers[0].image").unwrap(),
            Value::from("nginx")
        );
        assert_eq!(
            n.get_string("spec.containers[0].ports[0].containerPort").unwrap(),
            "80"
        );
    }

    #[test]
    fn test_get_string_returns_scalar_as_written() {
        let n = StructuredNode::from_yaml(
            "kind: Config\nspec:\n  version: 1.10\n  mode: 0o644\n  empty:\n  unset: null\n",
        )
        .unwrap();
        assert_eq!(n.get_string("spec.version").unwrap(), "1.10");
        assert_eq!(n.get_string("spec.mode").unwrap(), "0o644");
        assert_eq!(n.get_string("spec.empty").unwrap(), "");
        assert_eq!(n.get_field_value("spec.unset").unwrap(), Value::from("null"));
    }

    #[test]
    fn test_indexed_path_matches_manual_walk() {
        let n = pod();
        let manual = n
            .node()
            .as_mapping()
            .and_then(|m| m.get("spec"))
            .and_then(|s| s.as_mapping())
            .and_then(|m| m.get("containers"))
            .and_then(|c| c.as_sequence())
            .and_then(|items| items.first())
            .and_then(|c| c.as_mapping())
            .and_then(|m| m.get("image"))
            .unwrap();
        let walked = n
            .node()
            .lookup(&Path::parse("spec.containers[0].image"))
            .unwrap()
            .unwrap();
        assert_eq!(walked, manual);
    }

    #[test]
    fn test_get_field_value_decodes_mappings_and_sequences() {
        let n = pod();
        assert!(n.get_field_value("metadata.labels").unwrap().is_map());
        assert_eq!(n.get_slice("spec.containers").unwrap().len(), 1);
    }

    #[test]
    fn test_absent_field_is_no_field() {
        let err = pod().get_field_value("spec.volumes").unwrap_err();
        assert!(err.is_no_field());
        assert_eq!(err.to_string(), "no field named 'spec.volumes'");
    }

    #[test]
    fn test_through_scalar_is_type_mismatch() {
        let err = pod().get_field_value("metadata.name.first").unwrap_err();
        assert!(!err.is_no_field());
        assert!(matches!(err, NodeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_typed_getters_reject_wrong_shape() {
        let n = pod();
        assert!(matches!(
            n.get_slice("metadata.name"),
            Err(NodeError::TypeMismatch { .. })
        ));
        assert!(matches!(
            n.get_string("spec.containers"),
            Err(NodeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_metadata_getters() {
        let n = pod();
        assert_eq!(n.get_kind().unwrap(), "Pod");
        assert_eq!(n.get_gvk().unwrap(), Gvk::new("", "v1", "Pod"));
        assert_eq!(n.get_name().unwrap(), "web");
        assert_eq!(n.get_namespace().unwrap(), "");
        assert_eq!(n.get_labels().unwrap().len(), 2);
        assert!(n.get_annotations().unwrap().is_empty());
    }

    #[test]
    fn test_metadata_getters_report_corruption() {
        let n = StructuredNode::from_yaml("kind: Pod\nmetadata: 3\n").unwrap();
        assert!(matches!(n.get_name(), Err(NodeError::InvalidMetadata { .. })));
    }

    #[test]
    fn test_setters() {
        let mut n = pod();
        n.set_name("api").unwrap();
        n.set_namespace("prod").unwrap();
        n.set_gvk(&Gvk::new("apps", "v1", "Deployment")).unwrap();
        let mut annotations = BTreeMap::new();
        annotations.insert("owner".to_string(), "team-a".to_string());
        n.set_annotations(&annotations).unwrap();

        let meta = n.get_meta().unwrap();
        assert_eq!(meta.name, "api");
        assert_eq!(meta.namespace, "prod");
        assert_eq!(meta.api_version, "apps/v1");
        assert_eq!(meta.kind, "Deployment");
        assert_eq!(meta.annotations, annotations);

        n.set_namespace("").unwrap();
        n.set_labels(&BTreeMap::new()).unwrap();
        assert!(n.get_field_value("metadata.namespace").unwrap_err().is_no_field());
        assert!(n.get_field_value("metadata.labels").unwrap_err().is_no_field());
    }

    #[test]
    fn test_setters_on_empty_node() {
        let mut n = StructuredNode::new();
        n.set_name("fresh").unwrap();
        assert_eq!(n.get_string("metadata.name").unwrap(), "fresh");
    }

    #[test]
    fn test_setter_rejects_incompatible_shape() {
        let mut n = StructuredNode::from_yaml("kind: Pod\nmetadata: [a]\n").unwrap();
        assert!(matches!(n.set_name("x"), Err(NodeError::SetField { .. })));
    }

    #[test]
    fn test_data_map() {
        let mut n = StructuredNode::from_yaml("kind: ConfigMap\nmetadata:\n  name: cm\n").unwrap();
        assert!(n.get_data_map().unwrap().is_empty());
        let mut data = BTreeMap::new();
        data.insert("a".to_string(), "1".to_string());
        n.set_data_map(&data).unwrap();
        assert_eq!(n.get_data_map().unwrap(), data);
        n.set_data_map(&BTreeMap::new()).unwrap();
        assert!(n.get_field_value("data").unwrap_err().is_no_field());
    }

    #[test]
    fn test_selector_matching() {
        let n = pod();
        assert!(n.matches_label_selector("app=web,tier in (frontend,backend)").unwrap());
        assert!(!n.matches_label_selector("app!=web").unwrap());
        assert!(n.matches_annotation_selector("").unwrap());
        assert!(n.matches_label_selector("app in (").is_err());
    }

    #[test]
    fn test_copy_is_independent() {
        let original = pod();
        let mut copy = original.copy();
        copy.set_name("other").unwrap();
        assert_eq!(original.get_name().unwrap(), "web");
        assert_eq!(copy.get_name().unwrap(), "other");
    }

    #[test]
    fn test_json_roundtrip() {
        let n = pod();
        let json = n.to_json().unwrap();
        let back = StructuredNode::from_json(&json).unwrap();
        assert_eq!(back, n);
        assert_eq!(back.map().get("kind"), Some(&Value::from("Pod")));
    }
}
