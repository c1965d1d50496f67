//! The generic document tree.
//!
//! Text is turned into a tree with `serde_yaml`; the tree keeps mapping keys
//! in document order so that emitted documents look like their sources.

use super::error::NodeError;
use super::path::{Path, PathElement};
use crate::value::{Map, Value};
use serde::de::{
    self, Deserialize, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Mapping,
    Sequence,
    Scalar,
    Alias,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "document",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Scalar => "scalar",
            NodeKind::Alias => "alias",
        };
        f.write_str(name)
    }
}

/// Node is one node of a document tree. Every node owns its subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Document(Box<Node>),
    Mapping(Mapping),
    Sequence(Vec<Node>),
    Scalar(Scalar),
    Alias(Alias),
}

/// Alias refers to an anchored node.
///
/// The referent is held by value; writing through an alias detaches it
/// from the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub anchor: String,
    pub target: Box<Node>,
}

/// Resolved value of a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Scalar is a leaf: its resolved value plus, for scalars read from text,
/// the source text it was written as (`1.10`, `0o644`, `~`, or nothing at
/// all for a bare `key:`).
///
/// Equality compares resolved values only.
#[derive(Debug, Clone)]
pub struct Scalar {
    value: ScalarValue,
    source: Option<String>,
}

impl Scalar {
    pub fn null() -> Self {
        ScalarValue::Null.into()
    }

    pub fn bool(b: bool) -> Self {
        ScalarValue::Bool(b).into()
    }

    pub fn int(i: i64) -> Self {
        ScalarValue::Int(i).into()
    }

    pub fn float(f: f64) -> Self {
        ScalarValue::Float(f).into()
    }

    pub fn string(s: impl Into<String>) -> Self {
        ScalarValue::String(s.into()).into()
    }

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, ScalarValue::Null)
    }

    /// The scalar as written in its source document, or in canonical form
    /// when it was built in memory.
    pub fn literal(&self) -> String {
        if let Some(source) = &self.source {
            return source.clone();
        }
        match &self.value {
            ScalarValue::Null => "null".to_string(),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::Float(f) if f.is_nan() => ".nan".to_string(),
            ScalarValue::Float(f) if f.is_infinite() => {
                if *f > 0.0 { ".inf" } else { "-.inf" }.to_string()
            }
            ScalarValue::Float(f) if f.fract() == 0.0 => format!("{:.1}", f),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::String(s) => s.clone(),
        }
    }

    /// Like [`Scalar::literal`], but any null reads as the empty string.
    pub fn text(&self) -> String {
        if self.is_null() {
            return String::new();
        }
        self.literal()
    }

    fn to_value(&self) -> Value {
        match &self.value {
            ScalarValue::Null => Value::Null,
            ScalarValue::Bool(b) => Value::Bool(*b),
            ScalarValue::Int(i) => Value::Int(*i),
            ScalarValue::Float(f) => Value::Float(*f),
            ScalarValue::String(s) => Value::String(s.clone()),
        }
    }

    /// A scalar resolved as `resolved` and written as `source`.
    fn with_source(resolved: &serde_yaml::Value, source: String) -> Self {
        let value = match Node::from(resolved.clone()) {
            Node::Scalar(scalar) => scalar.value,
            _ => ScalarValue::String(source.clone()),
        };
        match value {
            ScalarValue::String(s) => Scalar::string(s),
            value => Scalar {
                value,
                source: Some(source),
            },
        }
    }
}

impl From<ScalarValue> for Scalar {
    fn from(value: ScalarValue) -> Self {
        Scalar {
            value,
            source: None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Mapping is an insertion-ordered map of string keys to nodes.
///
/// Equality ignores key order.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Mapping::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets a field, keeping its position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the field, inserting a null node first if it is absent.
    pub fn get_or_insert_null(&mut self, key: &str) -> &mut Node {
        let pos = match self.entries.iter().position(|(k, _)| k == key) {
            Some(pos) => pos,
            None => {
                self.entries.push((key.to_string(), Node::null()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Node) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl FromIterator<(String, Node)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.set(k, v);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::null())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::string(s))
    }

    pub fn new_mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Document(_) => NodeKind::Document,
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Alias(_) => NodeKind::Alias,
        }
    }

    /// Follows aliases to the node they refer to.
    pub fn resolve(&self) -> &Node {
        let mut node = self;
        while let Node::Alias(alias) = node {
            node = &alias.target;
        }
        node
    }

    /// Follows aliases and unwraps documents down to the content node.
    pub fn content(&self) -> &Node {
        match self {
            Node::Document(inner) => inner.content(),
            Node::Alias(alias) => alias.target.content(),
            other => other,
        }
    }

    /// Mutable counterpart of [`Node::content`]; aliases on the way are
    /// replaced by their referent.
    pub fn content_mut(&mut self) -> &mut Node {
        if let Node::Alias(alias) = self {
            let target = std::mem::take(&mut *alias.target);
            *self = target;
            return self.content_mut();
        }
        match self {
            Node::Document(inner) => inner.content_mut(),
            other => other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.content(), Node::Scalar(s) if s.is_null())
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self.content() {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self.content_mut() {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Node>> {
        match self.content() {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self.content() {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Walks a path from this node.
    ///
    /// Returns `Ok(None)` when a component is absent (including when a null
    /// is crossed), and a type mismatch when a component cannot apply to the
    /// node it meets, e.g. a field name on a scalar.
    pub fn lookup(&self, path: &Path) -> Result<Option<&Node>, NodeError> {
        let mut current = self.content();
        let mut walked = Path::new();
        for element in path {
            let next = match (element, current) {
                (_, Node::Scalar(s)) if s.is_null() => None,
                (PathElement::FieldName(name), Node::Mapping(m)) => m.get(name),
                (PathElement::Index(i), Node::Mapping(m)) => m.get(&i.to_string()),
                (PathElement::Index(i), Node::Sequence(items)) => items.get(*i),
                (PathElement::FieldName(name), Node::Sequence(items)) => match name.parse::<usize>() {
                    Ok(i) => items.get(i),
                    Err(_) => {
                        return Err(NodeError::type_mismatch(
                            walked.to_string(),
                            "mapping",
                            current.kind().to_string(),
                        ))
                    }
                },
                (PathElement::FieldName(_), other) => {
                    return Err(NodeError::type_mismatch(
                        walked.to_string(),
                        "mapping",
                        other.kind().to_string(),
                    ))
                }
                (PathElement::Index(_), other) => {
                    return Err(NodeError::type_mismatch(
                        walked.to_string(),
                        "sequence",
                        other.kind().to_string(),
                    ))
                }
            };
            match next {
                Some(node) => current = node.content(),
                None => return Ok(None),
            }
            walked.push(element.clone());
        }
        Ok(Some(current))
    }

    /// Decodes the tree into a generic value.
    pub fn to_value(&self) -> Value {
        match self.content() {
            Node::Mapping(m) => Value::Map(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect::<Map>(),
            ),
            Node::Sequence(items) => Value::List(items.iter().map(Node::to_value).collect()),
            Node::Scalar(s) => s.to_value(),
            Node::Document(_) | Node::Alias(_) => Value::Null,
        }
    }

    /// Builds a tree from a generic value.
    pub fn from_value(value: &Value) -> Node {
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::Scalar(Scalar::bool(*b)),
            Value::Int(i) => Node::Scalar(Scalar::int(*i)),
            Value::Float(f) => Node::Scalar(Scalar::float(*f)),
            Value::String(s) => Node::string(s.clone()),
            Value::List(items) => Node::Sequence(items.iter().map(Node::from_value).collect()),
            Value::Map(m) => Node::Mapping(
                m.iter()
                    .map(|(k, v)| (k.clone(), Node::from_value(v)))
                    .collect(),
            ),
        }
    }

    /// Parses a single YAML document.
    ///
    /// Scalars keep their source text; see [`Scalar::literal`].
    pub fn from_yaml(yaml: &str) -> Result<Node, NodeError> {
        let shape = serde_yaml::Value::deserialize(serde_yaml::Deserializer::from_str(yaml))?;
        if shape.is_null() {
            return Ok(Node::null());
        }
        Ok(Shaped(&shape).deserialize(serde_yaml::Deserializer::from_str(yaml))?)
    }

    /// Parses every document of a `---` separated stream, in order.
    pub fn from_yaml_stream(bytes: &[u8]) -> Result<Vec<Node>, NodeError> {
        let shapes = serde_yaml::Deserializer::from_slice(bytes);
        let sources = serde_yaml::Deserializer::from_slice(bytes);
        let mut nodes = Vec::new();
        for (shape_doc, source_doc) in shapes.zip(sources) {
            let shape = serde_yaml::Value::deserialize(shape_doc)?;
            if shape.is_null() {
                nodes.push(Node::null());
                continue;
            }
            nodes.push(Shaped(&shape).deserialize(source_doc)?);
        }
        Ok(nodes)
    }

    /// Serializes the tree as a YAML document.
    pub fn to_yaml(&self) -> Result<String, NodeError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn key_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Node::null(),
            serde_yaml::Value::Bool(b) => Node::Scalar(Scalar::bool(b)),
            serde_yaml::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Node::Scalar(Scalar::int(i)),
                (None, Some(f)) => Node::Scalar(Scalar::float(f)),
                (None, None) => Node::string(n.to_string()),
            },
            serde_yaml::Value::String(s) => Node::string(s),
            serde_yaml::Value::Sequence(items) => {
                Node::Sequence(items.into_iter().map(Node::from).collect())
            }
            serde_yaml::Value::Mapping(m) => Node::Mapping(
                m.into_iter()
                    .map(|(k, v)| (key_string(k), Node::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// Reads a document a second time, guided by the shape already resolved
/// from the same text, to recover the source text of every scalar.
struct Shaped<'s>(&'s serde_yaml::Value);

impl<'de> DeserializeSeed<'de> for Shaped<'_> {
    type Value = Node;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        match self.0 {
            serde_yaml::Value::Mapping(m) => deserializer.deserialize_map(MappingShape(m)),
            serde_yaml::Value::Sequence(items) => deserializer.deserialize_seq(SequenceShape(items)),
            serde_yaml::Value::Tagged(_) => {
                IgnoredAny::deserialize(deserializer)?;
                Ok(Node::from(self.0.clone()))
            }
            scalar => {
                let source = deserializer.deserialize_str(SourceText)?;
                Ok(Node::Scalar(Scalar::with_source(scalar, source)))
            }
        }
    }
}

struct SourceText;

impl<'de> Visitor<'de> for SourceText {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }
}

struct MappingShape<'s>(&'s serde_yaml::Mapping);

impl<'de> Visitor<'de> for MappingShape<'_> {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut shapes = self.0.iter();
        let mut mapping = Mapping::new();
        while access.next_key::<IgnoredAny>()?.is_some() {
            let (key, shape) = shapes
                .next()
                .ok_or_else(|| <A::Error as de::Error>::custom("mapping has more entries than its shape"))?;
            let value = access.next_value_seed(Shaped(shape))?;
            mapping.set(key_string(key.clone()), value);
        }
        Ok(Node::Mapping(mapping))
    }
}

struct SequenceShape<'s>(&'s [serde_yaml::Value]);

impl<'de> Visitor<'de> for SequenceShape<'_> {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(self.0.len());
        for shape in self.0 {
            match access.next_element_seed(Shaped(shape))? {
                Some(item) => items.push(item),
                None => return Err(de::Error::custom("sequence is shorter than its shape")),
            }
        }
        Ok(Node::Sequence(items))
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.value {
            ScalarValue::Null => serializer.serialize_unit(),
            ScalarValue::Bool(b) => serializer.serialize_bool(*b),
            ScalarValue::Int(i) => serializer.serialize_i64(*i),
            ScalarValue::Float(f) => serializer.serialize_f64(*f),
            ScalarValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Document(inner) => inner.serialize(serializer),
            Node::Alias(alias) => alias.target.serialize(serializer),
            Node::Scalar(s) => s.serialize(serializer),
            Node::Sequence(items) => items.serialize(serializer),
            Node::Mapping(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_yaml::Value::deserialize(deserializer).map(Node::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  template:
    spec:
      containers:
      - name: app
        image: nginx:1.25
"#;

    #[test]
    fn test_yaml_roundtrip_keeps_key_order() {
        let node = Node::from_yaml(DEPLOYMENT).unwrap();
        let keys: Vec<&str> = node.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["apiVersion", "kind", "metadata", "spec"]);
        let reparsed = Node::from_yaml(&node.to_yaml().unwrap()).unwrap();
        assert_eq!(reparsed, node);
    }

    #[test]
    fn test_lookup_walks_mappings_and_sequences() {
        let node = Node::from_yaml(DEPLOYMENT).unwrap();
        let image = node
            .lookup(&Path::parse("spec.template.spec.containers[0].image"))
            .unwrap()
            .unwrap();
        assert_eq!(image.as_scalar(), Some(&Scalar::string("nginx:1.25")));
    }

    #[test]
    fn test_lookup_absent_is_none() {
        let node = Node::from_yaml(DEPLOYMENT).unwrap();
        assert!(node.lookup(&Path::parse("spec.replicas")).unwrap().is_none());
        assert!(node
            .lookup(&Path::parse("spec.template.spec.containers[3]"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_lookup_through_scalar_is_type_mismatch() {
        let node = Node::from_yaml(DEPLOYMENT).unwrap();
        let err = node.lookup(&Path::parse("metadata.name.first")).unwrap_err();
        assert!(matches!(err, NodeError::TypeMismatch { ref path, .. } if path == "metadata.name"));
    }

    #[test]
    fn test_aliases_resolve() {
        let mut mapping = Mapping::new();
        mapping.set(
            "ref",
            Node::Alias(Alias {
                anchor: "a".into(),
                target: Box::new(Node::string("value")),
            }),
        );
        let node = Node::Document(Box::new(Node::Mapping(mapping)));
        let found = node.lookup(&Path::parse("ref")).unwrap().unwrap();
        assert_eq!(found.kind(), NodeKind::Scalar);
        assert_eq!(node.to_value().as_map().and_then(|m| m.get("ref")), Some(&Value::from("value")));
    }

    #[test]
    fn test_content_mut_detaches_alias() {
        let mut node = Node::Alias(Alias {
            anchor: "a".into(),
            target: Box::new(Node::new_mapping()),
        });
        node.as_mapping_mut().unwrap().set("k", Node::string("v"));
        assert_eq!(node.kind(), NodeKind::Mapping);
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a = Node::from_yaml("a: 1\nb: 2\n").unwrap();
        let b = Node::from_yaml("b: 2\na: 1\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(Scalar::int(3).literal(), "3");
        assert_eq!(Scalar::float(1.0).literal(), "1.0");
        assert_eq!(Scalar::bool(true).literal(), "true");
        assert_eq!(Scalar::null().text(), "");
    }

    #[test]
    fn test_scalars_keep_source_text() {
        let node = Node::from_yaml(
            "version: 1.10\nmode: 0o644\nempty:\ntilde: ~\nport: 8080\nimage: 'nginx'\n",
        )
        .unwrap();
        let scalar = |field: &str| node.as_mapping().unwrap().get(field).unwrap().as_scalar().unwrap();

        assert_eq!(scalar("version").literal(), "1.10");
        assert_eq!(scalar("version").value(), &ScalarValue::Float(1.1));
        assert_eq!(scalar("mode").literal(), "0o644");
        assert_eq!(scalar("mode").value(), &ScalarValue::Int(420));
        assert_eq!(scalar("empty").literal(), "");
        assert!(scalar("empty").is_null());
        assert_eq!(scalar("tilde").literal(), "~");
        assert_eq!(scalar("tilde").text(), "");
        assert_eq!(scalar("port").literal(), "8080");
        assert_eq!(scalar("image").literal(), "nginx");
    }

    #[test]
    fn test_stream_keeps_source_text_per_document() {
        let nodes = Node::from_yaml_stream(b"a: 1.10\n---\n---\nb: [0x1F, x]\n").unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[1].is_null());
        let a = nodes[0].lookup(&Path::parse("a")).unwrap().unwrap();
        assert_eq!(a.as_scalar().unwrap().literal(), "1.10");
        let b0 = nodes[2].lookup(&Path::parse("b[0]")).unwrap().unwrap();
        assert_eq!(b0.as_scalar().unwrap().literal(), "0x1F");
    }

    #[test]
    fn test_aliased_scalars_keep_source_text() {
        let node = Node::from_yaml("base: &v 1.20\ncopy: *v\n").unwrap();
        let copy = node.lookup(&Path::parse("copy")).unwrap().unwrap();
        assert_eq!(copy.as_scalar().unwrap().literal(), "1.20");
    }
}
