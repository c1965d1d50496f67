//! Resource - a document plus the identities the engine tracks for it.

use super::annotations::{
    is_build_annotation, GENERATOR_BEHAVIOR_ANNOTATION, PREVIOUS_KINDS_ANNOTATION,
    PREVIOUS_NAMESPACES_ANNOTATION, PREVIOUS_NAMES_ANNOTATION,
};
use super::behavior::Behavior;
use crate::patch::merge_overlay;
use crate::resid::{Gvk, ResId};
use crate::yaml::{NodeError, ResourceMeta, StructuredNode};
use std::collections::BTreeMap;

/// Resource is a [`StructuredNode`] with an original id, a current id and
/// a [`Behavior`].
///
/// The original id is fixed at creation. The current id follows renames
/// done through [`Resource::set_name`], [`Resource::set_namespace`] and
/// [`Resource::set_gvk`], or an explicit [`Resource::refresh_cur_id`] after
/// editing the payload directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    node: StructuredNode,
    orig_id: ResId,
    cur_id: ResId,
    behavior: Behavior,
}

impl Resource {
    /// Builds a resource from a document.
    ///
    /// The original id is rebuilt from the previous-id build annotations
    /// when the document carries them, and the behavior from the
    /// generator-behavior annotation.
    pub fn new(node: StructuredNode) -> Result<Resource, NodeError> {
        let meta = node.get_meta()?;
        let cur_id = id_from_meta(&meta);
        let orig_id = original_id(&meta).unwrap_or_else(|| cur_id.clone());
        let behavior = match meta.annotations.get(GENERATOR_BEHAVIOR_ANNOTATION) {
            Some(b) => b.parse::<Behavior>().map_err(|e| {
                NodeError::invalid_metadata(format!("{GENERATOR_BEHAVIOR_ANNOTATION}: {e}"))
            })?,
            None => Behavior::default(),
        };
        Ok(Resource {
            node,
            orig_id,
            cur_id,
            behavior,
        })
    }

    /// Builds a resource with explicit bookkeeping.
    pub fn with_ids(node: StructuredNode, orig_id: ResId, cur_id: ResId, behavior: Behavior) -> Self {
        Resource {
            node,
            orig_id,
            cur_id,
            behavior,
        }
    }

    pub fn node(&self) -> &StructuredNode {
        &self.node
    }

    /// Mutable access to the payload. Call [`Resource::refresh_cur_id`]
    /// after changing identifying fields through it.
    pub fn node_mut(&mut self) -> &mut StructuredNode {
        &mut self.node
    }

    pub fn into_node(self) -> StructuredNode {
        self.node
    }

    pub fn orig_id(&self) -> &ResId {
        &self.orig_id
    }

    pub fn cur_id(&self) -> &ResId {
        &self.cur_id
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: Behavior) {
        self.behavior = behavior;
    }

    /// True if `id` is either the original or the current id.
    pub fn has_id(&self, id: &ResId) -> bool {
        &self.orig_id == id || &self.cur_id == id
    }

    /// Re-derives the current id from the payload's metadata.
    pub fn refresh_cur_id(&mut self) -> Result<(), NodeError> {
        self.cur_id = id_from_meta(&self.node.get_meta()?);
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), NodeError> {
        if self.cur_id.name == name {
            return Ok(());
        }
        self.store_previous_id()?;
        self.node.set_name(name)?;
        self.refresh_cur_id()
    }

    pub fn set_namespace(&mut self, namespace: &str) -> Result<(), NodeError> {
        if self.cur_id.namespace == namespace {
            return Ok(());
        }
        self.store_previous_id()?;
        self.node.set_namespace(namespace)?;
        self.refresh_cur_id()
    }

    pub fn set_gvk(&mut self, gvk: &Gvk) -> Result<(), NodeError> {
        if &self.cur_id.gvk == gvk {
            return Ok(());
        }
        self.store_previous_id()?;
        self.node.set_gvk(gvk)?;
        self.refresh_cur_id()
    }

    /// Previous ids recorded in the build annotations, oldest first.
    pub fn previous_ids(&self) -> Result<Vec<ResId>, NodeError> {
        Ok(previous_ids(&self.node.get_meta()?))
    }

    /// Returns the payload of `self` overlaid with the payload of
    /// `incoming`, keeping the identities and behavior of `self`.
    ///
    /// Build annotations of `incoming` are dropped; those of `self` are
    /// kept, so the result reloads with the same original id and behavior.
    pub fn merged_with(&self, incoming: &Resource) -> Result<Resource, NodeError> {
        let mut patch = incoming.clone();
        patch.remove_build_annotations()?;
        let own_build: BTreeMap<String, String> = self
            .node
            .get_annotations()?
            .into_iter()
            .filter(|(k, _)| is_build_annotation(k))
            .collect();

        let mut node = StructuredNode::from_node(merge_overlay(self.node.node(), patch.node.node()));
        node.set_gvk(&self.cur_id.gvk)?;
        node.set_name(&self.cur_id.name)?;
        node.set_namespace(&self.cur_id.namespace)?;
        let mut annotations = node.get_annotations()?;
        annotations.retain(|k, _| !is_build_annotation(k));
        annotations.extend(own_build);
        node.set_annotations(&annotations)?;
        Ok(Resource {
            node,
            orig_id: self.orig_id.clone(),
            cur_id: self.cur_id.clone(),
            behavior: self.behavior,
        })
    }

    /// Strips the engine's build annotations from the payload.
    pub fn remove_build_annotations(&mut self) -> Result<(), NodeError> {
        let mut annotations = self.node.get_annotations()?;
        let before = annotations.len();
        annotations.retain(|k, _| !is_build_annotation(k));
        if annotations.len() != before {
            self.node.set_annotations(&annotations)?;
        }
        Ok(())
    }

    pub fn as_yaml(&self) -> Result<String, NodeError> {
        self.node.to_yaml()
    }

    fn store_previous_id(&mut self) -> Result<(), NodeError> {
        let mut annotations = self.node.get_annotations()?;
        append_entry(&mut annotations, PREVIOUS_NAMES_ANNOTATION, &self.cur_id.name);
        append_entry(&mut annotations, PREVIOUS_NAMESPACES_ANNOTATION, &self.cur_id.namespace);
        append_entry(&mut annotations, PREVIOUS_KINDS_ANNOTATION, &self.cur_id.gvk.kind);
        self.node.set_annotations(&annotations)
    }
}

fn id_from_meta(meta: &ResourceMeta) -> ResId {
    ResId::with_namespace(meta.gvk(), meta.namespace.clone(), meta.name.clone())
}

fn append_entry(annotations: &mut BTreeMap<String, String>, key: &str, value: &str) {
    match annotations.get_mut(key) {
        Some(existing) => {
            existing.push(',');
            existing.push_str(value);
        }
        None => {
            annotations.insert(key.to_string(), value.to_string());
        }
    }
}

fn previous_ids(meta: &ResourceMeta) -> Vec<ResId> {
    let (Some(names), Some(namespaces), Some(kinds)) = (
        meta.annotations.get(PREVIOUS_NAMES_ANNOTATION),
        meta.annotations.get(PREVIOUS_NAMESPACES_ANNOTATION),
        meta.annotations.get(PREVIOUS_KINDS_ANNOTATION),
    ) else {
        return Vec::new();
    };
    let gvk = meta.gvk();
    names
        .split(',')
        .zip(namespaces.split(','))
        .zip(kinds.split(','))
        .map(|((name, namespace), kind)| {
            ResId::with_namespace(
                Gvk::new(gvk.group.clone(), gvk.version.clone(), kind),
                namespace,
                name,
            )
        })
        .collect()
}

fn original_id(meta: &ResourceMeta) -> Option<ResId> {
    previous_ids(meta).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::BUILD_ANNOTATIONS;
    use pretty_assertions::assert_eq;

    fn resource(yaml: &str) -> Resource {
        Resource::new(StructuredNode::from_yaml(yaml).unwrap()).unwrap()
    }

    const CONFIG_MAP: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  namespace: app
data:
  a: "1"
"#;

    #[test]
    fn test_new_derives_ids() {
        let r = resource(CONFIG_MAP);
        let id = ResId::with_namespace(Gvk::new("", "v1", "ConfigMap"), "app", "settings");
        assert_eq!(r.orig_id(), &id);
        assert_eq!(r.cur_id(), &id);
        assert_eq!(r.behavior(), Behavior::Unspecified);
    }

    #[test]
    fn test_rename_changes_current_id_only() {
        let mut r = resource(CONFIG_MAP);
        r.set_name("prod-settings").unwrap();
        r.set_namespace("prod").unwrap();
        assert_eq!(r.orig_id().name, "settings");
        assert_eq!(r.cur_id().name, "prod-settings");
        assert_eq!(r.cur_id().namespace, "prod");
        assert_eq!(r.node().get_name().unwrap(), "prod-settings");
        assert_eq!(r.previous_ids().unwrap().len(), 2);
    }

    #[test]
    fn test_original_id_survives_reload() {
        let mut r = resource(CONFIG_MAP);
        r.set_name("renamed").unwrap();
        let reloaded = resource(&r.as_yaml().unwrap());
        assert_eq!(reloaded.orig_id(), r.orig_id());
        assert_eq!(reloaded.cur_id(), r.cur_id());
    }

    #[test]
    fn test_behavior_from_annotation() {
        let r = resource(
            r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  annotations:
    internal.config.kubernetes.io/generatorBehavior: merge
"#,
        );
        assert_eq!(r.behavior(), Behavior::Merge);
    }

    #[test]
    fn test_remove_build_annotations() {
        let mut r = resource(CONFIG_MAP);
        r.set_name("renamed").unwrap();
        let mut annotations = r.node().get_annotations().unwrap();
        annotations.insert("keep".to_string(), "me".to_string());
        r.node_mut().set_annotations(&annotations).unwrap();

        r.remove_build_annotations().unwrap();
        let left = r.node().get_annotations().unwrap();
        assert_eq!(left.keys().collect::<Vec<_>>(), vec!["keep"]);
        assert!(BUILD_ANNOTATIONS.iter().all(|a| !left.contains_key(*a)));
    }

    #[test]
    fn test_merged_with_keeps_identity() {
        let base = resource(CONFIG_MAP);
        let incoming = resource(
            r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: other
data:
  b: "2"
"#,
        );
        let merged = base.merged_with(&incoming).unwrap();
        assert_eq!(merged.cur_id(), base.cur_id());
        assert_eq!(merged.node().get_namespace().unwrap(), "app");
        assert_eq!(merged.node().get_data_map().unwrap().len(), 2);
    }

    #[test]
    fn test_new_rejects_unknown_behavior() {
        let node = StructuredNode::from_yaml(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\n  annotations:\n    \
             internal.config.kubernetes.io/generatorBehavior: mrege\n",
        )
        .unwrap();
        let err = Resource::new(node).unwrap_err();
        assert!(matches!(err, NodeError::InvalidMetadata { .. }));
        assert!(err.to_string().contains("\"mrege\""));
    }

    #[test]
    fn test_new_rejects_corrupt_metadata() {
        let node = StructuredNode::from_yaml("kind: Pod\nmetadata: oops\n").unwrap();
        assert!(matches!(Resource::new(node), Err(NodeError::InvalidMetadata { .. })));
    }
}
