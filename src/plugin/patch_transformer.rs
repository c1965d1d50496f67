//! PatchTransformer - applies a strategic merge patch to selected resources.

use super::error::PluginError;
use super::helpers::{Configurable, PluginHelpers, Transformer};
use crate::resid::IdSet;
use crate::resmap::ResMap;
use crate::resource::Resource;
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration of a [`PatchTransformer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTransformerConfig {
    /// Inline patch document.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub patch: String,
    /// Path of a patch document, read through the loader.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Resources to patch. Without it the patch's own id picks the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Selector>,
}

#[derive(Debug, Clone, Default)]
pub struct PatchTransformer {
    patch: Option<Resource>,
    target: Option<Selector>,
}

impl PatchTransformer {
    pub fn new() -> Self {
        PatchTransformer::default()
    }
}

impl Configurable for PatchTransformer {
    fn config(&mut self, helpers: &PluginHelpers, config: &[u8]) -> Result<(), PluginError> {
        let cfg: PatchTransformerConfig = serde_yaml::from_slice(config)?;
        let bytes = match (cfg.patch.trim().is_empty(), cfg.path.is_empty()) {
            (true, true) => return Err(PluginError::config("must specify one of patch and path")),
            (false, false) => {
                return Err(PluginError::config("patch and path can't be set at the same time"))
            }
            (false, true) => cfg.patch.into_bytes(),
            (true, false) => helpers.loader().load(&cfg.path)?,
        };
        let mut patches = helpers
            .res_map_factory()
            .resource_factory()
            .slice_from_bytes(&bytes)?;
        if patches.len() != 1 {
            return Err(PluginError::config(format!(
                "expected exactly one patch document, found {}",
                patches.len()
            )));
        }
        let patch = patches.remove(0);
        helpers.validator().validate(patch.node().node())?;
        self.patch = Some(patch);
        self.target = cfg.target;
        Ok(())
    }
}

impl Transformer for PatchTransformer {
    fn transform(&self, m: &mut ResMap) -> Result<(), PluginError> {
        let Some(patch) = &self.patch else {
            return Err(PluginError::config("transformer used before it was configured"));
        };
        let targets: IdSet = match &self.target {
            Some(selector) => m
                .select(selector)?
                .iter()
                .map(|r| r.borrow().cur_id().clone())
                .collect(),
            None => {
                let found = m.get_by_id(patch.cur_id())?;
                let id = found.borrow().cur_id().clone();
                std::iter::once(id).collect()
            }
        };
        debug!(patch = %patch.cur_id(), targets = targets.len(), "applying patch");
        m.apply_sm_patch(&targets, patch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{MemoryLoader, MetadataValidator};
    use crate::resmap::ResMapFactory;
    use pretty_assertions::assert_eq;

    const BASE: &[u8] = br#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  labels:
    tier: frontend
spec:
  replicas: 1
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: api
  labels:
    tier: backend
spec:
  replicas: 1
"#;

    fn helpers(loader: MemoryLoader) -> PluginHelpers {
        PluginHelpers::new(Box::new(loader), Box::new(MetadataValidator), ResMapFactory::default())
    }

    fn replicas(m: &ResMap) -> Vec<String> {
        m.resources()
            .iter()
            .map(|r| r.borrow().node().get_string("spec.replicas").unwrap())
            .collect()
    }

    #[test]
    fn test_patch_by_own_id() {
        let h = helpers(MemoryLoader::default());
        let mut m = h.res_map_factory().from_bytes(BASE).unwrap();
        let mut t = PatchTransformer::new();
        t.config(
            &h,
            br#"
patch: |
  apiVersion: apps/v1
  kind: Deployment
  metadata:
    name: api
  spec:
    replicas: 3
"#,
        )
        .unwrap();
        t.transform(&mut m).unwrap();
        assert_eq!(replicas(&m), vec!["1", "3"]);
    }

    #[test]
    fn test_patch_from_path_with_target() {
        let loader = MemoryLoader::new("overlay").with_file(
            "replicas.yaml",
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: any\nspec:\n  replicas: 5\n",
        );
        let h = helpers(loader);
        let mut m = h.res_map_factory().from_bytes(BASE).unwrap();
        let mut t = PatchTransformer::new();
        t.config(
            &h,
            b"path: replicas.yaml\ntarget:\n  kind: Deployment\n  labelSelector: tier=frontend\n",
        )
        .unwrap();
        t.transform(&mut m).unwrap();
        assert_eq!(replicas(&m), vec!["5", "1"]);
        assert_eq!(
            m.get_by_index(0).unwrap().borrow().node().get_name().unwrap(),
            "web"
        );
    }

    #[test]
    fn test_config_errors() {
        let h = helpers(MemoryLoader::default());
        let mut t = PatchTransformer::new();
        assert!(matches!(t.config(&h, b"{}"), Err(PluginError::Config { .. })));
        assert!(matches!(
            t.config(&h, b"path: missing.yaml\n"),
            Err(PluginError::Loader(_))
        ));
        assert!(matches!(
            t.config(&h, b"patch: |\n  metadata:\n    name: x\n"),
            Err(PluginError::Validation(_))
        ));
        assert!(matches!(t.config(&h, b"patch: [\n"), Err(PluginError::ConfigSyntax(_))));
    }

    #[test]
    fn test_unconfigured_transform_fails() {
        let mut m = ResMap::new();
        assert!(PatchTransformer::new().transform(&mut m).is_err());
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let cfg = PatchTransformerConfig {
            path: "p.yaml".to_string(),
            target: Some(Selector {
                kind: "Deployment".to_string(),
                label_selector: "app=web".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(yaml.contains("labelSelector: app=web"));
        let back: PatchTransformerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, cfg);
    }
}
