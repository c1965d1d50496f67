//! # KRM ResMap
//!
//! An in-memory engine that tracks, identifies and merges collections of
//! Kubernetes-style resource documents as they are generated, patched and
//! combined from a base and its overlays.
//!
//! ## Modules
//!
//! - [`value`] - Generic decoded values returned by field lookups
//! - [`yaml`] - Document tree, field paths and the structured-node adapter
//! - [`selector`] - Label/annotation selector expressions and resource selectors
//! - [`resid`] - Group/version/kind and resource identity
//! - [`resource`] - Resources, behaviors, build annotations and the resource factory
//! - [`patch`] - Strategic merge patch, overlay merge and document comparison
//! - [`resmap`] - The identity-indexed resource collection
//! - [`plugin`] - Loader, validator and generator/transformer seams
//!
//! ## Example
//!
//! ```
//! use krm_resmap::{ResMapFactory, ResId, Gvk};
//!
//! let yaml = b"apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\n";
//! let m = ResMapFactory::default().from_bytes(yaml).unwrap();
//! let id = ResId::new(Gvk::new("", "v1", "ConfigMap"), "settings");
//! assert!(m.get_by_current_id(&id).is_ok());
//! ```

pub mod patch;
pub mod plugin;
pub mod resid;
pub mod resmap;
pub mod resource;
pub mod selector;
pub mod value;
pub mod yaml;

pub use patch::{strategic_merge, Comparison, PatchError};
pub use plugin::{
    Configurable, Generator, Loader, MemoryLoader, PatchTransformer, PluginError, PluginHelpers,
    Transformer, Validator,
};
pub use resid::{Gvk, IdSet, ResId};
pub use resmap::{ResMap, ResMapError, ResMapFactory, ResourceRef};
pub use resource::{Behavior, Resource, ResourceFactory};
pub use selector::{LabelSelector, Selector};
pub use value::Value;
pub use yaml::{Node, NodeError, Path, PathElement, StructuredNode};
