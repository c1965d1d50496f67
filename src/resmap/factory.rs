//! ResMapFactory - builds collections.

use super::error::ResMapError;
use super::resmap::ResMap;
use crate::resource::{Resource, ResourceFactory};
use crate::yaml::Node;

/// ResMapFactory makes [`ResMap`]s using a [`ResourceFactory`].
#[derive(Debug, Clone, Default)]
pub struct ResMapFactory {
    resource_factory: ResourceFactory,
}

impl ResMapFactory {
    pub fn new(resource_factory: ResourceFactory) -> Self {
        ResMapFactory { resource_factory }
    }

    pub fn resource_factory(&self) -> &ResourceFactory {
        &self.resource_factory
    }

    pub fn new_res_map(&self) -> ResMap {
        ResMap::new()
    }

    /// Parses a YAML stream into a collection. Duplicate current ids fail.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<ResMap, ResMapError> {
        let resources = self.resource_factory.slice_from_bytes(bytes)?;
        ResMap::from_resources(resources)
    }

    pub fn from_nodes(&self, nodes: Vec<Node>) -> Result<ResMap, ResMapError> {
        let resources = self.resource_factory.slice_from_nodes(nodes)?;
        ResMap::from_resources(resources)
    }

    pub fn from_resource(&self, resource: Resource) -> ResMap {
        ResMap::from_resource(resource)
    }

    pub fn from_resource_slice(&self, resources: Vec<Resource>) -> Result<ResMap, ResMapError> {
        ResMap::from_resources(resources)
    }
}
