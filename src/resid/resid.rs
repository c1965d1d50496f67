//! Resource identity.

use super::gvk::Gvk;
use std::fmt;

/// Namespace assumed for a namespaceable resource that names none.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Effective namespace reported for cluster-scoped resources.
pub const NON_NAMESPACEABLE: &str = "_non_namespaceable_";

const NO_NAMESPACE: &str = "[noNs]";
const NO_NAME: &str = "[noName]";

/// ResId identifies a resource: its Gvk plus namespace and name.
///
/// Equality is field-wise over all five components, so an empty namespace
/// and `default` are different ids. Use [`ResId::is_ns_equals`] when the
/// effective namespace is what matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResId {
    pub gvk: Gvk,
    pub name: String,
    pub namespace: String,
}

impl ResId {
    /// Creates an id with no namespace.
    pub fn new(gvk: Gvk, name: impl Into<String>) -> Self {
        ResId {
            gvk,
            name: name.into(),
            namespace: String::new(),
        }
    }

    pub fn with_namespace(gvk: Gvk, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ResId {
            gvk,
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn is_cluster_scoped(&self) -> bool {
        self.gvk.is_cluster_scoped()
    }

    pub fn is_namespaceable(&self) -> bool {
        self.gvk.is_namespaceable()
    }

    /// The namespace used when grouping or comparing by namespace.
    pub fn effective_namespace(&self) -> &str {
        if self.is_cluster_scoped() {
            NON_NAMESPACEABLE
        } else if self.namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.namespace
        }
    }

    /// True if both ids land in the same effective namespace.
    pub fn is_ns_equals(&self, other: &ResId) -> bool {
        self.effective_namespace() == other.effective_namespace()
    }
}

impl fmt::Display for ResId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { NO_NAME } else { &self.name };
        let ns = if self.namespace.is_empty() { NO_NAMESPACE } else { &self.namespace };
        write!(f, "{}/{}.{}", self.gvk, name, ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(ns: &str, name: &str) -> ResId {
        ResId::with_namespace(Gvk::new("apps", "v1", "Deployment"), ns, name)
    }

    #[test]
    fn test_equality_is_field_wise() {
        assert_eq!(deployment("a", "x"), deployment("a", "x"));
        assert_ne!(deployment("", "x"), deployment("default", "x"));
        assert_ne!(deployment("a", "x"), deployment("a", "y"));
    }

    #[test]
    fn test_effective_namespace() {
        assert_eq!(deployment("", "x").effective_namespace(), DEFAULT_NAMESPACE);
        assert_eq!(deployment("prod", "x").effective_namespace(), "prod");
        let ns = ResId::new(Gvk::new("", "v1", "Namespace"), "prod");
        assert_eq!(ns.effective_namespace(), NON_NAMESPACEABLE);
        assert!(deployment("", "x").is_ns_equals(&deployment("default", "y")));
    }

    #[test]
    fn test_display() {
        assert_eq!(deployment("prod", "web").to_string(), "Deployment.v1.apps/web.prod");
        assert_eq!(
            ResId::new(Gvk::new("", "v1", "ConfigMap"), "").to_string(),
            "ConfigMap.v1.[noGrp]/[noName].[noNs]"
        );
    }
}
