//! Group/Version/Kind and cluster-scope classification.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const NO_GROUP: &str = "[noGrp]";
const NO_VERSION: &str = "[noVer]";
const NO_KIND: &str = "[noKind]";

/// Kinds that cannot be placed in a namespace.
static CLUSTER_SCOPED_KINDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "APIService",
        "CSIDriver",
        "CSINode",
        "CertificateSigningRequest",
        "Cluster",
        "ClusterIssuer",
        "ClusterRole",
        "ClusterRoleBinding",
        "ComponentStatus",
        "CustomResourceDefinition",
        "IngressClass",
        "MutatingWebhookConfiguration",
        "Namespace",
        "Node",
        "PersistentVolume",
        "PodSecurityPolicy",
        "PriorityClass",
        "RuntimeClass",
        "SelfSubjectAccessReview",
        "SelfSubjectRulesReview",
        "StorageClass",
        "SubjectAccessReview",
        "TokenReview",
        "ValidatingWebhookConfiguration",
        "VolumeAttachment",
    ]
    .into_iter()
    .collect()
});

/// Returns true if resources of the given kind live outside any namespace.
pub fn is_cluster_scoped_kind(kind: &str) -> bool {
    CLUSTER_SCOPED_KINDS.contains(kind)
}

/// Gvk identifies a type of resource: its API group, version and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gvk {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Gvk {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Gvk {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Creates a Gvk with only the kind set.
    pub fn from_kind(kind: impl Into<String>) -> Self {
        Gvk {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Creates a Gvk from an `apiVersion` string and a kind.
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        let (group, version) = parse_group_version(api_version);
        Gvk {
            group,
            version,
            kind: kind.into(),
        }
    }

    /// Renders the `apiVersion` field value, `group/version` or just `version`.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn is_cluster_scoped(&self) -> bool {
        is_cluster_scoped_kind(&self.kind)
    }

    pub fn is_namespaceable(&self) -> bool {
        !self.is_cluster_scoped()
    }
}

/// Splits an `apiVersion` value into group and version.
///
/// The core group has no slash: `v1` yields `("", "v1")`.
pub fn parse_group_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

fn or_placeholder<'a>(s: &'a str, placeholder: &'a str) -> &'a str {
    if s.is_empty() {
        placeholder
    } else {
        s
    }
}

impl fmt::Display for Gvk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            or_placeholder(&self.kind, NO_KIND),
            or_placeholder(&self.version, NO_VERSION),
            or_placeholder(&self.group, NO_GROUP)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_version() {
        assert_eq!(parse_group_version("apps/v1"), ("apps".into(), "v1".into()));
        assert_eq!(parse_group_version("v1"), ("".into(), "v1".into()));
        assert_eq!(parse_group_version(""), ("".into(), "".into()));
    }

    #[test]
    fn test_api_version() {
        assert_eq!(Gvk::new("apps", "v1", "Deployment").api_version(), "apps/v1");
        assert_eq!(Gvk::new("", "v1", "Service").api_version(), "v1");
    }

    #[test]
    fn test_cluster_scope() {
        assert!(Gvk::new("", "v1", "Namespace").is_cluster_scoped());
        assert!(Gvk::from_kind("ClusterRole").is_cluster_scoped());
        assert!(Gvk::new("apps", "v1", "Deployment").is_namespaceable());
    }

    #[test]
    fn test_display() {
        assert_eq!(Gvk::new("apps", "v1", "Deployment").to_string(), "Deployment.v1.apps");
        assert_eq!(Gvk::from_kind("Secret").to_string(), "Secret.[noVer].[noGrp]");
    }
}
