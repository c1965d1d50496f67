//! Build annotations the engine uses for identity bookkeeping.

pub const BUILD_ANNOTATION_PREFIX: &str = "internal.config.kubernetes.io/";

pub const PREVIOUS_KINDS_ANNOTATION: &str = "internal.config.kubernetes.io/previousKinds";
pub const PREVIOUS_NAMES_ANNOTATION: &str = "internal.config.kubernetes.io/previousNames";
pub const PREVIOUS_NAMESPACES_ANNOTATION: &str = "internal.config.kubernetes.io/previousNamespaces";
pub const PREFIXES_ANNOTATION: &str = "internal.config.kubernetes.io/prefixes";
pub const SUFFIXES_ANNOTATION: &str = "internal.config.kubernetes.io/suffixes";
pub const GENERATOR_BEHAVIOR_ANNOTATION: &str = "internal.config.kubernetes.io/generatorBehavior";
pub const NEEDS_HASH_ANNOTATION: &str = "internal.config.kubernetes.io/needsHashSuffix";

/// Every annotation removed before a resource is emitted.
pub const BUILD_ANNOTATIONS: [&str; 7] = [
    PREVIOUS_KINDS_ANNOTATION,
    PREVIOUS_NAMES_ANNOTATION,
    PREVIOUS_NAMESPACES_ANNOTATION,
    PREFIXES_ANNOTATION,
    SUFFIXES_ANNOTATION,
    GENERATOR_BEHAVIOR_ANNOTATION,
    NEEDS_HASH_ANNOTATION,
];

pub fn is_build_annotation(key: &str) -> bool {
    BUILD_ANNOTATIONS.contains(&key)
}
