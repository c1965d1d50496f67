//! Declarative resource selectors.

use super::error::SelectorError;
use super::labels::LabelSelector;
use crate::resid::Gvk;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Selector picks resources by identity and by label/annotation expressions.
///
/// Group, version, kind, name and namespace are regular expressions that
/// must match the whole field; an empty field matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label_selector: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub annotation_selector: String,
}

impl Selector {
    /// Compiles the selector into matchers.
    pub fn compile(&self) -> Result<CompiledSelector, SelectorError> {
        Ok(CompiledSelector {
            group: anchored("group", &self.group)?,
            version: anchored("version", &self.version)?,
            kind: anchored("kind", &self.kind)?,
            name: anchored("name", &self.name)?,
            namespace: anchored("namespace", &self.namespace)?,
            labels: LabelSelector::parse(&self.label_selector)?,
            annotations: LabelSelector::parse(&self.annotation_selector)?,
        })
    }
}

fn anchored(field: &'static str, pattern: &str) -> Result<Option<Regex>, SelectorError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!("^(?:{})$", pattern))
        .map(Some)
        .map_err(|e| SelectorError::Regex {
            field,
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

fn matches_or_unset(re: &Option<Regex>, value: &str) -> bool {
    re.as_ref().map_or(true, |re| re.is_match(value))
}

/// CompiledSelector is a [`Selector`] with its patterns and expressions parsed.
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    group: Option<Regex>,
    version: Option<Regex>,
    kind: Option<Regex>,
    name: Option<Regex>,
    namespace: Option<Regex>,
    labels: LabelSelector,
    annotations: LabelSelector,
}

impl CompiledSelector {
    pub fn match_gvk(&self, gvk: &Gvk) -> bool {
        matches_or_unset(&self.group, &gvk.group)
            && matches_or_unset(&self.version, &gvk.version)
            && matches_or_unset(&self.kind, &gvk.kind)
    }

    pub fn match_name(&self, name: &str) -> bool {
        matches_or_unset(&self.name, name)
    }

    pub fn match_namespace(&self, namespace: &str) -> bool {
        matches_or_unset(&self.namespace, namespace)
    }

    pub fn labels(&self) -> &LabelSelector {
        &self.labels
    }

    pub fn annotations(&self) -> &LabelSelector {
        &self.annotations
    }
}
