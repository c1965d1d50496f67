//! Strategic merge patch and deep overlay merge over document trees.

use super::error::PatchError;
use crate::yaml::{Mapping, Node, Path, PathElement};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Key carrying a patch directive inside a mapping.
pub const PATCH_DIRECTIVE: &str = "$patch";
pub const DIRECTIVE_DELETE: &str = "delete";
pub const DIRECTIVE_REPLACE: &str = "replace";
pub const DIRECTIVE_MERGE: &str = "merge";

const SET_ELEMENT_ORDER_PREFIX: &str = "$setElementOrder/";
const RETAIN_KEYS: &str = "$retainKeys";

/// Lists merged element-wise, keyed by the first listed field an element
/// carries. Lists not named here are replaced by the patch.
static MERGE_KEYS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let entries: [(&'static str, &'static [&'static str]); 12] = [
        ("containers", &["name"]),
        ("initContainers", &["name"]),
        ("ephemeralContainers", &["name"]),
        ("env", &["name"]),
        ("volumes", &["name"]),
        ("volumeMounts", &["mountPath"]),
        ("volumeDevices", &["devicePath"]),
        ("ports", &["containerPort", "port"]),
        ("imagePullSecrets", &["name"]),
        ("hostAliases", &["ip"]),
        ("topologySpreadConstraints", &["topologyKey"]),
        ("conditions", &["type"]),
    ];
    entries.into_iter().collect()
});

/// Returns the merge key candidates for a list field, if it is merged by key.
pub fn merge_keys(field: &str) -> Option<&'static [&'static str]> {
    MERGE_KEYS.get(field).copied()
}

/// Overlays `rhs` on `lhs`: mappings merge recursively, a null on the right
/// keeps the left, anything else takes the right.
pub fn merge_overlay(lhs: &Node, rhs: &Node) -> Node {
    if rhs.is_null() {
        return lhs.clone();
    }
    if lhs.is_null() {
        return rhs.clone();
    }
    match (lhs.content(), rhs.content()) {
        (Node::Mapping(l), Node::Mapping(r)) => {
            let mut result = l.clone();
            for (key, rhs_val) in r.iter() {
                let merged = match l.get(key) {
                    Some(lhs_val) => merge_overlay(lhs_val, rhs_val),
                    None => rhs_val.clone(),
                };
                result.set(key.clone(), merged);
            }
            Node::Mapping(result)
        }
        (_, r) => r.clone(),
    }
}

/// Applies a strategic merge patch to a target document.
///
/// A `null` field deletes the field. `$patch: delete` inside a mapping
/// deletes that mapping; at the root it deletes the whole document, in
/// which case `Ok(None)` is returned. `$patch: replace` replaces instead
/// of merging. Lists listed by [`merge_keys`] merge element-wise; other
/// lists are replaced unless they hold a `{$patch: replace}` marker, which
/// also replaces.
pub fn strategic_merge(target: &Node, patch: &Node) -> Result<Option<Node>, PatchError> {
    match (target.content(), patch.content()) {
        (Node::Mapping(t), Node::Mapping(p)) => {
            Ok(merge_mapping(t, p, &Path::new())?.map(Node::Mapping))
        }
        (_, Node::Mapping(p)) => match directive(p, &Path::new())? {
            Some(DIRECTIVE_DELETE) => Ok(None),
            _ => Ok(strip_directives(patch)),
        },
        (Node::Mapping(_), other) if !other.is_null() => Err(PatchError::NotAMapping {
            path: String::new(),
            actual: other.kind().to_string(),
        }),
        (_, other) if other.is_null() => Ok(Some(target.clone())),
        _ => Ok(strip_directives(patch)),
    }
}

fn directive<'a>(mapping: &'a Mapping, path: &Path) -> Result<Option<&'a str>, PatchError> {
    let Some(value) = mapping.get(PATCH_DIRECTIVE) else {
        return Ok(None);
    };
    let text = match value.as_scalar() {
        Some(scalar) => scalar.text(),
        None => return Err(PatchError::unknown_directive(path.to_string(), value.kind().to_string())),
    };
    match text.as_str() {
        DIRECTIVE_DELETE => Ok(Some(DIRECTIVE_DELETE)),
        DIRECTIVE_REPLACE => Ok(Some(DIRECTIVE_REPLACE)),
        DIRECTIVE_MERGE => Ok(Some(DIRECTIVE_MERGE)),
        _ => Err(PatchError::unknown_directive(path.to_string(), text)),
    }
}

fn is_directive_key(key: &str) -> bool {
    key == PATCH_DIRECTIVE || key == RETAIN_KEYS || key.starts_with(SET_ELEMENT_ORDER_PREFIX)
}

fn merge_mapping(
    target: &Mapping,
    patch: &Mapping,
    path: &Path,
) -> Result<Option<Mapping>, PatchError> {
    match directive(patch, path)? {
        Some(DIRECTIVE_DELETE) => return Ok(None),
        Some(DIRECTIVE_REPLACE) => return Ok(strip_mapping(patch)),
        _ => {}
    }

    let mut result = target.clone();
    for (key, patch_val) in patch.iter() {
        if is_directive_key(key) {
            continue;
        }
        let field_path = path.with(PathElement::field_name(key.clone()));
        if patch_val.is_null() {
            result.remove(key);
            continue;
        }
        let existing = target.get(key).map(Node::content);
        let merged = match (existing, patch_val.content()) {
            (Some(Node::Mapping(t)), Node::Mapping(p)) => {
                merge_mapping(t, p, &field_path)?.map(Node::Mapping)
            }
            (Some(Node::Sequence(t)), Node::Sequence(p)) => {
                Some(Node::Sequence(merge_list(key, t, p, &field_path)?))
            }
            (_, Node::Mapping(p)) => match directive(p, &field_path)? {
                Some(DIRECTIVE_DELETE) => None,
                _ => strip_directives(patch_val),
            },
            _ => strip_directives(patch_val),
        };
        match merged {
            Some(node) => result.set(key.clone(), node),
            None => {
                result.remove(key);
            }
        }
    }
    Ok(Some(result))
}

fn is_replace_marker(node: &Node) -> bool {
    node.as_mapping().is_some_and(|m| {
        m.len() == 1
            && m.get(PATCH_DIRECTIVE)
                .and_then(Node::as_scalar)
                .is_some_and(|s| s.text() == DIRECTIVE_REPLACE)
    })
}

fn merge_list(
    field: &str,
    target: &[Node],
    patch: &[Node],
    path: &Path,
) -> Result<Vec<Node>, PatchError> {
    if patch.iter().any(is_replace_marker) {
        return Ok(patch
            .iter()
            .filter(|n| !is_replace_marker(n))
            .filter_map(strip_directives)
            .collect());
    }
    let keys = match merge_keys(field) {
        Some(keys) if patch.iter().all(|n| n.as_mapping().is_some()) => keys,
        _ => return Ok(patch.iter().filter_map(strip_directives).collect()),
    };

    let mut result: Vec<Node> = target.to_vec();
    for (i, item) in patch.iter().enumerate() {
        let Some(item_map) = item.as_mapping() else {
            continue;
        };
        let item_path = path.with(PathElement::index(i));
        let position = element_key(item_map, keys).and_then(|(key, value)| {
            result.iter().position(|existing| {
                existing
                    .as_mapping()
                    .and_then(|m| m.get(key))
                    .is_some_and(|v| v.content() == value.content())
            })
        });
        match position {
            Some(pos) => {
                let merged = match result[pos].as_mapping() {
                    Some(existing) => merge_mapping(existing, item_map, &item_path)?,
                    None => strip_mapping(item_map),
                };
                match merged {
                    Some(m) => result[pos] = Node::Mapping(m),
                    None => {
                        result.remove(pos);
                    }
                }
            }
            None => {
                if directive(item_map, &item_path)? == Some(DIRECTIVE_DELETE) {
                    continue;
                }
                if let Some(m) = strip_mapping(item_map) {
                    result.push(Node::Mapping(m));
                }
            }
        }
    }
    Ok(result)
}

fn element_key<'a>(item: &'a Mapping, keys: &[&'static str]) -> Option<(&'static str, &'a Node)> {
    keys.iter()
        .find_map(|key| item.get(key).map(|value| (*key, value)))
}

/// Removes directive keys from new content. A mapping that asks for its own
/// deletion disappears.
fn strip_directives(node: &Node) -> Option<Node> {
    match node.content() {
        Node::Mapping(m) => strip_mapping(m).map(Node::Mapping),
        Node::Sequence(items) => Some(Node::Sequence(
            items
                .iter()
                .filter(|n| !is_replace_marker(n))
                .filter_map(strip_directives)
                .collect(),
        )),
        other => Some(other.clone()),
    }
}

fn strip_mapping(mapping: &Mapping) -> Option<Mapping> {
    let deleting = mapping
        .get(PATCH_DIRECTIVE)
        .and_then(Node::as_scalar)
        .is_some_and(|s| s.text() == DIRECTIVE_DELETE);
    if deleting {
        return None;
    }
    Some(
        mapping
            .iter()
            .filter(|(k, _)| !is_directive_key(k))
            .filter_map(|(k, v)| strip_directives(v).map(|v| (k.clone(), v)))
            .collect(),
    )
}
