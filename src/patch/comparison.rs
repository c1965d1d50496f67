//! Field-level differences between two documents.

use crate::yaml::{Node, Path, PathElement};
use std::collections::BTreeSet;
use std::fmt;

/// Paths that differ between a left and a right document.
///
/// A path lands in exactly one set. Empty sets mean equal documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Only on the left.
    pub removed: BTreeSet<Path>,
    pub modified: BTreeSet<Path>,
    /// Only on the right.
    pub added: BTreeSet<Path>,
}

impl Comparison {
    pub fn new() -> Self {
        Comparison::default()
    }

    pub fn is_same(&self) -> bool {
        !(self.has_removed() || self.has_modified() || self.has_added())
    }

    pub fn has_removed(&self) -> bool {
        !self.removed.is_empty()
    }

    pub fn has_modified(&self) -> bool {
        !self.modified.is_empty()
    }

    pub fn has_added(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Compares two documents field by field.
///
/// Mappings are compared per key and sequences per index; any other
/// difference marks the path as modified.
pub fn compare_nodes(lhs: &Node, rhs: &Node) -> Comparison {
    let mut comparison = Comparison::new();
    compare_values(lhs, rhs, Path::new(), &mut comparison);
    comparison
}

fn compare_values(lhs: &Node, rhs: &Node, path: Path, comparison: &mut Comparison) {
    match (lhs.content(), rhs.content()) {
        (Node::Mapping(l), Node::Mapping(r)) => {
            for (key, _) in l.iter() {
                if !r.contains_key(key) {
                    comparison
                        .removed
                        .insert(path.with(PathElement::field_name(key.clone())));
                }
            }
            for (key, rhs_val) in r.iter() {
                let field_path = path.with(PathElement::field_name(key.clone()));
                match l.get(key) {
                    None => {
                        comparison.added.insert(field_path);
                    }
                    Some(lhs_val) => compare_values(lhs_val, rhs_val, field_path, comparison),
                }
            }
        }
        (Node::Sequence(l), Node::Sequence(r)) => {
            for i in r.len()..l.len() {
                comparison.removed.insert(path.with(PathElement::index(i)));
            }
            for (i, rhs_item) in r.iter().enumerate() {
                let item_path = path.with(PathElement::index(i));
                match l.get(i) {
                    None => {
                        comparison.added.insert(item_path);
                    }
                    Some(lhs_item) => compare_values(lhs_item, rhs_item, item_path, comparison),
                }
            }
        }
        (l, r) => {
            if l != r {
                comparison.modified.insert(path);
            }
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = 0;
        for (title, paths) in [
            ("Modified Fields", &self.modified),
            ("Added Fields", &self.added),
            ("Removed Fields", &self.removed),
        ] {
            if paths.is_empty() {
                continue;
            }
            if sections > 0 {
                writeln!(f)?;
            }
            sections += 1;
            write!(f, "- {title}:")?;
            for path in paths {
                write!(f, "\n  {path}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identical_documents() {
        let node = Node::from_yaml("a: 1\nb: [x, y]\n").unwrap();
        assert!(compare_nodes(&node, &node.clone()).is_same());
    }

    #[test]
    fn test_paths_sorted_into_sets() {
        let lhs = Node::from_yaml("a: 1\nb: [x, y]\nc: gone\n").unwrap();
        let rhs = Node::from_yaml("a: 2\nb: [x]\nd: new\n").unwrap();
        let comp = compare_nodes(&lhs, &rhs);

        assert!(!comp.is_same());
        assert_eq!(comp.modified.iter().map(Path::to_string).collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(
            comp.removed.iter().map(Path::to_string).collect::<Vec<_>>(),
            vec!["b[1]", "c"]
        );
        assert_eq!(comp.added.iter().map(Path::to_string).collect::<Vec<_>>(), vec!["d"]);
    }

    #[test]
    fn test_report_lists_only_nonempty_sections() {
        let lhs = Node::from_yaml("data:\n  changed: '1'\n").unwrap();
        let rhs = Node::from_yaml("data:\n  changed: '2'\n  new: x\n").unwrap();

        assert_eq!(
            compare_nodes(&lhs, &rhs).to_string(),
            "- Modified Fields:\n  data.changed\n- Added Fields:\n  data.new"
        );
    }
}
