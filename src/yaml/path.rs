//! Field paths.
//!
//! A field path is a dot-separated list of field names where any segment may
//! carry one or more `[<digits>]` suffixes: `spec.containers[0].image`
//! tokenizes to `spec`, `containers`, `0`, `image`. A bracket suffix whose
//! content is not all digits stays part of the field name.

use std::fmt;

/// One step of a field path: a mapping key or a sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathElement {
    FieldName(String),
    Index(usize),
}

impl PathElement {
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }
}

/// Location of a field inside a document, from the root down.
///
/// Paths order element by element, which keeps [`Comparison`] output sorted
/// the way documents read.
///
/// [`Comparison`]: crate::patch::Comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    steps: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    /// Tokenizes a dotted path string.
    pub fn parse(path: &str) -> Self {
        let mut elements = Vec::new();
        for segment in path.split('.') {
            let (name, indices) = split_indices(segment);
            if !name.is_empty() || indices.is_empty() {
                elements.push(PathElement::field_name(name));
            }
            elements.extend(indices.into_iter().map(PathElement::Index));
        }
        Path { steps: elements }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.steps.iter()
    }

    pub fn push(&mut self, element: PathElement) {
        self.steps.push(element);
    }

    /// Copy of this path extended by one step.
    pub fn with(&self, element: PathElement) -> Self {
        let mut child = self.clone();
        child.steps.push(element);
        child
    }

    pub fn as_slice(&self) -> &[PathElement] {
        &self.steps
    }
}

/// Peels trailing `[<digits>]` groups off a segment.
fn split_indices(segment: &str) -> (&str, Vec<usize>) {
    let mut rest = segment;
    let mut indices = Vec::new();
    while let Some(stripped) = rest.strip_suffix(']') {
        let Some(open) = stripped.rfind('[') else {
            break;
        };
        let digits = &stripped[open + 1..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            break;
        }
        let Ok(index) = digits.parse::<usize>() else {
            break;
        };
        indices.push(index);
        rest = &stripped[..open];
    }
    indices.reverse();
    (rest, indices)
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Path::parse(path)
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.steps.iter().enumerate() {
            match element {
                PathElement::FieldName(name) if i == 0 => write!(f, "{}", name)?,
                PathElement::FieldName(name) => write!(f, ".{}", name)?,
                PathElement::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str) -> PathElement {
        PathElement::field_name(name)
    }

    #[test]
    fn test_parse_plain_fields() {
        assert_eq!(
            Path::parse("metadata.name").as_slice(),
            &[field("metadata"), field("name")]
        );
    }

    #[test]
    fn test_parse_indices() {
        assert_eq!(
            Path::parse("spec.template.spec.containers[0].image").as_slice(),
            &[
                field("spec"),
                field("template"),
                field("spec"),
                field("containers"),
                PathElement::Index(0),
                field("image"),
            ]
        );
        assert_eq!(
            Path::parse("matrix[1][12]").as_slice(),
            &[field("matrix"), PathElement::Index(1), PathElement::Index(12)]
        );
        assert_eq!(Path::parse("[3].name").as_slice(), &[PathElement::Index(3), field("name")]);
    }

    #[test]
    fn test_parse_non_numeric_brackets_stay_literal() {
        assert_eq!(Path::parse("a[x]").as_slice(), &[field("a[x]")]);
        assert_eq!(Path::parse("a[]").as_slice(), &[field("a[]")]);
        assert_eq!(
            Path::parse("a[x][2]").as_slice(),
            &[field("a[x]"), PathElement::Index(2)]
        );
    }

    #[test]
    fn test_display_matches_input() {
        let path = Path::parse("spec.containers[0].image");
        assert_eq!(path.to_string(), "spec.containers[0].image");
    }

    #[test]
    fn test_path_building() {
        let mut path = Path::new();
        assert!(path.is_empty());

        path.push(field("metadata"));
        path.push(field("name"));
        assert_eq!(path.len(), 2);
        assert_eq!(path.with(PathElement::index(1)).to_string(), "metadata.name[1]");
        assert_eq!(path.len(), 2);
    }
}
