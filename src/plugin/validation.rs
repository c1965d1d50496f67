use crate::yaml::{Node, NodeKind, API_VERSION_FIELD, KIND_FIELD, METADATA_FIELD, NAME_FIELD};
use std::fmt;
use thiserror::Error;

/// One problem found while checking a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("document must be a mapping, got {actual}")]
    NotAMapping { actual: NodeKind },

    #[error("missing required field {field:?}")]
    MissingField { field: String },

    #[error("field {field:?} must not be empty")]
    EmptyField { field: String },

    #[error("field {field:?} must be a {expected}, got {actual}")]
    WrongKind {
        field: String,
        expected: NodeKind,
        actual: NodeKind,
    },
}

impl ValidationError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField { field: field.into() }
    }

    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn wrong_kind(field: impl Into<String>, expected: NodeKind, actual: NodeKind) -> Self {
        ValidationError::WrongKind {
            field: field.into(),
            expected,
            actual,
        }
    }
}

/// Every problem found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks a document before the engine accepts it.
pub trait Validator {
    fn validate(&self, node: &Node) -> Result<(), ValidationErrors>;
}

/// Requires a mapping with non-empty scalar `apiVersion` and `kind`, and a
/// `metadata` mapping carrying a `name` when `metadata` is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataValidator;

impl Validator for MetadataValidator {
    fn validate(&self, node: &Node) -> Result<(), ValidationErrors> {
        let root = node.content();
        let Some(root) = root.as_mapping() else {
            return Err(ValidationError::NotAMapping {
                actual: root.kind(),
            }
            .into());
        };

        let mut errs = ValidationErrors::default();
        for field in [API_VERSION_FIELD, KIND_FIELD] {
            match root.get(field).map(Node::content) {
                None => errs.push(ValidationError::missing_field(field)),
                Some(Node::Scalar(s)) if s.text().is_empty() => {
                    errs.push(ValidationError::empty_field(field))
                }
                Some(Node::Scalar(_)) => {}
                Some(other) => {
                    errs.push(ValidationError::wrong_kind(field, NodeKind::Scalar, other.kind()))
                }
            }
        }

        match root.get(METADATA_FIELD).map(Node::content) {
            None => {}
            Some(Node::Mapping(meta)) => {
                if !meta.contains_key(NAME_FIELD) {
                    errs.push(ValidationError::missing_field("metadata.name"));
                }
            }
            Some(other) => errs.push(ValidationError::wrong_kind(
                METADATA_FIELD,
                NodeKind::Mapping,
                other.kind(),
            )),
        }
        errs.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn validate(yaml: &str) -> Result<(), ValidationErrors> {
        MetadataValidator.validate(&Node::from_yaml(yaml).unwrap())
    }

    #[test]
    fn test_accepts_resource_header() {
        assert!(validate("apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\n").is_ok());
        assert!(validate("apiVersion: v1\nkind: Pod\n").is_ok());
    }

    #[test]
    fn test_collects_every_problem() {
        let errs = validate("kind: ''\nmetadata:\n  labels: {}\n").unwrap_err();
        assert_eq!(
            errs.iter().cloned().collect::<Vec<_>>(),
            vec![
                ValidationError::missing_field("apiVersion"),
                ValidationError::empty_field("kind"),
                ValidationError::missing_field("metadata.name"),
            ]
        );
        assert_eq!(
            errs.to_string(),
            "missing required field \"apiVersion\"; field \"kind\" must not be empty; \
             missing required field \"metadata.name\""
        );
    }

    #[test]
    fn test_rejects_non_mapping_document() {
        let errs = validate("[1]").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs.iter().next(),
            Some(&ValidationError::NotAMapping {
                actual: NodeKind::Sequence
            })
        );
    }

    #[test]
    fn test_metadata_must_be_mapping() {
        let errs = validate("apiVersion: v1\nkind: Pod\nmetadata: web\n").unwrap_err();
        assert_eq!(
            errs.iter().next(),
            Some(&ValidationError::wrong_kind(
                "metadata",
                NodeKind::Mapping,
                NodeKind::Scalar
            ))
        );
    }
}
