//! Tag error types

use lodestar_core::diagnostics::{Diagnostic, ToDiagnostic};
use lodestar_core::resource::ATTR_TAGS;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Resource tags repeat the provider's default tags exactly
    #[error("the resource tags are identical to the provider default tags")]
    RedundantDefaultTags,

    /// The `tags` attribute is not a map of strings
    #[error("invalid tags: {0}")]
    InvalidTags(String),
}

impl ToDiagnostic for TagError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TagError::RedundantDefaultTags => Diagnostic::error(
                "Redundant Default Tags",
                "The resource tags are identical to those configured as default tags for the \
                 provider. Remove the tags from the resource, or change them so they differ \
                 from the defaults.",
            )
            .with_attribute(ATTR_TAGS),
            TagError::InvalidTags(detail) => Diagnostic::error(
                "Invalid Tags",
                format!("The tags attribute is invalid: {}", detail),
            )
            .with_attribute(ATTR_TAGS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_points_at_tags() {
        let diag = TagError::RedundantDefaultTags.to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(diag.summary, "Redundant Default Tags");
        assert_eq!(diag.attribute.as_deref(), Some("tags"));
    }

    #[test]
    fn invalid_tags_diagnostic() {
        let diag = TagError::InvalidTags("expected a map of strings, got list".to_string())
            .to_diagnostic();
        assert_eq!(diag.summary, "Invalid Tags");
        assert!(diag.detail.contains("got list"));
        assert_eq!(diag.attribute.as_deref(), Some("tags"));
    }
}
