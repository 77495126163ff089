//! Identity error types

use lodestar_core::diagnostics::{Diagnostic, ToDiagnostic};
use lodestar_core::schema::SchemaError;
use thiserror::Error;

use crate::arn::ArnError;
use crate::composite::CompositeIdError;

/// Errors that can occur while resolving an import identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The identifier is not a valid ARN
    #[error("invalid ARN {value:?}: {source}")]
    MalformedArn { value: String, source: ArnError },

    /// The identifier does not split into the declared parameters
    #[error(transparent)]
    MalformedCompositeId(#[from] CompositeIdError),

    /// The resolved region conflicts with a region that is already fixed
    #[error(
        "the region {actual:?} from {source_name} does not match the region {expected:?} \
         already set for this resource"
    )]
    RegionMismatch {
        /// Where the conflicting region came from (an ARN, "identity", ...)
        source_name: String,
        expected: String,
        actual: String,
    },

    /// An identity carries an account ID other than the client's
    #[error(
        "the account ID {actual:?} in the identity does not match the provider account ID \
         {expected:?}"
    )]
    AccountIdMismatch { expected: String, actual: String },

    /// The identity object does not fit the identity schema
    #[error(transparent)]
    InvalidIdentity(#[from] SchemaError),

    /// No client context was supplied for a resolver that needs one
    #[error("no client context is available to resolve the account ID and region")]
    MissingOperationContext,
}

impl IdentityError {
    pub fn malformed_arn(value: impl Into<String>, source: ArnError) -> Self {
        Self::MalformedArn {
            value: value.into(),
            source,
        }
    }

    pub fn region_mismatch(
        source_name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::RegionMismatch {
            source_name: source_name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl ToDiagnostic for IdentityError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            IdentityError::MalformedArn { value, source } => Diagnostic::error(
                "Invalid Import ID",
                format!(
                    "The import ID could not be parsed as an ARN.\n\nImport ID: {}\nError: {}",
                    value, source
                ),
            ),
            IdentityError::MalformedCompositeId(err) => {
                Diagnostic::error("Invalid Import ID", err.to_string())
            }
            IdentityError::RegionMismatch { .. } => {
                Diagnostic::error("Invalid Resource Region", self.to_string())
                    .with_attribute(lodestar_core::resource::ATTR_REGION)
            }
            IdentityError::AccountIdMismatch { .. } => {
                Diagnostic::error("Invalid Identity Account ID", self.to_string())
                    .with_attribute(lodestar_core::resource::ATTR_ACCOUNT_ID)
            }
            IdentityError::InvalidIdentity(err) => {
                let diag = Diagnostic::error("Invalid Identity", err.to_string());
                match err {
                    SchemaError::MissingRequired { name }
                    | SchemaError::UnknownAttribute { name } => diag.with_attribute(name.clone()),
                }
            }
            IdentityError::MissingOperationContext => Diagnostic::error(
                "Unexpected Provider Error",
                "This is always an error in the provider. Please report the following to the \
                 provider developer:\n\nThe client context needed to resolve the account ID and \
                 region was not configured for this call.",
            ),
        }
    }
}

/// Result type for identity resolution
pub type IdentityResult<T> = Result<T, IdentityError>;
