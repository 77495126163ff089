//! Provider - Ambient client context and remote-call errors
//!
//! Every call runs under a client bound to one account, partition and region.
//! Resolvers read that context instead of calling the remote API themselves.

use crate::diagnostics::{Diagnostic, ToDiagnostic};
use crate::resource::ResourceId;

/// Error type for remote API operations
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    pub resource_id: Option<ResourceId>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// The remote object does not exist
    pub not_found: bool,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.resource_id {
            write!(f, "[{}.{}] {}", id.resource_type, id.name, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource_id: None,
            cause: None,
            not_found: false,
        }
    }

    /// The remote system reports that the object does not exist
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            not_found: true,
            ..Self::new(message)
        }
    }

    pub fn for_resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}

impl ToDiagnostic for ProviderError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut detail = self.to_string();
        if let Some(cause) = &self.cause {
            detail = format!("{}: {}", detail, cause);
        }
        Diagnostic::error("Remote API error", detail)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Account, partition and region of the client serving the current call
///
/// The region is the effective region for the call, so a per-resource region
/// override is already applied when a context is handed to a resolver.
pub trait ClientContext: Send + Sync {
    fn account_id(&self) -> &str;

    fn region(&self) -> &str;

    fn partition(&self) -> &str {
        "aws"
    }
}

/// Fixed client context, for callers that already know the values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticContext {
    pub account_id: String,
    pub region: String,
    pub partition: String,
}

impl StaticContext {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            partition: "aws".to_string(),
        }
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }

    /// Same account and partition, different effective region
    pub fn in_region(&self, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..self.clone()
        }
    }
}

impl ClientContext for StaticContext {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn partition(&self) -> &str {
        &self.partition
    }
}
