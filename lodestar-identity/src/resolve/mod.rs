//! Resolvers - ARN, parameterized and singleton identity resolution
//!
//! Each resolver returns either a fully resolved set of attributes or exactly
//! one error. Nothing is written to a response here; the import dispatcher
//! does that once resolution has succeeded.

pub mod arn;
pub mod parameterized;
pub mod singleton;

use std::collections::BTreeMap;

use lodestar_core::provider::ClientContext;
use lodestar_core::resource::{ATTR_ACCOUNT_ID, ATTR_REGION, State};
use lodestar_core::schema::{IdentityData, SchemaError};

use crate::error::{IdentityError, IdentityResult};
use crate::spec::IdentitySpec;

/// Where the identifier comes from
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// A raw import ID string (empty for singletons)
    Id(&'a str),
    /// A structured identity object
    Identity(&'a IdentityData),
}

/// Inputs shared by every resolver
#[derive(Clone, Copy)]
pub struct ResolveInput<'a> {
    pub source: Source<'a>,
    /// Region already fixed in state or configuration
    pub prior_region: Option<&'a str>,
    pub context: Option<&'a dyn ClientContext>,
}

/// Result of a successful resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAttributes {
    pub attributes: BTreeMap<String, String>,
    pub region: Option<String>,
    pub account_id: Option<String>,
}

impl ResolvedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Write `value` to every duplicate attribute of `spec`
    pub(crate) fn mirror(&mut self, spec: &IdentitySpec, value: &str) {
        for name in spec.duplicate_attributes() {
            self.insert(name.as_str(), value);
        }
    }

    /// Resource state holding the resolved attributes and region
    pub fn to_state(&self) -> State {
        let mut state = State::new();
        for (name, value) in &self.attributes {
            state.set_string(name.as_str(), value.as_str());
        }
        if let Some(region) = &self.region {
            state.set_string(ATTR_REGION, region.as_str());
        }
        state
    }

    /// Identity object shaped by the spec's identity schema
    pub fn to_identity(&self, spec: &IdentitySpec) -> IdentityData {
        let mut identity = IdentityData::new();
        for attr in spec.attributes() {
            let value = match attr.name.as_str() {
                ATTR_ACCOUNT_ID => self.account_id.as_deref(),
                ATTR_REGION => self.region.as_deref(),
                name => self.get(name),
            };
            if let Some(value) = value {
                identity.set(attr.name.as_str(), value);
            }
        }
        identity
    }
}

pub(crate) fn require_context<'a>(
    context: Option<&'a dyn ClientContext>,
) -> IdentityResult<&'a dyn ClientContext> {
    context.ok_or(IdentityError::MissingOperationContext)
}

/// Check an identity object against the spec's schema
pub(crate) fn validate_identity(
    spec: &IdentitySpec,
    identity: &IdentityData,
) -> IdentityResult<()> {
    spec.schema()
        .validate(identity)
        .map_err(|errors| match errors.into_iter().next() {
            Some(err) => IdentityError::InvalidIdentity(err),
            None => IdentityError::InvalidIdentity(SchemaError::MissingRequired {
                name: String::new(),
            }),
        })
}

/// Required attribute of an already validated identity
pub(crate) fn identity_attribute<'a>(
    identity: &'a IdentityData,
    name: &str,
) -> IdentityResult<&'a str> {
    identity.get(name).ok_or_else(|| {
        IdentityError::InvalidIdentity(SchemaError::MissingRequired {
            name: name.to_string(),
        })
    })
}

/// Resolve the account ID, checking any account supplied in an identity
pub(crate) fn resolve_account(
    context: &dyn ClientContext,
    supplied: Option<&str>,
) -> IdentityResult<String> {
    let account_id = context.account_id();
    match supplied {
        Some(supplied) if supplied != account_id => Err(IdentityError::AccountIdMismatch {
            expected: account_id.to_string(),
            actual: supplied.to_string(),
        }),
        _ => Ok(account_id.to_string()),
    }
}

/// Fail if `found` conflicts with a region already fixed for the resource
pub(crate) fn check_region(
    source_name: &str,
    fixed: Option<&str>,
    found: &str,
) -> IdentityResult<()> {
    match fixed {
        Some(fixed) if fixed != found => {
            Err(IdentityError::region_mismatch(source_name, fixed, found))
        }
        _ => Ok(()),
    }
}
