//! Parameterized identities
//!
//! Single parameter: the import ID is the parameter value. Multiple
//! parameters: the import ID is a composite of the values, handled by the
//! spec's [`ImportIdParser`](crate::composite::ImportIdParser).

use std::collections::BTreeMap;

use lodestar_core::provider::ClientContext;
use lodestar_core::resource::{ATTR_ACCOUNT_ID, ATTR_REGION};
use lodestar_core::schema::IdentityData;

use super::{
    ResolveInput, ResolvedAttributes, Source, check_region, identity_attribute, require_context,
    resolve_account, validate_identity,
};
use crate::composite::CompositeIdError;
use crate::error::IdentityResult;
use crate::spec::{IdentitySpec, Scope};

/// Resolve a single-parameter identity
pub fn resolve_single(
    spec: &IdentitySpec,
    attribute: &str,
    input: &ResolveInput<'_>,
) -> IdentityResult<ResolvedAttributes> {
    let context = require_context(input.context)?;

    let (value, identity) = match input.source {
        Source::Id(id) => {
            if id.is_empty() {
                return Err(CompositeIdError::EmptyPart {
                    id: String::new(),
                    expected: 1,
                    shape: attribute.to_string(),
                }
                .into());
            }
            (id, None)
        }
        Source::Identity(identity) => {
            validate_identity(spec, identity)?;
            (identity_attribute(identity, attribute)?, Some(identity))
        }
    };

    let mut resolved = ResolvedAttributes::new();
    resolved.insert(attribute, value);
    resolved.mirror(spec, value);
    finish(spec, resolved, identity, input.prior_region, context)
}

/// Resolve a multi-parameter identity
pub fn resolve_multiple(
    spec: &IdentitySpec,
    attributes: &[String],
    input: &ResolveInput<'_>,
) -> IdentityResult<ResolvedAttributes> {
    let context = require_context(input.context)?;
    let parser = spec.import_id_parser();

    let (id, values, identity) = match input.source {
        Source::Id(raw) => {
            let (id, values) = parser.parse(raw, attributes)?;
            (id, values, None)
        }
        Source::Identity(identity) => {
            validate_identity(spec, identity)?;
            let values = attributes
                .iter()
                .map(|name| -> IdentityResult<(String, String)> {
                    let value = identity_attribute(identity, name)?;
                    Ok((name.clone(), value.to_string()))
                })
                .collect::<IdentityResult<BTreeMap<_, _>>>()?;
            let id = parser.create(&values, attributes)?;
            (id, values, Some(identity))
        }
    };

    let mut resolved = ResolvedAttributes::new();
    for name in attributes {
        let value = values
            .get(name)
            .ok_or_else(|| CompositeIdError::MissingPart { name: name.clone() })?;
        resolved.insert(name.as_str(), value.as_str());
    }
    resolved.mirror(spec, &id);
    finish(spec, resolved, identity, input.prior_region, context)
}

/// Fill in account and region from the context and any identity overrides
fn finish(
    spec: &IdentitySpec,
    mut resolved: ResolvedAttributes,
    identity: Option<&IdentityData>,
    prior_region: Option<&str>,
    context: &dyn ClientContext,
) -> IdentityResult<ResolvedAttributes> {
    let supplied_account = identity.and_then(|i| i.get(ATTR_ACCOUNT_ID));
    resolved.account_id = Some(resolve_account(context, supplied_account)?);

    if spec.scope() == Scope::Regional {
        let region = match identity.and_then(|i| i.get(ATTR_REGION)) {
            Some(region) => {
                check_region("identity", prior_region, region)?;
                region
            }
            None => prior_region.unwrap_or_else(|| context.region()),
        };
        resolved.region = Some(region.to_string());
    }

    log::debug!(
        "resolved parameterized identity {:?} in region {:?}",
        resolved.attributes,
        resolved.region
    );
    Ok(resolved)
}
