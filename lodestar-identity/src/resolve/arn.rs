//! ARN identities

use super::{
    ResolveInput, ResolvedAttributes, Source, check_region, identity_attribute, validate_identity,
};
use crate::arn::{Arn, ArnError};
use crate::error::{IdentityError, IdentityResult};
use crate::spec::{IdentitySpec, Scope};

/// Resolve an ARN identity
///
/// Account and region come from the ARN itself, so no client context is
/// consulted.
pub fn resolve(
    spec: &IdentitySpec,
    attribute: &str,
    input: &ResolveInput<'_>,
) -> IdentityResult<ResolvedAttributes> {
    let raw = match input.source {
        Source::Id(id) => id,
        Source::Identity(identity) => {
            validate_identity(spec, identity)?;
            identity_attribute(identity, attribute)?
        }
    };

    let arn: Arn = raw
        .parse()
        .map_err(|e| IdentityError::malformed_arn(raw, e))?;

    let mut resolved = ResolvedAttributes::new();
    resolved.insert(attribute, raw);
    resolved.mirror(spec, raw);
    if !arn.account_id.is_empty() {
        resolved.account_id = Some(arn.account_id.clone());
    }

    if spec.scope() == Scope::Regional {
        if arn.region.is_empty() {
            return Err(IdentityError::malformed_arn(raw, ArnError::MissingRegion));
        }
        check_region(raw, input.prior_region, &arn.region)?;
        resolved.region = Some(arn.region);
    }

    log::debug!("resolved ARN identity {}", raw);
    Ok(resolved)
}
