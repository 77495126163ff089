//! Singleton identities
//!
//! One instance per account (global) or per account and region (regional).
//! There is no identifier to parse; everything comes from the client
//! context, whose region already reflects any per-resource override.

use lodestar_core::resource::{ATTR_ACCOUNT_ID, ATTR_REGION};

use super::{
    ResolveInput, ResolvedAttributes, Source, check_region, require_context, resolve_account,
    validate_identity,
};
use crate::error::IdentityResult;
use crate::spec::{IdentitySpec, Scope};

pub fn resolve(
    spec: &IdentitySpec,
    input: &ResolveInput<'_>,
) -> IdentityResult<ResolvedAttributes> {
    let context = require_context(input.context)?;

    let identity = match input.source {
        Source::Id(_) => None,
        Source::Identity(identity) => {
            validate_identity(spec, identity)?;
            Some(identity)
        }
    };

    let mut resolved = ResolvedAttributes::new();
    let account_id = resolve_account(context, identity.and_then(|i| i.get(ATTR_ACCOUNT_ID)))?;

    match spec.scope() {
        Scope::Regional => {
            let region = context.region();
            if let Some(prior) = input.prior_region {
                check_region("the resource configuration", Some(region), prior)?;
            }
            if let Some(supplied) = identity.and_then(|i| i.get(ATTR_REGION)) {
                check_region("identity", Some(region), supplied)?;
            }
            resolved.mirror(spec, region);
            resolved.region = Some(region.to_string());
        }
        Scope::Global => resolved.mirror(spec, &account_id),
    }

    resolved.account_id = Some(account_id);
    log::debug!(
        "resolved singleton identity for account {:?} in region {:?}",
        resolved.account_id,
        resolved.region
    );
    Ok(resolved)
}
