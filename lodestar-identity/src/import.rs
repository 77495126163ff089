//! Import dispatcher
//!
//! Routes an import request to the resolver for the spec's shape and turns
//! the outcome into a response: either a populated state and identity, or a
//! single error diagnostic with nothing else written.

use lodestar_core::diagnostics::Diagnostics;
use lodestar_core::provider::ClientContext;
use lodestar_core::resource::State;
use lodestar_core::schema::IdentityData;

use crate::error::IdentityResult;
use crate::resolve::{ResolveInput, ResolvedAttributes, Source, arn, parameterized, singleton};
use crate::spec::{IdentitySpec, Shape};

/// What the user imported by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// `import <id>`; empty for singletons
    Id(String),
    /// A structured identity object
    Identity(IdentityData),
}

/// Import request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub source: ImportSource,
    /// Region already fixed for the resource (state or per-resource config)
    pub prior_region: Option<String>,
}

impl ImportRequest {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            source: ImportSource::Id(id.into()),
            prior_region: None,
        }
    }

    pub fn by_identity(identity: IdentityData) -> Self {
        Self {
            source: ImportSource::Identity(identity),
            prior_region: None,
        }
    }

    /// Import a singleton, which takes no identifier
    pub fn singleton() -> Self {
        Self::by_id("")
    }

    pub fn with_prior_region(mut self, region: impl Into<String>) -> Self {
        self.prior_region = Some(region.into());
        self
    }
}

/// Import response
#[derive(Debug, Default)]
pub struct ImportResponse {
    pub state: State,
    pub identity: Option<IdentityData>,
    pub diagnostics: Diagnostics,
}

impl ImportResponse {
    pub fn is_success(&self) -> bool {
        !self.diagnostics.has_error()
    }
}

/// Resolve an import request against `spec`
pub fn resolve(
    spec: &IdentitySpec,
    request: &ImportRequest,
    context: Option<&dyn ClientContext>,
) -> IdentityResult<ResolvedAttributes> {
    let input = ResolveInput {
        source: match &request.source {
            ImportSource::Id(id) => Source::Id(id),
            ImportSource::Identity(identity) => Source::Identity(identity),
        },
        prior_region: request.prior_region.as_deref(),
        context,
    };

    log::debug!("resolving import of {:?} as {:?}", request.source, spec.shape());

    match spec.shape() {
        Shape::Singleton => singleton::resolve(spec, &input),
        Shape::Arn { attribute } => arn::resolve(spec, attribute, &input),
        Shape::SingleParameter { attribute } => {
            parameterized::resolve_single(spec, attribute, &input)
        }
        Shape::MultipleParameters { attributes } => {
            parameterized::resolve_multiple(spec, attributes, &input)
        }
    }
}

/// Import state for `spec`
///
/// On failure the response carries exactly one error diagnostic and an empty
/// state and identity.
pub fn import_state(
    spec: &IdentitySpec,
    request: &ImportRequest,
    context: Option<&dyn ClientContext>,
) -> ImportResponse {
    let mut response = ImportResponse::default();

    match resolve(spec, request, context) {
        Ok(resolved) => {
            response.state = resolved.to_state();
            response.identity = Some(resolved.to_identity(spec));
        }
        Err(err) => {
            log::debug!("import failed: {}", err);
            response.diagnostics.report(&err);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentityError;
    use lodestar_core::provider::StaticContext;
    use proptest::prelude::*;

    const ACCOUNT: &str = "123456789012";

    fn ctx() -> StaticContext {
        StaticContext::new(ACCOUNT, "us-west-2")
    }

    #[test]
    fn global_arn_import() {
        let spec = IdentitySpec::global_arn("arn").with_duplicate_attribute("id");
        let id = "arn:aws:svc::123456789012:res-abc";
        let response = import_state(&spec, &ImportRequest::by_id(id), None);

        assert!(response.is_success());
        assert_eq!(response.state.get_string("arn"), Some(id));
        assert_eq!(response.state.get_string("id"), Some(id));
        assert_eq!(response.state.region(), None);
        assert_eq!(
            response.identity.unwrap().get("arn"),
            Some("arn:aws:svc::123456789012:res-abc")
        );
    }

    #[test]
    fn regional_arn_region_mismatch_writes_nothing() {
        let spec = IdentitySpec::regional_arn("arn");
        let request =
            ImportRequest::by_id("arn:aws:svc:eu-1:123456789012:res-abc").with_prior_region("us-1");
        let response = import_state(&spec, &request, Some(&ctx()));

        assert!(!response.is_success());
        assert_eq!(response.diagnostics.len(), 1);
        let diag = response.diagnostics.first().unwrap();
        assert_eq!(diag.summary, "Invalid Resource Region");
        assert!(diag.detail.contains("eu-1"));
        assert!(diag.detail.contains("us-1"));
        assert!(response.state.is_empty());
        assert!(response.identity.is_none());
    }

    #[test]
    fn composite_id_import() {
        let spec = IdentitySpec::regional_parameterized(["p1", "p2"]);
        let ctx = ctx();

        let response = import_state(&spec, &ImportRequest::by_id("foo,bar"), Some(&ctx));
        assert!(response.is_success());
        assert_eq!(response.state.get_string("p1"), Some("foo"));
        assert_eq!(response.state.get_string("p2"), Some("bar"));

        let response = import_state(&spec, &ImportRequest::by_id("foo"), Some(&ctx));
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics.first().unwrap().summary,
            "Invalid Import ID"
        );
        assert!(response.state.is_empty());
    }

    #[test]
    fn parameterized_identity_is_complete() {
        let spec = IdentitySpec::regional_parameterized(["name", "type"]);
        let response = import_state(&spec, &ImportRequest::by_id("a_name,a_type"), Some(&ctx()));
        let identity = response.identity.unwrap();

        assert_eq!(identity.get("account_id"), Some(ACCOUNT));
        assert_eq!(identity.get("region"), Some("us-west-2"));
        assert_eq!(identity.get("name"), Some("a_name"));
        assert_eq!(identity.get("type"), Some("a_type"));
    }

    #[test]
    fn missing_context_is_a_provider_bug() {
        let spec = IdentitySpec::regional_singleton();
        let response = import_state(&spec, &ImportRequest::singleton(), None);
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics.first().unwrap().summary,
            "Unexpected Provider Error"
        );
    }

    #[test]
    fn arn_import_needs_no_context() {
        let spec = IdentitySpec::regional_arn("arn");
        let resolved = resolve(
            &spec,
            &ImportRequest::by_id("arn:aws:svc:eu-1:123456789012:res-abc"),
            None,
        )
        .unwrap();
        assert_eq!(resolved.region.as_deref(), Some("eu-1"));
    }

    #[test]
    fn unknown_identity_attribute() {
        let spec = IdentitySpec::global_single_parameter("name");
        let identity = IdentityData::new().with("name", "x").with("bogus", "y");
        let err = resolve(&spec, &ImportRequest::by_identity(identity), Some(&ctx())).unwrap_err();
        assert!(matches!(err, IdentityError::InvalidIdentity(_)));
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9-]{1,12}"
    }

    fn region() -> impl Strategy<Value = String> {
        "[a-z]{2}-[a-z]{4,9}-[1-3]"
    }

    proptest! {
        #[test]
        fn arn_id_and_identity_imports_agree(
            service in segment(),
            region in region(),
            resource in segment(),
        ) {
            let spec = IdentitySpec::regional_arn("arn").with_duplicate_attribute("id");
            let arn = format!("arn:aws:{service}:{region}:{ACCOUNT}:{resource}");

            let by_id = import_state(&spec, &ImportRequest::by_id(arn.clone()), None);
            let by_identity = import_state(
                &spec,
                &ImportRequest::by_identity(IdentityData::new().with("arn", arn.as_str())),
                None,
            );

            prop_assert!(by_id.is_success());
            prop_assert_eq!(by_id.state, by_identity.state);
            prop_assert_eq!(by_id.identity, by_identity.identity);
        }

        #[test]
        fn composite_id_and_identity_imports_agree(
            name in segment(),
            kind in segment(),
        ) {
            let spec = IdentitySpec::regional_parameterized(["name", "type"])
                .with_duplicate_attribute("id");
            let ctx = ctx();

            let request = ImportRequest::by_id(format!("{name},{kind}"));
            let by_id = import_state(&spec, &request, Some(&ctx));
            let identity = IdentityData::new()
                .with("name", name.as_str())
                .with("type", kind.as_str());
            let by_identity =
                import_state(&spec, &ImportRequest::by_identity(identity), Some(&ctx));

            prop_assert!(by_id.is_success());
            prop_assert_eq!(by_id.state, by_identity.state);
            prop_assert_eq!(by_id.identity, by_identity.identity);
        }

        #[test]
        fn arn_in_another_region_always_mismatches(
            arn_region in region(),
            prior in region(),
        ) {
            prop_assume!(arn_region != prior);
            let spec = IdentitySpec::regional_arn("arn");
            let arn = format!("arn:aws:svc:{arn_region}:{ACCOUNT}:res-abc");
            let err = resolve(&spec, &ImportRequest::by_id(arn).with_prior_region(prior), None)
                .unwrap_err();
            let is_mismatch = matches!(err, IdentityError::RegionMismatch { .. });
            prop_assert!(is_mismatch);
        }

        #[test]
        fn identity_in_another_region_always_mismatches(
            identity_region in region(),
            prior in region(),
        ) {
            prop_assume!(identity_region != prior);
            let spec = IdentitySpec::regional_single_parameter("name");
            let identity = IdentityData::new()
                .with("name", "a_name")
                .with("region", identity_region.as_str());
            let request = ImportRequest::by_identity(identity).with_prior_region(prior);
            let err = resolve(&spec, &request, Some(&ctx())).unwrap_err();
            let is_mismatch = matches!(err, IdentityError::RegionMismatch { .. });
            prop_assert!(is_mismatch);
        }
    }
}
