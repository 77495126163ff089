//! Resource handler - Import, plan and read for one resource type
//!
//! Tag reconciliation after a read runs as an interceptor. The discovered
//! tags travel in the [`ReadCall`] value, never in shared state.

use std::sync::Arc;

use lodestar_core::diagnostics::{Diagnostic, Diagnostics, ToDiagnostic};
use lodestar_core::interceptor::{Interceptor, Interceptors};
use lodestar_core::provider::{ClientContext, ProviderError, ProviderResult};
use lodestar_core::resource::{ATTR_REGION, ATTR_TAGS, ATTR_TAGS_ALL, ResourceId, State};
use lodestar_identity::{ImportRequest, ImportResponse, import_state};
use lodestar_tags::{
    KeyValueTags, SystemTags, TagsValue, compute_plan_tags, reconcile_read_tags,
    reconcile_refreshed_tags,
};

use crate::config::ProviderConfig;
use crate::registry::ResourceRegistration;
use crate::remote::{RemoteApi, RemoteObject};

/// Data passed through the interceptors of a read
#[derive(Debug, Clone, Default)]
pub struct ReadCall {
    /// Prior state before the remote read, new state after it
    pub state: State,
    /// Tags from the resource configuration, when the caller has it
    pub configured_tags: Option<KeyValueTags>,
    /// `tags` of the prior state
    pub prior_tags: KeyValueTags,
    /// Tags reported by the remote system, once read
    pub discovered_tags: Option<KeyValueTags>,
}

impl ReadCall {
    pub fn new(prior: &State) -> Self {
        Self {
            state: prior.clone(),
            ..Self::default()
        }
    }

    pub fn with_configured_tags(mut self, tags: KeyValueTags) -> Self {
        self.configured_tags = Some(tags);
        self
    }
}

/// Result of a read
#[derive(Debug, Default)]
pub struct ReadResponse {
    /// `None` when the resource no longer exists and must leave the state
    pub state: Option<State>,
    pub diagnostics: Diagnostics,
}

/// Result of plan modification
#[derive(Debug, Default)]
pub struct PlanResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

/// Writes `tags` and `tags_all` after a read
pub struct TagsInterceptor {
    config: Arc<ProviderConfig>,
    system: SystemTags,
}

impl TagsInterceptor {
    pub fn new(config: Arc<ProviderConfig>, system: SystemTags) -> Self {
        Self { config, system }
    }
}

impl Interceptor<ReadCall> for TagsInterceptor {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn before(&self, call: &mut ReadCall, _diags: &mut Diagnostics) {
        call.prior_tags = call
            .state
            .get(ATTR_TAGS)
            .and_then(KeyValueTags::from_value)
            .unwrap_or_default();
    }

    fn after(&self, call: &mut ReadCall, _diags: &mut Diagnostics) {
        let Some(discovered) = call.discovered_tags.take() else {
            return;
        };

        let (defaults, ignore) = (&self.config.default_tags, &self.config.ignore_tags);
        let reconciled = match &call.configured_tags {
            Some(configured) => {
                reconcile_read_tags(&discovered, configured, defaults, ignore, &self.system)
            }
            None => reconcile_refreshed_tags(
                &discovered,
                &call.prior_tags,
                defaults,
                ignore,
                &self.system,
            ),
        };
        call.state.set(ATTR_TAGS, reconciled.tags.to_value());
        call.state.set(ATTR_TAGS_ALL, reconciled.tags_all.to_value());
    }
}

/// Handles requests for one resource type
pub struct ResourceHandler {
    registration: Arc<ResourceRegistration>,
    config: Arc<ProviderConfig>,
    context: Option<Arc<dyn ClientContext>>,
    remote: Arc<dyn RemoteApi>,
    interceptors: Interceptors<ReadCall>,
}

impl ResourceHandler {
    pub fn new(
        registration: Arc<ResourceRegistration>,
        config: Arc<ProviderConfig>,
        remote: Arc<dyn RemoteApi>,
    ) -> Self {
        let mut interceptors = Interceptors::new();
        if registration.tagged {
            interceptors.push(TagsInterceptor::new(
                config.clone(),
                registration.system_tags(),
            ));
        }

        Self {
            registration,
            config,
            context: None,
            remote,
            interceptors,
        }
    }

    pub fn with_context(mut self, context: Arc<dyn ClientContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Add an interceptor; it runs inside every interceptor added before it
    pub fn with_interceptor(mut self, interceptor: impl Interceptor<ReadCall> + 'static) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn registration(&self) -> &ResourceRegistration {
        &self.registration
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Resolve an import request into state and identity
    pub fn import_state(&self, request: &ImportRequest) -> ImportResponse {
        log::debug!("importing {}", self.registration.type_name);
        import_state(&self.registration.identity, request, self.context.as_deref())
    }

    /// Import, then read the imported object
    ///
    /// Unlike a plain read, a missing remote object is an error here.
    pub async fn import_and_read(&self, request: &ImportRequest) -> ImportResponse {
        let mut response = self.import_state(request);
        if !response.is_success() {
            return response;
        }

        match self.read_remote(ReadCall::new(&response.state)).await {
            Ok(read) => {
                response.diagnostics.extend(read.diagnostics);
                if response.diagnostics.has_error() {
                    response.state = State::new();
                    response.identity = None;
                } else if let Some(state) = read.state {
                    response.state = state;
                }
                response
            }
            Err(err) if err.is_not_found() => {
                log::debug!(
                    "import of {} found no remote object: {}",
                    self.registration.type_name,
                    err
                );
                ImportResponse {
                    diagnostics: Diagnostic::error(
                        "Cannot import non-existent remote object",
                        format!(
                            "While attempting to import an existing object to {}, the provider \
                             detected that no object exists with the given id. Only pre-existing \
                             objects can be imported; check that the id is correct and that it \
                             is associated with the provider's configured region or endpoint.",
                            self.registration.type_name
                        ),
                    )
                    .into(),
                    ..ImportResponse::default()
                }
            }
            Err(err) => ImportResponse {
                diagnostics: err.to_diagnostic().into(),
                ..ImportResponse::default()
            },
        }
    }

    // =========================================================================
    // Plan
    // =========================================================================

    /// Fill in computed attributes of a planned state
    pub fn modify_plan(&self, planned: &State) -> PlanResponse {
        let mut response = PlanResponse {
            state: planned.clone(),
            diagnostics: Diagnostics::new(),
        };

        if !self.registration.identity.is_global_resource()
            && planned.region().is_none()
            && let Some(context) = &self.context
        {
            response.state.set_string(ATTR_REGION, context.region());
        }

        if self.registration.tagged {
            let planned_tags =
                TagsValue::from_value(planned.get(ATTR_TAGS)).and_then(|configured| {
                    compute_plan_tags(
                        &configured,
                        &self.config.default_tags,
                        &self.config.ignore_tags,
                    )
                });
            match planned_tags {
                Ok(tags_all) => response.state.set(ATTR_TAGS_ALL, tags_all.to_value()),
                Err(err) => response.diagnostics.report(&err),
            }
        }

        response
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Refresh a resource from the remote system
    ///
    /// A missing remote object removes the resource from state with a
    /// warning. Other failures keep the prior state. Without the resource
    /// configuration, prior `tags` still carried by the remote object are
    /// kept as configured.
    pub async fn read(&self, prior: &State) -> ReadResponse {
        self.read_call(ReadCall::new(prior)).await
    }

    /// Refresh a resource whose configured tags are known
    pub async fn read_with_config(
        &self,
        prior: &State,
        configured: &KeyValueTags,
    ) -> ReadResponse {
        self.read_call(ReadCall::new(prior).with_configured_tags(configured.clone())).await
    }

    async fn read_call(&self, call: ReadCall) -> ReadResponse {
        let prior = call.state.clone();
        match self.read_remote(call).await {
            Ok(response) => response,
            Err(err) if err.is_not_found() => {
                log::warn!("{}, removing from state", err);
                ReadResponse {
                    state: None,
                    diagnostics: Diagnostic::warning(
                        "Resource not found",
                        format!("{}. The resource will be removed from state.", err),
                    )
                    .into(),
                }
            }
            Err(err) => ReadResponse {
                state: Some(prior),
                diagnostics: err.to_diagnostic().into(),
            },
        }
    }

    async fn read_remote(&self, mut call: ReadCall) -> ProviderResult<ReadResponse> {
        let prior = call.state.clone();
        let mut diagnostics = Diagnostics::new();

        if !self.interceptors.run_before(&mut call, &mut diagnostics) {
            return Ok(ReadResponse {
                state: Some(prior),
                diagnostics,
            });
        }

        let remote = self
            .remote
            .read(&prior)
            .await
            .map_err(|e| self.annotate(e, &prior))?;
        self.apply_remote(&mut call, &prior, remote);

        self.interceptors.run_after(&mut call, &mut diagnostics);
        let state = if diagnostics.has_error() {
            prior
        } else {
            call.state
        };

        Ok(ReadResponse {
            state: Some(state),
            diagnostics,
        })
    }

    fn apply_remote(&self, call: &mut ReadCall, prior: &State, remote: RemoteObject) {
        call.state = remote.state;
        if !self.registration.identity.is_global_resource()
            && call.state.region().is_none()
            && let Some(region) = prior.region()
        {
            call.state.set_string(ATTR_REGION, region);
        }
        if self.registration.tagged {
            call.discovered_tags = Some(remote.tags);
        }
    }

    fn annotate(&self, err: ProviderError, state: &State) -> ProviderError {
        let name = state.get_string("id").unwrap_or_default();
        err.for_resource(ResourceId::new(self.registration.type_name.as_str(), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lodestar_core::provider::StaticContext;
    use lodestar_core::resource::Value;
    use lodestar_identity::IdentitySpec;
    use lodestar_tags::DefaultConfig;

    const ARN: &str = "arn:aws:ec2:eu-west-1:123456789012:vpc/vpc-0abc";

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    enum FakeRemote {
        Found(KeyValueTags),
        NotFound,
        Broken,
    }

    #[async_trait]
    impl RemoteApi for FakeRemote {
        async fn read(&self, state: &State) -> ProviderResult<RemoteObject> {
            match self {
                FakeRemote::Found(tags) => {
                    let arn = state.get_string("arn").unwrap_or_default();
                    let remote = State::new()
                        .with_attribute("arn", Value::string(arn))
                        .with_attribute("id", Value::string("vpc-0abc"))
                        .with_attribute("cidr_block", Value::string("10.0.0.0/16"));
                    Ok(RemoteObject::new(remote).with_tags(tags.clone()))
                }
                FakeRemote::NotFound => Err(ProviderError::not_found("VPC vpc-0abc not found")),
                FakeRemote::Broken => Err(ProviderError::new("throttled")),
            }
        }
    }

    fn handler(remote: FakeRemote) -> ResourceHandler {
        let config = ProviderConfig {
            default_tags: DefaultConfig::new(KeyValueTags::from([("env", "prod")])),
            ..ProviderConfig::default()
        };
        let registration = ResourceRegistration::new(
            "aws_vpc",
            "ec2",
            IdentitySpec::regional_arn("arn").with_duplicate_attribute("id"),
        )
        .tagged();

        ResourceHandler::new(Arc::new(registration), Arc::new(config), Arc::new(remote))
            .with_context(Arc::new(StaticContext::new("123456789012", "eu-west-1")))
    }

    fn prior_state(tags: &[(&str, &str)]) -> State {
        State::new()
            .with_attribute("arn", Value::string(ARN))
            .with_attribute("region", Value::string("eu-west-1"))
            .with_attribute(ATTR_TAGS, Value::string_map(tags.iter().copied()))
    }

    #[tokio::test]
    async fn read_reconciles_tags() {
        init_logger();
        let handler = handler(FakeRemote::Found(KeyValueTags::from([
            ("env", "prod"),
            ("team", "core"),
            ("aws:cloudformation:stack-name", "net"),
        ])));

        let response = handler.read(&prior_state(&[("team", "core")])).await;
        assert!(response.diagnostics.is_empty());

        let state = response.state.unwrap();
        assert_eq!(state.get_string("cidr_block"), Some("10.0.0.0/16"));
        assert_eq!(state.region(), Some("eu-west-1"));
        assert_eq!(
            state.get(ATTR_TAGS),
            Some(&Value::string_map([("team", "core")]))
        );
        assert_eq!(
            state.get(ATTR_TAGS_ALL),
            Some(&Value::string_map([("env", "prod"), ("team", "core")]))
        );
    }

    #[tokio::test]
    async fn read_not_found_removes_with_warning() {
        init_logger();
        let handler = handler(FakeRemote::NotFound);
        let response = handler.read(&prior_state(&[])).await;

        assert!(response.state.is_none());
        assert!(!response.diagnostics.has_error());
        assert_eq!(response.diagnostics.warnings().count(), 1);
    }

    #[tokio::test]
    async fn read_failure_keeps_prior_state() {
        init_logger();
        let handler = handler(FakeRemote::Broken);
        let prior = prior_state(&[]);
        let response = handler.read(&prior).await;

        assert!(response.diagnostics.has_error());
        assert_eq!(response.state, Some(prior));
    }

    #[tokio::test]
    async fn import_of_missing_object_fails() {
        init_logger();
        let handler = handler(FakeRemote::NotFound);
        let response = handler.import_and_read(&ImportRequest::by_id(ARN)).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics.first().unwrap().summary,
            "Cannot import non-existent remote object"
        );
        assert!(response.state.is_empty());
        assert!(response.identity.is_none());
    }

    #[tokio::test]
    async fn import_and_read_fills_state() {
        init_logger();
        let handler = handler(FakeRemote::Found(KeyValueTags::from([
            ("env", "prod"),
            ("owner", "ops"),
        ])));
        let response = handler.import_and_read(&ImportRequest::by_id(ARN)).await;

        assert!(response.is_success());
        assert_eq!(response.state.get_string("arn"), Some(ARN));
        assert_eq!(response.state.region(), Some("eu-west-1"));
        assert_eq!(
            response.state.get(ATTR_TAGS),
            Some(&Value::string_map([("owner", "ops")]))
        );
        assert_eq!(response.identity.unwrap().get("arn"), Some(ARN));
    }

    #[test]
    fn modify_plan_computes_tags_all() {
        let handler = handler(FakeRemote::NotFound);
        let planned = State::new().with_attribute(ATTR_TAGS, Value::string_map([("team", "core")]));
        let response = handler.modify_plan(&planned);

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.state.region(), Some("eu-west-1"));
        assert_eq!(
            response.state.get(ATTR_TAGS_ALL),
            Some(&Value::string_map([("env", "prod"), ("team", "core")]))
        );
    }

    #[test]
    fn modify_plan_rejects_redundant_tags() {
        let handler = handler(FakeRemote::NotFound);
        let planned = State::new().with_attribute(ATTR_TAGS, Value::string_map([("env", "prod")]));
        let response = handler.modify_plan(&planned);

        assert!(response.diagnostics.has_error());
        assert_eq!(
            response.diagnostics.first().unwrap().summary,
            "Redundant Default Tags"
        );
    }

    #[test]
    fn modify_plan_keeps_unknown_tags_unknown() {
        let handler = handler(FakeRemote::NotFound);
        let planned = State::new().with_attribute(ATTR_TAGS, Value::Unknown);
        let response = handler.modify_plan(&planned);
        assert_eq!(response.state.get(ATTR_TAGS_ALL), Some(&Value::Unknown));
    }

    #[test]
    fn modify_plan_with_partially_unknown_tags() {
        let handler = handler(FakeRemote::NotFound);
        let tags = Value::Map(
            [
                ("env".to_string(), Value::string("prod")),
                ("owner".to_string(), Value::Unknown),
            ]
            .into_iter()
            .collect(),
        );
        let response = handler.modify_plan(&State::new().with_attribute(ATTR_TAGS, tags));

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.state.get(ATTR_TAGS_ALL), Some(&Value::Unknown));
    }

    #[test]
    fn modify_plan_rejects_non_map_tags() {
        let handler = handler(FakeRemote::NotFound);
        let planned = State::new().with_attribute(ATTR_TAGS, Value::string("env=prod"));
        let response = handler.modify_plan(&planned);

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics.first().unwrap().summary, "Invalid Tags");
        assert_eq!(response.state.get(ATTR_TAGS_ALL), None);
    }

    #[tokio::test]
    async fn tag_removed_out_of_band_leaves_tags_on_next_read() {
        init_logger();
        let first = handler(FakeRemote::Found(KeyValueTags::from([
            ("team", "core"),
            ("owner", "ops"),
        ])))
        .read(&prior_state(&[("team", "core")]))
        .await
        .state
        .unwrap();
        assert_eq!(
            first.get(ATTR_TAGS),
            Some(&Value::string_map([("owner", "ops"), ("team", "core")]))
        );

        let second = handler(FakeRemote::Found(KeyValueTags::from([("team", "core")])))
            .read(&first)
            .await
            .state
            .unwrap();
        assert_eq!(
            second.get(ATTR_TAGS),
            Some(&Value::string_map([("team", "core")]))
        );
        assert_eq!(
            second.get(ATTR_TAGS_ALL),
            Some(&Value::string_map([("team", "core")]))
        );
    }

    #[tokio::test]
    async fn read_with_config_keeps_configured_tags() {
        init_logger();
        let handler = handler(FakeRemote::Found(KeyValueTags::from([("owner", "ops")])));
        let configured = KeyValueTags::from([("team", "core")]);
        let state = handler
            .read_with_config(&prior_state(&[("owner", "ops")]), &configured)
            .await
            .state
            .unwrap();

        assert_eq!(
            state.get(ATTR_TAGS),
            Some(&Value::string_map([("owner", "ops"), ("team", "core")]))
        );
        assert_eq!(
            state.get(ATTR_TAGS_ALL),
            Some(&Value::string_map([("owner", "ops")]))
        );
    }

    struct Veto;

    impl Interceptor<ReadCall> for Veto {
        fn name(&self) -> &'static str {
            "veto"
        }

        fn before(&self, _call: &mut ReadCall, diags: &mut Diagnostics) {
            diags.add_error("Read blocked", "vetoed before the remote call");
        }
    }

    #[tokio::test]
    async fn failing_before_hook_skips_the_remote_read() {
        init_logger();
        let handler = handler(FakeRemote::NotFound).with_interceptor(Veto);
        let prior = prior_state(&[]);
        let response = handler.read(&prior).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics.first().unwrap().summary, "Read blocked");
        assert_eq!(response.state, Some(prior));
    }
}
