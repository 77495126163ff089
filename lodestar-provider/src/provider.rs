//! Provider - Configuration, client context and registered resource types

use std::sync::Arc;

use lodestar_core::provider::ClientContext;

use crate::config::ProviderConfig;
use crate::context::AwsClientContext;
use crate::error::ConfigResult;
use crate::handler::ResourceHandler;
use crate::registry::Registry;
use crate::remote::RemoteApi;

/// A configured provider
pub struct Provider {
    config: Arc<ProviderConfig>,
    registry: Registry,
    context: Option<Arc<dyn ClientContext>>,
}

impl Provider {
    /// Provider without a client context; only ARN imports can resolve
    pub fn new(config: ProviderConfig, registry: Registry) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            context: None,
        }
    }

    /// Merge the environment into `config` and load the AWS client context
    pub async fn configure(config: ProviderConfig, registry: Registry) -> ConfigResult<Self> {
        let config = config.with_process_env();
        let context = AwsClientContext::load(&config).await?;
        Ok(Self::new(config, registry).with_context(Arc::new(context)))
    }

    pub fn with_context(mut self, context: Arc<dyn ClientContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handler for `type_name`, reading through `remote`
    pub fn handler(&self, type_name: &str, remote: Arc<dyn RemoteApi>) -> Option<ResourceHandler> {
        let registration = self.registry.get(type_name)?;
        let handler = ResourceHandler::new(registration, self.config.clone(), remote);
        Some(match &self.context {
            Some(context) => handler.with_context(context.clone()),
            None => handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lodestar_core::provider::{ProviderError, ProviderResult, StaticContext};
    use lodestar_core::resource::State;
    use lodestar_identity::{IdentitySpec, ImportRequest};

    use crate::registry::ResourceRegistration;
    use crate::remote::RemoteObject;

    struct Unreachable;

    #[async_trait]
    impl RemoteApi for Unreachable {
        async fn read(&self, _state: &State) -> ProviderResult<RemoteObject> {
            Err(ProviderError::new("unreachable"))
        }
    }

    fn registry() -> Registry {
        Registry::new().with(ResourceRegistration::new(
            "aws_ebs_encryption_by_default",
            "ec2",
            IdentitySpec::regional_singleton().with_duplicate_attribute("id"),
        ))
    }

    #[test]
    fn handler_uses_provider_context() {
        let provider = Provider::new(ProviderConfig::default(), registry())
            .with_context(Arc::new(StaticContext::new("123456789012", "ap-northeast-1")));

        let handler = provider
            .handler("aws_ebs_encryption_by_default", Arc::new(Unreachable))
            .unwrap();
        let response = handler.import_state(&ImportRequest::singleton());

        assert!(response.is_success());
        assert_eq!(response.state.get_string("id"), Some("ap-northeast-1"));
        assert_eq!(response.state.region(), Some("ap-northeast-1"));
    }

    #[test]
    fn singleton_import_without_context_fails() {
        let provider = Provider::new(ProviderConfig::default(), registry());
        let handler = provider
            .handler("aws_ebs_encryption_by_default", Arc::new(Unreachable))
            .unwrap();
        let response = handler.import_state(&ImportRequest::singleton());

        assert!(response.diagnostics.has_error());
        assert!(response.state.is_empty());
    }

    #[test]
    fn unknown_resource_type() {
        let provider = Provider::new(ProviderConfig::default(), registry());
        assert!(provider.handler("aws_vpc", Arc::new(Unreachable)).is_none());
    }
}
