//! Resource type registry

use std::collections::HashMap;
use std::sync::Arc;

use lodestar_identity::IdentitySpec;
use lodestar_tags::SystemTags;

/// Static description of one resource type
#[derive(Debug, Clone)]
pub struct ResourceRegistration {
    /// Resource type name, e.g. `aws_vpc`
    pub type_name: String,
    /// Owning service, which selects the system tag filter
    pub service: String,
    pub identity: IdentitySpec,
    /// Whether the resource has `tags` and `tags_all` attributes
    pub tagged: bool,
}

impl ResourceRegistration {
    pub fn new(
        type_name: impl Into<String>,
        service: impl Into<String>,
        identity: IdentitySpec,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            service: service.into(),
            identity,
            tagged: false,
        }
    }

    pub fn tagged(mut self) -> Self {
        self.tagged = true;
        self
    }

    pub fn system_tags(&self) -> SystemTags {
        SystemTags::for_service(&self.service)
    }
}

/// Registered resource types, read-only once the provider is configured
#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: HashMap<String, Arc<ResourceRegistration>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: ResourceRegistration) {
        log::trace!("registering resource type {}", registration.type_name);
        self.resources
            .insert(registration.type_name.clone(), Arc::new(registration));
    }

    pub fn with(mut self, registration: ResourceRegistration) -> Self {
        self.register(registration);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<ResourceRegistration>> {
        self.resources.get(type_name).cloned()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let registry = Registry::new()
            .with(
                ResourceRegistration::new("aws_vpc", "ec2", IdentitySpec::regional_arn("arn"))
                    .tagged(),
            )
            .with(ResourceRegistration::new(
                "aws_db_instance",
                "rds",
                IdentitySpec::regional_single_parameter("identifier"),
            ));

        assert_eq!(registry.len(), 2);
        let mut names: Vec<&str> = registry.type_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["aws_db_instance", "aws_vpc"]);
        let vpc = registry.get("aws_vpc").unwrap();
        assert!(vpc.tagged);
        assert!(vpc.identity.is_arn());

        let db = registry.get("aws_db_instance").unwrap();
        assert!(!db.tagged);
        assert!(db.system_tags().matches("rds:owner"));
        assert!(registry.get("aws_subnet").is_none());
    }
}
