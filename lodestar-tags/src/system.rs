//! System tags - Tags the remote system injects on its own
//!
//! These never round-trip into user configuration. Every service reserves
//! the `aws:` prefix; some services reserve more.

use std::collections::BTreeSet;

/// Prefix reserved by every service
pub const AWS_PREFIX: &str = "aws:";

const RDS_PREFIX: &str = "rds:";
const ELASTICBEANSTALK_PREFIX: &str = "elasticbeanstalk:";
const ELASTICBEANSTALK_NAME_KEY: &str = "Name";

/// Filter matching system tags by key prefix or exact key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemTags {
    prefixes: BTreeSet<String>,
    keys: BTreeSet<String>,
}

impl SystemTags {
    /// A filter that matches nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// The filter shared by every service
    pub fn aws() -> Self {
        Self::none().with_prefix(AWS_PREFIX)
    }

    /// The filter for tags reported by `service`
    pub fn for_service(service: &str) -> Self {
        match service {
            "rds" => Self::aws().with_prefix(RDS_PREFIX),
            "elasticbeanstalk" => Self::aws()
                .with_prefix(ELASTICBEANSTALK_PREFIX)
                .with_key(ELASTICBEANSTALK_NAME_KEY),
            _ => Self::aws(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    pub fn matches(&self, key: &str) -> bool {
        self.keys.contains(key) || self.prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}
