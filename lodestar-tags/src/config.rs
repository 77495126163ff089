//! Provider-wide tag configuration

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tags::KeyValueTags;

/// Tags applied to every resource the provider manages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultConfig {
    pub tags: KeyValueTags,
}

impl DefaultConfig {
    pub fn new(tags: KeyValueTags) -> Self {
        Self { tags }
    }

    /// Default tags overlaid with the resource's own tags
    pub fn merge_tags(&self, tags: &KeyValueTags) -> KeyValueTags {
        self.tags.merge(tags)
    }

    /// Whether `tags` is exactly the default set
    pub fn tags_equal(&self, tags: &KeyValueTags) -> bool {
        self.tags == *tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Tag keys the provider never surfaces, by exact key or key prefix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    pub keys: BTreeSet<String>,
    pub key_prefixes: BTreeSet<String>,
}

impl IgnoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefixes.insert(prefix.into());
        self
    }

    pub fn matches(&self, key: &str) -> bool {
        self.keys.contains(key) || self.key_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.key_prefixes.is_empty()
    }
}
