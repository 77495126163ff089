//! Provider configuration
//!
//! Read from JSON and merged with the environment:
//!
//! ```json
//! {
//!   "region": "aws.Region.eu_west_1",
//!   "default_tags": { "tags": { "env": "prod" } },
//!   "ignore_tags": { "keys": ["CostCenter"], "key_prefixes": ["kubernetes.io/"] }
//! }
//! ```
//!
//! Default tags may also come from `LODESTAR_DEFAULT_TAGS_<key>` variables;
//! a key set in the configuration wins over the environment. Ignored keys and
//! prefixes from `LODESTAR_IGNORE_TAGS_KEYS` and
//! `LODESTAR_IGNORE_TAGS_KEY_PREFIXES` (comma separated) are added to the
//! configured ones.

use std::path::Path;

use lodestar_tags::{DefaultConfig, IgnoreConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::utils::{is_valid_region, normalize_region};

pub const ENV_DEFAULT_TAGS_PREFIX: &str = "LODESTAR_DEFAULT_TAGS_";
pub const ENV_IGNORE_TAGS_KEYS: &str = "LODESTAR_IGNORE_TAGS_KEYS";
pub const ENV_IGNORE_TAGS_KEY_PREFIXES: &str = "LODESTAR_IGNORE_TAGS_KEY_PREFIXES";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Region for every resource that does not override it
    pub region: Option<String>,
    pub default_tags: DefaultConfig,
    pub ignore_tags: IgnoreConfig,
}

impl ProviderConfig {
    /// Parse a JSON configuration and normalize its region
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.normalized()
    }

    /// Read a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Override the region, normalized and checked like a configured one
    pub fn with_region(mut self, region: impl Into<String>) -> ConfigResult<Self> {
        self.region = Some(region.into());
        self.normalized()
    }

    /// Merge settings from the process environment
    pub fn with_process_env(self) -> Self {
        self.with_env(std::env::vars())
    }

    /// Merge settings from environment variables
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in vars {
            let (name, value) = (name.as_ref(), value.as_ref());

            if let Some(key) = name.strip_prefix(ENV_DEFAULT_TAGS_PREFIX) {
                if !key.is_empty() && !self.default_tags.tags.contains_key(key) {
                    self.default_tags.tags.insert(key, value);
                }
                continue;
            }

            match name {
                ENV_IGNORE_TAGS_KEYS => {
                    self.ignore_tags.keys.extend(split_list(value));
                }
                ENV_IGNORE_TAGS_KEY_PREFIXES => {
                    self.ignore_tags.key_prefixes.extend(split_list(value));
                }
                _ => {}
            }
        }
        self
    }

    fn normalized(mut self) -> ConfigResult<Self> {
        if let Some(region) = self.region.take() {
            let region = normalize_region(&region);
            if !is_valid_region(&region) {
                return Err(ConfigError::InvalidRegion(region));
            }
            self.region = Some(region);
        }
        Ok(self)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
