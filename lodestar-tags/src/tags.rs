//! KeyValueTags - An ordered set of resource tags
//!
//! Every operation returns a new set and leaves the receiver untouched.

use std::collections::BTreeMap;

use lodestar_core::resource::Value;
use serde::{Deserialize, Serialize};

use crate::config::{DefaultConfig, IgnoreConfig};
use crate::system::SystemTags;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyValueTags(BTreeMap<String, String>);

impl KeyValueTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    /// Whether every key/value pair of `target` is present here
    pub fn contains_all(&self, target: &KeyValueTags) -> bool {
        target.iter().all(|(k, v)| self.get(k) == Some(v))
    }

    /// Union of both sets; `other` wins on key collision
    pub fn merge(&self, other: &KeyValueTags) -> KeyValueTags {
        let mut result = self.clone();
        for (k, v) in other.iter() {
            result.insert(k, v);
        }
        result
    }

    /// Keep only tags whose keys appear in `keys`
    pub fn only<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> KeyValueTags {
        keys.into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
            .collect()
    }

    /// Drop tags whose keys appear in `ignore`
    pub fn ignore(&self, ignore: &KeyValueTags) -> KeyValueTags {
        self.filter(|k| !ignore.contains_key(k))
    }

    /// Drop tags whose keys start with any of `prefixes`
    pub fn ignore_prefixes<'a>(&self, prefixes: impl IntoIterator<Item = &'a str>) -> KeyValueTags {
        let prefixes: Vec<&str> = prefixes.into_iter().collect();
        self.filter(|k| !prefixes.iter().any(|p| k.starts_with(p)))
    }

    /// Drop tags matched by the provider's ignore configuration
    pub fn ignore_config(&self, config: &IgnoreConfig) -> KeyValueTags {
        self.filter(|k| !config.matches(k))
    }

    /// Drop tags the remote system manages itself
    pub fn ignore_system(&self, system: &SystemTags) -> KeyValueTags {
        self.filter(|k| !system.matches(k))
    }

    /// Tags present here but missing from `new`
    pub fn removed(&self, new: &KeyValueTags) -> KeyValueTags {
        self.filter(|k| !new.contains_key(k))
    }

    /// Tags in `new` that are added or whose value changed
    pub fn updated(&self, new: &KeyValueTags) -> KeyValueTags {
        new.iter()
            .filter(|&(k, v)| self.get(k) != Some(v))
            .collect()
    }

    /// Drop tags that exactly match a default tag (same key and value)
    pub fn remove_default_config(&self, defaults: &DefaultConfig) -> KeyValueTags {
        self.iter()
            .filter(|&(k, v)| defaults.tags.get(k) != Some(v))
            .collect()
    }

    /// Split into sets of at most `size` tags, in key order
    ///
    /// A `size` of zero is treated as one.
    pub fn chunks(&self, size: usize) -> Vec<KeyValueTags> {
        let entries: Vec<(&str, &str)> = self.iter().collect();
        entries
            .chunks(size.max(1))
            .map(|chunk| chunk.iter().copied().collect())
            .collect()
    }

    /// State value for a `tags` or `tags_all` attribute
    pub fn to_value(&self) -> Value {
        Value::string_map(self.iter())
    }

    /// Read a string map attribute; `None` for null or non-map values
    pub fn from_value(value: &Value) -> Option<KeyValueTags> {
        match value {
            Value::Map(map) => Some(
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
                    .collect(),
            ),
            _ => None,
        }
    }

    fn filter(&self, mut keep: impl FnMut(&str) -> bool) -> KeyValueTags {
        self.iter().filter(|&(k, _)| keep(k)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for KeyValueTags {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for KeyValueTags {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
