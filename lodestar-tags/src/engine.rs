//! Tag precedence
//!
//! Plan time computes `tags_all` from configuration alone. Read time
//! reconciles what the remote system reports with what the user configured:
//! `tags_all` is what the resource actually carries, `tags` is what the user
//! should see in their own configuration.
//!
//! When a key has a configured, a default and a discovered value, the
//! configured value is written to `tags` and the discovered value to
//! `tags_all`.
//!
//! Empty configured tags never raise `RedundantDefaultTags`, even against
//! empty defaults.

use lodestar_core::resource::Value;

use crate::config::{DefaultConfig, IgnoreConfig};
use crate::error::TagError;
use crate::system::SystemTags;
use crate::tags::KeyValueTags;

/// A tag attribute as seen at plan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsValue {
    Null,
    /// Depends on values not known until apply
    Unknown,
    Known(KeyValueTags),
}

impl TagsValue {
    /// Read a planned `tags` attribute
    ///
    /// A map with any unknown element is unknown as a whole. Null elements
    /// are dropped.
    pub fn from_value(value: Option<&Value>) -> Result<TagsValue, TagError> {
        let map = match value {
            None | Some(Value::Null) => return Ok(TagsValue::Null),
            Some(Value::Unknown) => return Ok(TagsValue::Unknown),
            Some(Value::Map(map)) => map,
            Some(other) => {
                return Err(TagError::InvalidTags(format!(
                    "expected a map of strings, got {}",
                    other.type_name()
                )));
            }
        };

        let mut tags = KeyValueTags::new();
        for (key, element) in map {
            match element {
                Value::Unknown => return Ok(TagsValue::Unknown),
                Value::Null => {}
                Value::String(s) => tags.insert(key.as_str(), s.as_str()),
                other => {
                    return Err(TagError::InvalidTags(format!(
                        "tag {} must be a string, got {}",
                        key,
                        other.type_name()
                    )));
                }
            }
        }
        Ok(TagsValue::Known(tags))
    }

    pub fn to_value(&self) -> Value {
        match self {
            TagsValue::Null => Value::Null,
            TagsValue::Unknown => Value::Unknown,
            TagsValue::Known(tags) => tags.to_value(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TagsValue::Unknown)
    }
}

/// Tag attributes after a read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledTags {
    pub tags: KeyValueTags,
    pub tags_all: KeyValueTags,
}

/// Compute the planned `tags_all` from the configured tags
pub fn compute_plan_tags(
    configured: &TagsValue,
    defaults: &DefaultConfig,
    ignore: &IgnoreConfig,
) -> Result<TagsValue, TagError> {
    let configured = match configured {
        TagsValue::Unknown => return Ok(TagsValue::Unknown),
        TagsValue::Null => KeyValueTags::new(),
        TagsValue::Known(tags) => tags.clone(),
    };

    if !configured.is_empty() && defaults.tags_equal(&configured) {
        return Err(TagError::RedundantDefaultTags);
    }

    let tags_all = defaults.merge_tags(&configured).ignore_config(ignore);
    log::debug!("planned tags_all with {} tags", tags_all.len());
    Ok(TagsValue::Known(tags_all))
}

/// Reconcile the tags reported by the remote system
pub fn reconcile_read_tags(
    discovered: &KeyValueTags,
    configured: &KeyValueTags,
    defaults: &DefaultConfig,
    ignore: &IgnoreConfig,
    system: &SystemTags,
) -> ReconciledTags {
    let tags_all = discovered.ignore_system(system).ignore_config(ignore);
    let tags = resolve_duplicates(&tags_all, configured, defaults, ignore);

    log::debug!(
        "reconciled {} discovered tags into {} tags ({} in tags_all)",
        discovered.len(),
        tags.len(),
        tags_all.len()
    );

    ReconciledTags { tags, tags_all }
}

/// Reconcile the tags reported by the remote system when the resource
/// configuration is not available, only the prior `tags`
///
/// Prior tags stand in for the configured ones while the remote object still
/// carries their key. A prior key gone from the remote object is dropped, so
/// a tag removed out of band leaves `tags` too.
pub fn reconcile_refreshed_tags(
    discovered: &KeyValueTags,
    prior: &KeyValueTags,
    defaults: &DefaultConfig,
    ignore: &IgnoreConfig,
    system: &SystemTags,
) -> ReconciledTags {
    let tags_all = discovered.ignore_system(system).ignore_config(ignore);
    let configured = prior.only(tags_all.keys());
    let tags = resolve_duplicates(&tags_all, &configured, defaults, ignore);

    log::debug!(
        "refreshed {} discovered tags, {} of {} prior tags still present",
        discovered.len(),
        configured.len(),
        prior.len()
    );

    ReconciledTags { tags, tags_all }
}

/// The `tags` attribute for a given `tags_all`
///
/// Every configured tag is kept with its configured value. Other tags are
/// kept unless they are ignored or exactly match a default tag.
pub fn resolve_duplicates(
    tags_all: &KeyValueTags,
    configured: &KeyValueTags,
    defaults: &DefaultConfig,
    ignore: &IgnoreConfig,
) -> KeyValueTags {
    let mut tags = configured.clone();
    for (key, value) in tags_all.iter() {
        if configured.contains_key(key)
            || ignore.matches(key)
            || defaults.tags.get(key) == Some(value)
        {
            continue;
        }
        tags.insert(key, value);
    }
    tags
}
