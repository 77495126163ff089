//! Lodestar Tags
//!
//! Computes the `tags` and `tags_all` attributes of a resource from the
//! resource's configured tags, the provider's default tags and the tags
//! reported by the remote system.
//!
//! ## Module Structure
//!
//! - `tags` - Key/value tag sets and set operations
//! - `config` - Provider-wide default and ignore configuration
//! - `system` - Per-service filters for tags the remote system injects
//! - `engine` - Plan-time and read-time tag precedence
//! - `error` - Tag errors

pub mod config;
pub mod engine;
pub mod error;
pub mod system;
pub mod tags;

pub use config::{DefaultConfig, IgnoreConfig};
pub use engine::{
    ReconciledTags, TagsValue, compute_plan_tags, reconcile_read_tags, reconcile_refreshed_tags,
    resolve_duplicates,
};
pub use error::TagError;
pub use system::SystemTags;
pub use tags::KeyValueTags;
