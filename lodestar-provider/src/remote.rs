//! Remote API seam
//!
//! Resource handlers never talk to a service directly; each resource type
//! supplies a `RemoteApi` that reads the object named by a state.

use async_trait::async_trait;
use lodestar_core::provider::ProviderResult;
use lodestar_core::resource::State;
use lodestar_tags::KeyValueTags;

/// A remote object as returned by the service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteObject {
    /// Attributes read from the service, without tags
    pub state: State,
    /// Every tag the service reports, system tags included
    pub tags: KeyValueTags,
}

impl RemoteObject {
    pub fn new(state: State) -> Self {
        Self {
            state,
            tags: KeyValueTags::new(),
        }
    }

    pub fn with_tags(mut self, tags: KeyValueTags) -> Self {
        self.tags = tags;
        self
    }
}

/// Reads remote objects for one resource type
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Read the object identified by `state`
    ///
    /// Returns a `ProviderError::not_found` error when the object does not
    /// exist.
    async fn read(&self, state: &State) -> ProviderResult<RemoteObject>;
}
