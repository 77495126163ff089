//! Lodestar Core
//!
//! Shared data model for resolving resource identities and tags in a cloud
//! provider plugin: attribute values, resource state, diagnostics, and the
//! ambient client context every call runs under.

pub mod diagnostics;
pub mod interceptor;
pub mod provider;
pub mod resource;
pub mod schema;
