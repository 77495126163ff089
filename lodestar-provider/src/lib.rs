//! Lodestar Provider
//!
//! Wires identity resolution and tag precedence into per-resource-type
//! handlers, backed by an AWS client context.

pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod provider;
pub mod registry;
pub mod remote;
pub mod utils;

pub use config::ProviderConfig;
pub use context::AwsClientContext;
pub use error::{ConfigError, ConfigResult};
pub use handler::{PlanResponse, ReadCall, ReadResponse, ResourceHandler, TagsInterceptor};
pub use provider::Provider;
pub use registry::{Registry, ResourceRegistration};
pub use remote::{RemoteApi, RemoteObject};
