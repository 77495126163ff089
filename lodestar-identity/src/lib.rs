//! Lodestar Identity
//!
//! Turns an import request into a validated resource state and identity.
//!
//! ## Module Structure
//!
//! - `spec` - Per-resource-type identity shape (`IdentitySpec`)
//! - `arn` - ARN parsing
//! - `composite` - Composite import IDs (`name,type`)
//! - `resolve` - ARN, parameterized and singleton resolvers
//! - `import` - Import dispatcher and response
//! - `error` - Identity error taxonomy

pub mod arn;
pub mod composite;
pub mod error;
pub mod import;
pub mod resolve;
pub mod spec;

pub use arn::Arn;
pub use composite::{CompositeIdParser, ImportIdParser};
pub use error::{IdentityError, IdentityResult};
pub use import::{ImportRequest, ImportResponse, ImportSource, import_state, resolve};
pub use resolve::ResolvedAttributes;
pub use spec::{IdentitySpec, Scope, Shape};
