//! Namespace registry for auradb
//!
//! Lazily creates the application's namespaces, coalescing concurrent
//! requests into a single schema upgrade.

mod errors;
mod registry;

pub use errors::{RegistryError, RegistryResult};
pub use registry::NamespaceRegistry;
