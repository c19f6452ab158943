//! Application services for credential-store resolution.

mod registry;

pub use registry::{StoreRegistry, StoreRequest, StoreResolveError, StoreResolveResult};
