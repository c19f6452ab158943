//! Port contracts for credential-store backends.
//!
//! Ports define the infrastructure-agnostic interfaces the registry
//! resolves against: the storage capability every backend must implement
//! and the factory signature backends are registered under.

pub mod credential_store;
pub mod factory;

pub use credential_store::{CredentialStore, StoreError, StoreResult};
pub use factory::{SharedStore, StoreFactory};
