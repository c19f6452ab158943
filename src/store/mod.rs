//! Credential-store resolution and the storage capability contract.
//!
//! This module implements the store resolution lifecycle: a backend
//! identifier is resolved against a registration table, the matching
//! factory constructs the backend with an opaque configuration bundle, and
//! the result is cached as the registry's single resolved instance. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
