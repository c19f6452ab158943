//! oauth-store: credential-store resolution for an OAuth authorization layer.
//!
//! This crate provides the single access point through which an OAuth
//! protocol layer obtains its credential-storage backend. Callers ask for
//! "the store" by name; the registry resolves that name to a registered
//! factory, constructs the backend with an opaque configuration bundle, and
//! caches the one resulting instance for the lifetime of the registry.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`store`]: Backend resolution, the capability contract, and the
//!   in-memory reference backend

pub mod store;
