//! In-memory credential-store backend.

mod credential_store;

pub use credential_store::InMemoryCredentialStore;
