//! Domain model for credential-store resolution.
//!
//! The store domain models backend identification (the namespace rule that
//! turns a short backend name into a fully-qualified path), the opaque
//! configuration bundle handed to backend constructors, and the credential
//! records handled by the storage capability contract. All infrastructure
//! concerns are kept outside the domain boundary.

mod config;
mod error;
mod ids;
mod records;

pub use config::StoreConfig;
pub use error::{CredentialDomainError, ParseTokenKindError};
pub use ids::StorePath;
pub use records::{ConsumerKey, ConsumerRecord, TokenKind, TokenRecord};
