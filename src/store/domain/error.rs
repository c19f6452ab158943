//! Error types for credential-store domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing credential-store domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialDomainError {
    /// The backend identifier is empty after trimming.
    #[error("backend identifier must not be empty")]
    EmptyBackendIdentifier,

    /// The backend identifier is the bare fully-qualified marker with no
    /// path behind it.
    #[error("fully-qualified backend identifier '{0}' names no type")]
    BareQualifiedIdentifier(String),

    /// The consumer key is empty after trimming.
    #[error("consumer key must not be empty")]
    EmptyConsumerKey,

    /// The consumer secret is empty after trimming.
    #[error("consumer secret must not be empty")]
    EmptyConsumerSecret,

    /// The token value is empty after trimming.
    #[error("token must not be empty")]
    EmptyToken,

    /// The token secret is empty after trimming.
    #[error("token secret must not be empty")]
    EmptyTokenSecret,
}

/// Error returned while parsing a token kind from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown token kind: {0}")]
pub struct ParseTokenKindError(pub String);
