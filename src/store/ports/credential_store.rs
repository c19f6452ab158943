//! Storage capability contract for credential-store backends.

use crate::store::domain::{ConsumerKey, ConsumerRecord, TokenRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for credential-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Capability contract every credential-store backend must implement.
///
/// The contract covers the persistence the OAuth protocol layer needs:
/// consumer credentials, issued tokens, and nonce admission. Method bodies
/// live in backend implementations; this crate only declares the contract
/// and constrains registered factories to it.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stores a new consumer record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateConsumer`] when the consumer key is
    /// already registered.
    async fn add_consumer(&self, record: &ConsumerRecord) -> StoreResult<()>;

    /// Finds a consumer record by key.
    ///
    /// Returns `None` when the consumer is not registered.
    async fn consumer(&self, key: &ConsumerKey) -> StoreResult<Option<ConsumerRecord>>;

    /// Persists changes to an existing consumer record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownConsumer`] when the consumer does not
    /// exist.
    async fn update_consumer(&self, record: &ConsumerRecord) -> StoreResult<()>;

    /// Removes a consumer record and every token issued to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownConsumer`] when the consumer does not
    /// exist.
    async fn remove_consumer(&self, key: &ConsumerKey) -> StoreResult<()>;

    /// Stores a newly issued token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateToken`] when the token value already
    /// exists, or [`StoreError::UnknownConsumer`] when the owning consumer
    /// is not registered.
    async fn add_token(&self, record: &TokenRecord) -> StoreResult<()>;

    /// Finds a token record by token value.
    ///
    /// Returns `None` when the token is unknown.
    async fn token(&self, token: &str) -> StoreResult<Option<TokenRecord>>;

    /// Removes a token record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownToken`] when the token does not exist.
    async fn remove_token(&self, token: &str) -> StoreResult<()>;

    /// Admits a request nonce for a consumer.
    ///
    /// A nonce is admitted at most once per consumer, and only while its
    /// timestamp falls inside the backend's freshness window.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NonceReused`] on replay or
    /// [`StoreError::StaleTimestamp`] when the timestamp is outside the
    /// window.
    async fn check_nonce(
        &self,
        consumer: &ConsumerKey,
        nonce: &str,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<()>;
}

/// Errors returned by credential-store backend implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A consumer with the same key already exists.
    #[error("duplicate consumer key: {0}")]
    DuplicateConsumer(ConsumerKey),

    /// The consumer was not found.
    #[error("unknown consumer key: {0}")]
    UnknownConsumer(ConsumerKey),

    /// A token with the same value already exists.
    #[error("duplicate token: {0}")]
    DuplicateToken(String),

    /// The token was not found.
    #[error("unknown token: {0}")]
    UnknownToken(String),

    /// The nonce was already admitted for this consumer.
    #[error("nonce '{nonce}' already used by consumer '{consumer}'")]
    NonceReused {
        /// Consumer the nonce was presented for.
        consumer: ConsumerKey,
        /// Replayed nonce value.
        nonce: String,
    },

    /// The request timestamp falls outside the backend's freshness window.
    #[error("timestamp {timestamp} for consumer '{consumer}' is outside the freshness window")]
    StaleTimestamp {
        /// Consumer the request was presented for.
        consumer: ConsumerKey,
        /// Rejected request timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The configuration bundle could not be applied to the backend.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Builds an invalid-configuration error from a message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
