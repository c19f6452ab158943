//! Thread-safe in-memory credential store for tests and development.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::store::domain::{ConsumerKey, ConsumerRecord, StoreConfig, TokenKind, TokenRecord};
use crate::store::ports::{CredentialStore, SharedStore, StoreError, StoreResult};

/// Default nonce freshness window in seconds.
const DEFAULT_NONCE_WINDOW_SECS: i64 = 300;

/// Configuration option naming the nonce freshness window.
const NONCE_WINDOW_OPTION: &str = "nonce_window_secs";

/// Thread-safe in-memory credential store.
///
/// Holds consumers, tokens, and the nonce admission log behind a single
/// `RwLock`. The clock is injected so expiry behaviour is deterministic
/// under test.
pub struct InMemoryCredentialStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<StoreState>>,
    clock: Arc<C>,
    nonce_window: TimeDelta,
}

#[derive(Debug, Default)]
struct StoreState {
    consumers: HashMap<ConsumerKey, ConsumerRecord>,
    tokens: HashMap<String, TokenRecord>,
    nonces: HashMap<ConsumerKey, HashMap<String, DateTime<Utc>>>,
}

impl InMemoryCredentialStore {
    /// Creates a store with the system clock and the default nonce window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Builds a store from a configuration bundle.
    ///
    /// The only interpreted option is `nonce_window_secs` (a non-negative
    /// integer number of seconds); unrecognised options are ignored, since
    /// the bundle is an application-to-backend contract.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] when `nonce_window_secs` is
    /// present but is not a non-negative integer.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self::new();

        if let Some(value) = config.get(NONCE_WINDOW_OPTION) {
            let window_secs = value.as_u64().ok_or_else(|| {
                StoreError::invalid_config(format!(
                    "{NONCE_WINDOW_OPTION} must be a non-negative integer, got {value}"
                ))
            })?;
            let window = i64::try_from(window_secs).map_err(|_| {
                StoreError::invalid_config(format!("{NONCE_WINDOW_OPTION} is out of range"))
            })?;
            store.nonce_window = TimeDelta::seconds(window);
        }

        Ok(store)
    }

    /// Factory suitable for registration with the store registry.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::InvalidConfig`] from
    /// [`InMemoryCredentialStore::from_config`].
    pub fn factory(config: &StoreConfig) -> Result<SharedStore, StoreError> {
        Ok(Arc::new(Self::from_config(config)?))
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryCredentialStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a store with an injected clock and the default nonce window.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            clock,
            nonce_window: TimeDelta::seconds(DEFAULT_NONCE_WINDOW_SECS),
        }
    }

    /// Issues a fresh token for a registered consumer and stores it.
    ///
    /// Token and secret material are generated from random UUIDs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownConsumer`] when the consumer is not
    /// registered.
    pub fn issue_token(&self, consumer: &ConsumerKey, kind: TokenKind) -> StoreResult<TokenRecord> {
        let mut state = write_state(&self.state)?;

        if !state.consumers.contains_key(consumer) {
            return Err(StoreError::UnknownConsumer(consumer.clone()));
        }

        let record = TokenRecord::new(
            generate_material(),
            generate_material(),
            consumer.clone(),
            kind,
            &*self.clock,
        )
        .map_err(StoreError::persistence)?;

        state
            .tokens
            .insert(record.token().to_owned(), record.clone());
        Ok(record)
    }

    /// Returns the nonce freshness window.
    #[must_use]
    pub const fn nonce_window(&self) -> TimeDelta {
        self.nonce_window
    }
}

/// Generates opaque token or secret material from a random UUID.
fn generate_material() -> String {
    Uuid::new_v4().simple().to_string()
}

fn write_state(
    state: &Arc<RwLock<StoreState>>,
) -> StoreResult<std::sync::RwLockWriteGuard<'_, StoreState>> {
    state
        .write()
        .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
}

fn read_state(
    state: &Arc<RwLock<StoreState>>,
) -> StoreResult<std::sync::RwLockReadGuard<'_, StoreState>> {
    state
        .read()
        .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
}

#[async_trait]
impl<C> CredentialStore for InMemoryCredentialStore<C>
where
    C: Clock + Send + Sync,
{
    async fn add_consumer(&self, record: &ConsumerRecord) -> StoreResult<()> {
        let mut state = write_state(&self.state)?;

        if state.consumers.contains_key(record.key()) {
            return Err(StoreError::DuplicateConsumer(record.key().clone()));
        }

        state.consumers.insert(record.key().clone(), record.clone());
        Ok(())
    }

    async fn consumer(&self, key: &ConsumerKey) -> StoreResult<Option<ConsumerRecord>> {
        let state = read_state(&self.state)?;
        Ok(state.consumers.get(key).cloned())
    }

    async fn update_consumer(&self, record: &ConsumerRecord) -> StoreResult<()> {
        let mut state = write_state(&self.state)?;

        if !state.consumers.contains_key(record.key()) {
            return Err(StoreError::UnknownConsumer(record.key().clone()));
        }

        state.consumers.insert(record.key().clone(), record.clone());
        Ok(())
    }

    async fn remove_consumer(&self, key: &ConsumerKey) -> StoreResult<()> {
        let mut state = write_state(&self.state)?;

        if state.consumers.remove(key).is_none() {
            return Err(StoreError::UnknownConsumer(key.clone()));
        }

        state.tokens.retain(|_, token| token.consumer() != key);
        state.nonces.remove(key);
        Ok(())
    }

    async fn add_token(&self, record: &TokenRecord) -> StoreResult<()> {
        let mut state = write_state(&self.state)?;

        if !state.consumers.contains_key(record.consumer()) {
            return Err(StoreError::UnknownConsumer(record.consumer().clone()));
        }

        if state.tokens.contains_key(record.token()) {
            return Err(StoreError::DuplicateToken(record.token().to_owned()));
        }

        state
            .tokens
            .insert(record.token().to_owned(), record.clone());
        Ok(())
    }

    async fn token(&self, token: &str) -> StoreResult<Option<TokenRecord>> {
        let state = read_state(&self.state)?;
        Ok(state.tokens.get(token).cloned())
    }

    async fn remove_token(&self, token: &str) -> StoreResult<()> {
        let mut state = write_state(&self.state)?;

        if state.tokens.remove(token).is_none() {
            return Err(StoreError::UnknownToken(token.to_owned()));
        }

        Ok(())
    }

    async fn check_nonce(
        &self,
        consumer: &ConsumerKey,
        nonce: &str,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<()> {
        let now = self.clock.utc();

        if (now - timestamp).abs() > self.nonce_window {
            return Err(StoreError::StaleTimestamp {
                consumer: consumer.clone(),
                timestamp,
            });
        }

        let mut state = write_state(&self.state)?;
        let seen = state.nonces.entry(consumer.clone()).or_default();

        // Nonces older than the window can no longer be replayed within a
        // fresh timestamp, so drop them.
        seen.retain(|_, seen_at| (now - *seen_at) <= self.nonce_window);

        if seen.contains_key(nonce) {
            return Err(StoreError::NonceReused {
                consumer: consumer.clone(),
                nonce: nonce.to_owned(),
            });
        }

        seen.insert(nonce.to_owned(), now);
        Ok(())
    }
}

impl<C> Clone for InMemoryCredentialStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
            nonce_window: self.nonce_window,
        }
    }
}

impl<C> std::fmt::Debug for InMemoryCredentialStore<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCredentialStore")
            .field("nonce_window", &self.nonce_window)
            .finish_non_exhaustive()
    }
}
