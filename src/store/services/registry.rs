//! Service layer for credential-store resolution and caching.
//!
//! Provides [`StoreRegistry`] which maps backend identifiers to registered
//! factories, constructs the requested backend on first use, and caches the
//! single resulting instance for the registry's lifetime.

use crate::store::domain::{CredentialDomainError, StoreConfig, StorePath};
use crate::store::ports::{SharedStore, StoreError, StoreFactory};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use thiserror::Error;

/// Conventional backend name used when the caller does not pick one.
const DEFAULT_BACKEND: &str = "MySQL";

/// Resolution request carrying the backend identifier and its options.
///
/// The default request names the conventional `MySQL` backend with an
/// empty configuration bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRequest {
    backend: String,
    config: StoreConfig,
}

impl StoreRequest {
    /// Creates a request for a specific backend identifier.
    #[must_use]
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            config: StoreConfig::new(),
        }
    }

    /// Replaces the configuration bundle.
    #[must_use]
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a single configuration option.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config = self.config.with_option(name, value);
        self
    }

    /// Returns the requested backend identifier.
    #[must_use]
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Returns the configuration bundle.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl Default for StoreRequest {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND)
    }
}

/// Errors returned while resolving a credential-store backend.
#[derive(Debug, Error)]
pub enum StoreResolveError {
    /// The backend identifier failed domain validation.
    #[error(transparent)]
    Domain(#[from] CredentialDomainError),

    /// No factory is registered under the resolved backend path.
    #[error("no credential store for '{0}'")]
    UnknownBackend(StorePath),

    /// A factory exists but refused to produce a store.
    #[error("'{path}' is not a valid credential store: {source}")]
    InvalidBackend {
        /// Backend path whose factory failed.
        path: StorePath,
        /// Failure reported by the factory.
        #[source]
        source: StoreError,
    },
}

/// Result type for store resolution.
pub type StoreResolveResult<T> = Result<T, StoreResolveError>;

/// Registry resolving backend identifiers to a single cached store.
///
/// Factories are registered at startup while the registry is still
/// exclusively owned; the `&mut` receiver on [`StoreRegistry::register`]
/// seals the table once the registry is shared. The first successful
/// [`StoreRegistry::resolve`] constructs the backend and caches it; the
/// registry never constructs a second instance.
///
/// The registry is an explicit object rather than process-global state, so
/// applications inject it where the store is consumed and tests build
/// independent registries.
pub struct StoreRegistry {
    factories: BTreeMap<StorePath, StoreFactory>,
    first_resolve: Mutex<()>,
    resolved: OnceLock<SharedStore>,
}

impl StoreRegistry {
    /// Creates a registry with an empty registration table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            first_resolve: Mutex::new(()),
            resolved: OnceLock::new(),
        }
    }

    /// Registers a backend factory under an identifier.
    ///
    /// The identifier goes through the same namespace rule as resolution,
    /// so `register("MySQL", ...)` and `resolve` with identifier `MySQL`
    /// meet at the path `oauth_store::store::MySQL`. Registering the same
    /// path twice replaces the earlier factory.
    ///
    /// Returns the fully-qualified path the factory was registered under.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError`] when the identifier is blank or a
    /// bare qualification marker.
    pub fn register(
        &mut self,
        identifier: impl AsRef<str>,
        factory: impl Fn(&StoreConfig) -> Result<SharedStore, StoreError> + Send + Sync + 'static,
    ) -> Result<StorePath, CredentialDomainError> {
        let path = StorePath::resolve(identifier)?;
        self.factories.insert(path.clone(), Box::new(factory));
        Ok(path)
    }

    /// Returns the registered backend paths in path order.
    pub fn backends(&self) -> impl Iterator<Item = &StorePath> {
        self.factories.keys()
    }

    /// Returns whether the registry holds a resolved instance.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Resolves the credential store, constructing it on first use.
    ///
    /// The first caller to succeed decides the backend: once an instance
    /// is cached, every later call returns it unchanged and the request
    /// arguments are ignored, even when they name a different backend or
    /// carry different options. There is no reset or reconfigure
    /// operation. A failed resolution caches nothing, so a later call may
    /// retry with corrected arguments.
    ///
    /// Concurrent first-time calls are serialized; exactly one factory
    /// invocation occurs and every caller receives the same instance.
    /// After the first success the call is lock-free.
    ///
    /// # Errors
    ///
    /// Returns [`StoreResolveError::Domain`] for an invalid identifier,
    /// [`StoreResolveError::UnknownBackend`] when no factory is registered
    /// under the resolved path, or [`StoreResolveError::InvalidBackend`]
    /// when the factory fails to construct a store.
    pub fn resolve(&self, request: &StoreRequest) -> StoreResolveResult<SharedStore> {
        if let Some(store) = self.resolved.get() {
            return Ok(Arc::clone(store));
        }

        // A factory panic would poison the guard; the slot is still
        // consistent, so recover the lock and continue.
        let guard = self
            .first_resolve
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(store) = self.resolved.get() {
            drop(guard);
            return Ok(Arc::clone(store));
        }

        let path = StorePath::resolve(request.backend())?;
        let factory = self
            .factories
            .get(&path)
            .ok_or_else(|| StoreResolveError::UnknownBackend(path.clone()))?;
        let store = factory(request.config())
            .map_err(|source| StoreResolveError::InvalidBackend { path, source })?;

        let cached = Arc::clone(self.resolved.get_or_init(|| store));
        drop(guard);
        Ok(cached)
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("backends", &self.factories.keys().collect::<Vec<_>>())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
