//! Factory contract for constructing credential-store backends.

use crate::store::domain::StoreConfig;
use crate::store::ports::{CredentialStore, StoreError};
use std::sync::Arc;

/// Shared handle to a constructed credential store.
pub type SharedStore = Arc<dyn CredentialStore>;

/// Constructor for a credential-store backend.
///
/// Every backend is registered as a factory taking the opaque configuration
/// bundle. The return type constrains the constructed value to the
/// [`CredentialStore`] capability, so a resolved backend conforms by
/// construction; a factory that cannot produce a valid store from the
/// given configuration reports a [`StoreError`] instead.
pub type StoreFactory = Box<dyn Fn(&StoreConfig) -> Result<SharedStore, StoreError> + Send + Sync>;
