//! Backend identification and the namespace resolution rule.

use super::CredentialDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker that flags a backend identifier as already fully qualified.
const QUALIFIED_MARKER: &str = "::";

/// Conventional namespace prefixed onto short backend names.
const DEFAULT_NAMESPACE: &str = "oauth_store::store";

/// Fully-qualified reference to a backend type.
///
/// A short identifier such as `MySQL` resolves to the conventional path
/// `oauth_store::store::MySQL`. An identifier carrying the leading `::`
/// marker opts out of the convention and is used verbatim, so callers can
/// point the registry at backend types living anywhere
/// (e.g. `::my_app::stores::Redis`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorePath(String);

impl StorePath {
    /// Resolves a caller-supplied backend identifier into a backend path.
    ///
    /// The input is trimmed. Identifiers starting with `::` are kept
    /// verbatim; anything else is prefixed with the
    /// `oauth_store::store` namespace. Case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::EmptyBackendIdentifier`] when the
    /// identifier is blank, or
    /// [`CredentialDomainError::BareQualifiedIdentifier`] when it consists
    /// of the `::` marker alone.
    pub fn resolve(identifier: impl AsRef<str>) -> Result<Self, CredentialDomainError> {
        let trimmed = identifier.as_ref().trim();

        if trimmed.is_empty() {
            return Err(CredentialDomainError::EmptyBackendIdentifier);
        }

        if trimmed == QUALIFIED_MARKER {
            return Err(CredentialDomainError::BareQualifiedIdentifier(
                trimmed.to_owned(),
            ));
        }

        if trimmed.starts_with(QUALIFIED_MARKER) {
            return Ok(Self(trimmed.to_owned()));
        }

        Ok(Self(format!("{DEFAULT_NAMESPACE}::{trimmed}")))
    }

    /// Returns the backend path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
