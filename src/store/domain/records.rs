//! Credential record value types handled by the storage capability.

use super::{CredentialDomainError, ParseTokenKindError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated consumer key identifying a registered OAuth consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumerKey(String);

impl ConsumerKey {
    /// Creates a validated consumer key.
    ///
    /// The input is trimmed. Case is preserved, since consumer keys are
    /// opaque tokens issued by the provider.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::EmptyConsumerKey`] when the value
    /// is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialDomainError> {
        let trimmed = value.into().trim().to_owned();

        if trimmed.is_empty() {
            return Err(CredentialDomainError::EmptyConsumerKey);
        }

        Ok(Self(trimmed))
    }

    /// Returns the consumer key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ConsumerKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ConsumerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered consumer credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerRecord {
    key: ConsumerKey,
    secret: String,
    callback_uri: Option<String>,
    registered_at: DateTime<Utc>,
}

impl ConsumerRecord {
    /// Creates a consumer record stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::EmptyConsumerSecret`] when the
    /// secret is blank after trimming.
    pub fn new(
        key: ConsumerKey,
        raw_secret: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, CredentialDomainError> {
        let secret = raw_secret.into().trim().to_owned();

        if secret.is_empty() {
            return Err(CredentialDomainError::EmptyConsumerSecret);
        }

        Ok(Self {
            key,
            secret,
            callback_uri: None,
            registered_at: clock.utc(),
        })
    }

    /// Sets the consumer's OAuth callback URI.
    #[must_use]
    pub fn with_callback_uri(mut self, uri: impl Into<String>) -> Self {
        self.callback_uri = Some(uri.into());
        self
    }

    /// Returns the consumer key.
    #[must_use]
    pub const fn key(&self) -> &ConsumerKey {
        &self.key
    }

    /// Returns the shared consumer secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the registered callback URI, if any.
    #[must_use]
    pub fn callback_uri(&self) -> Option<&str> {
        self.callback_uri.as_deref()
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

/// Lifecycle stage of an OAuth token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Temporary token issued before user authorization.
    Request,
    /// Long-lived token exchanged for an authorized request token.
    Access,
}

impl TokenKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Access => "access",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TokenKind {
    type Error = ParseTokenKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "request" => Ok(Self::Request),
            "access" => Ok(Self::Access),
            _ => Err(ParseTokenKindError(value.to_owned())),
        }
    }
}

/// Issued token credentials bound to a consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    token: String,
    secret: String,
    consumer: ConsumerKey,
    kind: TokenKind,
    issued_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Creates a token record stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::EmptyToken`] or
    /// [`CredentialDomainError::EmptyTokenSecret`] when the corresponding
    /// field is blank after trimming.
    pub fn new(
        raw_token: impl Into<String>,
        raw_secret: impl Into<String>,
        consumer: ConsumerKey,
        kind: TokenKind,
        clock: &impl Clock,
    ) -> Result<Self, CredentialDomainError> {
        let token = raw_token.into().trim().to_owned();
        let secret = raw_secret.into().trim().to_owned();

        if token.is_empty() {
            return Err(CredentialDomainError::EmptyToken);
        }
        if secret.is_empty() {
            return Err(CredentialDomainError::EmptyTokenSecret);
        }

        Ok(Self {
            token,
            secret,
            consumer,
            kind,
            issued_at: clock.utc(),
        })
    }

    /// Returns the token value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the token secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the key of the consumer the token was issued to.
    #[must_use]
    pub const fn consumer(&self) -> &ConsumerKey {
        &self.consumer
    }

    /// Returns the token lifecycle stage.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the issuance timestamp.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}
