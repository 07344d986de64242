//! Bearer credential handling for TeamSpace API authentication.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::{Error, Result};

/// Environment variable consulted by [`Credential::from_env`].
pub const ACCESS_TOKEN_ENV: &str = "TEAMSPACE_ACCESS_TOKEN";

/// An immutable bearer credential for the TeamSpace API.
///
/// The credential holds the access token (and, when available, the refresh
/// token and expiry reported at issuance). Token acquisition and refresh
/// are the caller's responsibility; a refreshed credential is swapped into
/// the client with [`TeamSpaceClient::swap_credential`].
///
/// Cloning is cheap - clones share the same underlying secret.
///
/// [`TeamSpaceClient::swap_credential`]: crate::TeamSpaceClient::swap_credential
///
/// # Example
///
/// ```no_run
/// use teamspace_rs::Credential;
///
/// // Directly from a token string
/// let cred = Credential::new("NzAwMe...token");
///
/// // Or from the TEAMSPACE_ACCESS_TOKEN environment variable
/// let cred = Credential::from_env().expect("token in environment");
/// ```
#[derive(Clone)]
pub struct Credential {
    inner: Arc<CredentialInner>,
}

struct CredentialInner {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential from a bare access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CredentialInner {
                access_token: SecretString::from(access_token.into()),
                refresh_token: None,
                expires_at: None,
            }),
        }
    }

    /// Create a credential that also carries refresh metadata.
    ///
    /// The refresh token is held only so the caller can read it back when
    /// performing an external refresh; this crate never uses it itself.
    pub fn with_refresh(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            inner: Arc::new(CredentialInner {
                access_token: SecretString::from(access_token.into()),
                refresh_token: Some(SecretString::from(refresh_token.into())),
                expires_at,
            }),
        }
    }

    /// Read the access token from the `TEAMSPACE_ACCESS_TOKEN` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.is_empty() => Ok(Self::new(token)),
            _ => Err(Error::Config(format!(
                "{} is not set in the environment",
                ACCESS_TOKEN_ENV
            ))),
        }
    }

    /// When the access token expires, if known.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.expires_at
    }

    /// Returns `true` if the known expiry has passed.
    ///
    /// A credential without expiry metadata is never considered expired.
    pub fn is_expired(&self) -> bool {
        matches!(self.inner.expires_at, Some(at) if Utc::now() >= at)
    }

    /// Expose the refresh token for an external refresh flow.
    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .refresh_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// The current access token, used by the transport as the bearer value.
    pub(crate) fn current_access_token(&self) -> SecretString {
        self.inner.access_token.clone()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.inner.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.inner.expires_at)
            .finish()
    }
}
