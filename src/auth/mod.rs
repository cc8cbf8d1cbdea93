//! Credential references and resolution.
//!
//! Descriptors may carry an [`AuthCredential`] directly; when an authenticated
//! descriptor carries none, the dispatcher asks its [`CredentialProvider`].

use crate::Result;
use async_trait::async_trait;
use keyring::Entry;
use std::env;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Keyring service name used by [`KeyringCredentialProvider`].
pub const KEYRING_SERVICE: &str = "mail-api-route";

pub const ENV_SESSION_ID: &str = "MAIL_API_SESSION_ID";
pub const ENV_ACCESS_TOKEN: &str = "MAIL_API_ACCESS_TOKEN";

/// Opaque credential attached to authenticated calls.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthCredential {
    session_id: String,
    access_token: String,
}

impl AuthCredential {
    pub fn new(session_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredential")
            .field("session_id", &self.session_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Source of credentials for authenticated descriptors that carry none.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self) -> Result<Option<AuthCredential>>;
}

/// Provider that never yields a credential.
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn credential(&self) -> Result<Option<AuthCredential>> {
        Ok(None)
    }
}

pub fn no_credentials() -> Arc<dyn CredentialProvider> {
    Arc::new(NoCredentials)
}

/// Always yields the same credential.
pub struct StaticCredentialProvider {
    credential: AuthCredential,
}

impl StaticCredentialProvider {
    pub fn new(credential: AuthCredential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credential(&self) -> Result<Option<AuthCredential>> {
        Ok(Some(self.credential.clone()))
    }
}

/// Reads `MAIL_API_SESSION_ID` / `MAIL_API_ACCESS_TOKEN` on every call.
#[derive(Default)]
pub struct EnvCredentialProvider;

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credential(&self) -> Result<Option<AuthCredential>> {
        Ok(credential_from_env())
    }
}

fn credential_from_env() -> Option<AuthCredential> {
    let session_id = env::var(ENV_SESSION_ID).ok().filter(|s| !s.is_empty())?;
    let access_token = env::var(ENV_ACCESS_TOKEN).ok().filter(|s| !s.is_empty())?;
    Some(AuthCredential::new(session_id, access_token))
}

/// Looks the access token up in the OS keyring, then falls back to the environment.
pub struct KeyringCredentialProvider {
    session_id: String,
}

impl KeyringCredentialProvider {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    /// Blocking: talks to the platform secret store.
    fn from_keyring(session_id: &str) -> Option<String> {
        let entry = match Entry::new(KEYRING_SERVICE, session_id) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "keyring unavailable");
                return None;
            }
        };
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(e) => {
                debug!(session_id, error = %e, "no keyring entry");
                None
            }
        }
    }
}

#[async_trait]
impl CredentialProvider for KeyringCredentialProvider {
    async fn credential(&self) -> Result<Option<AuthCredential>> {
        let session_id = self.session_id.clone();
        let token = tokio::task::spawn_blocking(move || Self::from_keyring(&session_id))
            .await
            .unwrap_or_else(|e| {
                debug!(error = %e, "keyring lookup task failed");
                None
            });
        if let Some(token) = token {
            return Ok(Some(AuthCredential::new(self.session_id.clone(), token)));
        }
        Ok(credential_from_env())
    }
}
