//! In-memory OAuth credential holder.
//!
//! One `CredentialStore` is built at startup and shared with the gateway.
//! Only the access token changes at runtime. Refreshes are not serialized:
//! two calls that both see a 401 will each refresh and each overwrite the
//! token, which is harmless because the refresh token is never rotated here.

use std::fmt;

use tokio::sync::RwLock;

use crate::core::config::SageConfig;

/// Material needed to call the token endpoint with `grant_type=refresh_token`.
#[derive(Clone)]
pub struct RefreshGrant {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Holds the current access token plus the static refresh material.
pub struct CredentialStore {
    access_token: RwLock<Option<String>>,
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl CredentialStore {
    /// Create a store from raw values. Empty strings count as absent.
    pub fn new(
        access_token: Option<String>,
        refresh_token: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            access_token: RwLock::new(non_empty(access_token)),
            refresh_token: non_empty(refresh_token),
            client_id: non_empty(client_id),
            client_secret: non_empty(client_secret),
        }
    }

    /// Create a store from the Sage section of the server config.
    pub fn from_config(config: &SageConfig) -> Self {
        Self::new(
            config.access_token.clone(),
            config.refresh_token.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Replace the access token for every subsequent call.
    pub async fn replace_access_token(&self, token: String) {
        *self.access_token.write().await = Some(token);
    }

    /// Refresh material, or a description of what is missing.
    pub fn refresh_grant(&self) -> Result<RefreshGrant, String> {
        let missing: Vec<&str> = [
            ("SAGE_REFRESH_TOKEN", &self.refresh_token),
            ("SAGE_CLIENT_ID", &self.client_id),
            ("SAGE_CLIENT_SECRET", &self.client_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();

        match (&self.refresh_token, &self.client_id, &self.client_secret) {
            (Some(refresh_token), Some(client_id), Some(client_secret)) => Ok(RefreshGrant {
                refresh_token: refresh_token.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => Err(format!(
                "access token expired and cannot be refreshed, missing {}",
                missing.join(", ")
            )),
        }
    }

    /// The refresh token in use, for comparing against token endpoint replies.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("CredentialStore")
            .field("refresh_token", &redact(&self.refresh_token))
            .field("client_id", &redact(&self.client_id))
            .field("client_secret", &redact(&self.client_secret))
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
