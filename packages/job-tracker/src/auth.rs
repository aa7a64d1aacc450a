//! Credential acquisition behind a narrow seam.
//!
//! The provider is the only component that sees the OAuth token. Callers
//! ask for a credential, optionally allowing an interactive prompt, and
//! may drop the cached one when the API stops accepting it. Host-level
//! token management (refresh, scopes, consent) stays on the other side
//! of this seam.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Bearer token for the spreadsheet API.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

// The token never lands in logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// The user declined, or no interactive prompt was allowed.
    #[error("Failed to get authentication token")]
    Denied,

    /// The credential machinery itself failed.
    #[error("auth error: {0}")]
    Service(String),
}

/// Opaque credential capability.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain an access token, prompting the user when `interactive`.
    async fn acquire(&self, interactive: bool) -> Result<AccessToken, AuthError>;

    /// Drop any cached token so the next acquisition starts fresh.
    async fn invalidate(&self);
}

/// Config-then-cache-then-prompt provider for the terminal front-end.
///
/// A configured token always wins and is never invalidated here; it is
/// the operator's to rotate. Otherwise one interactive acquisition is
/// cached for the life of the process.
pub struct CachedTokenProvider {
    configured: Option<String>,
    cached: Mutex<Option<AccessToken>>,
}

impl CachedTokenProvider {
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn acquire(&self, interactive: bool) -> Result<AccessToken, AuthError> {
        if let Some(secret) = &self.configured {
            return Ok(AccessToken::new(secret.clone()));
        }

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        if !interactive {
            return Err(AuthError::Denied);
        }

        let token = AccessToken::new(prompt_for_token().await?);
        *cached = Some(token.clone());
        tracing::debug!("Cached interactively acquired token");
        Ok(token)
    }

    async fn invalidate(&self) {
        self.cached.lock().await.take();
    }
}

/// Blocking prompt moved off the async runtime.
async fn prompt_for_token() -> Result<String, AuthError> {
    let entered = tokio::task::spawn_blocking(|| {
        dialoguer::Password::new()
            .with_prompt("Google OAuth access token")
            .interact()
    })
    .await
    .map_err(|e| AuthError::Service(e.to_string()))?;

    match entered {
        Ok(secret) if !secret.trim().is_empty() => Ok(secret.trim().to_string()),
        _ => Err(AuthError::Denied),
    }
}
