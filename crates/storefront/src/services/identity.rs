//! Identity provider client.
//!
//! REST client for the hosted identity service, plus the session-change
//! stream the auth container subscribes to. Session state lives in the
//! provider (tokens are held only in memory here); every sign-in and
//! sign-out is broadcast to subscribers through a watch channel.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;
use url::Url;

use crate::config::IdentityConfig;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("identity API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Base URL did not parse.
    #[error("invalid base URL: {0}")]
    BaseUrl(String),

    /// The operation requires a signed-in session.
    #[error("no active session")]
    NotSignedIn,
}

/// The provider's view of a signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    /// Opaque account identifier.
    pub uid: String,
    /// Account email.
    pub email: String,
    /// Display name, if one was ever set.
    pub display_name: Option<String>,
}

/// Tokens for the current session.
#[derive(Debug, Clone)]
struct SessionTokens {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    user: ProviderUser,
    tokens: SessionTokens,
}

/// Client for the hosted identity service.
pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: secrecy::SecretString,
    session: Mutex<Option<ActiveSession>>,
    changes: watch::Sender<Option<ProviderUser>>,
}

impl IdentityClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::BaseUrl`] if the configured URL does not
    /// parse, or [`IdentityError::Http`] if the HTTP client fails to build.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        Self::with_base_url(&config.base_url, config.api_key.clone())
    }

    /// Create a client with an explicit base URL (for testing with a mock
    /// server).
    ///
    /// # Errors
    ///
    /// Same as [`IdentityClient::new`].
    pub fn with_base_url(
        base_url: &str,
        api_key: secrecy::SecretString,
    ) -> Result<Self, IdentityError> {
        Url::parse(base_url)
            .map_err(|e| IdentityError::BaseUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let (changes, _) = watch::channel(None);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            session: Mutex::new(None),
            changes,
        })
    }

    /// Sign in with email and password.
    ///
    /// On success the session stream broadcasts the new user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Api`] carrying the response body text when
    /// the provider rejects the credentials.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, IdentityError> {
        let account = self
            .account_request("accounts:signInWithPassword", email, password)
            .await?;
        Ok(self.begin_session(account))
    }

    /// Create a new account and sign into it.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Api`] when the provider rejects the request
    /// (e.g. the email is already registered).
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, IdentityError> {
        let account = self.account_request("accounts:signUp", email, password).await?;
        Ok(self.begin_session(account))
    }

    /// Set the display name on the signed-in account.
    ///
    /// Does not broadcast on the session stream: the underlying session is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotSignedIn`] without a session, or
    /// [`IdentityError::Api`] on provider rejection.
    pub async fn update_display_name(&self, name: &str) -> Result<(), IdentityError> {
        let id_token = self
            .lock_session()
            .as_ref()
            .map(|s| s.tokens.id_token.clone())
            .ok_or(IdentityError::NotSignedIn)?;

        let body = serde_json::json!({
            "idToken": id_token,
            "displayName": name,
            "returnSecureToken": true,
        });
        let response = self
            .client
            .post(self.endpoint("accounts:update"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(session) = self.lock_session().as_mut() {
            session.user.display_name = Some(name.to_string());
        }
        Ok(())
    }

    /// Terminate the current session.
    ///
    /// Local-only: tokens are dropped and subscribers see `None`.
    pub fn sign_out(&self) {
        *self.lock_session() = None;
        self.changes.send_replace(None);
        info!("identity session cleared");
    }

    /// Get a bearer token for the current session.
    ///
    /// Returns `None` when signed out. With `force_refresh` the refresh
    /// endpoint is called and the new token stored; otherwise the cached
    /// token is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Api`] when the refresh endpoint rejects the
    /// stored refresh token.
    pub async fn get_token(&self, force_refresh: bool) -> Result<Option<String>, IdentityError> {
        let tokens = match self.lock_session().as_ref() {
            Some(session) => session.tokens.clone(),
            None => return Ok(None),
        };

        if !force_refresh {
            return Ok(Some(tokens.id_token));
        }

        let url = format!(
            "{}/v1/token?key={}",
            self.base_url,
            self.api_key.expose_secret()
        );
        let body = serde_json::json!({
            "grant_type": "refresh_token",
            "refresh_token": tokens.refresh_token,
        });
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let refreshed: RefreshResponse = response.json().await?;

        let mut session = self.lock_session();
        match session.as_mut() {
            Some(active) => {
                active.tokens = SessionTokens {
                    id_token: refreshed.id_token.clone(),
                    refresh_token: refreshed.refresh_token,
                };
                Ok(Some(refreshed.id_token))
            }
            // Signed out while the refresh was in flight.
            None => Ok(None),
        }
    }

    /// The currently signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<ProviderUser> {
        self.lock_session().as_ref().map(|s| s.user.clone())
    }

    /// Subscribe to session changes.
    ///
    /// The receiver's current value is the session at subscription time;
    /// every sign-in and sign-out after that is observed exactly once.
    /// Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<ProviderUser>> {
        self.changes.subscribe()
    }

    async fn account_request(
        &self,
        operation: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountResponse, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response = self
            .client
            .post(self.endpoint(operation))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    fn begin_session(&self, account: AccountResponse) -> ProviderUser {
        let user = ProviderUser {
            uid: account.local_id,
            email: account.email,
            display_name: account.display_name,
        };
        *self.lock_session() = Some(ActiveSession {
            user: user.clone(),
            tokens: SessionTokens {
                id_token: account.id_token,
                refresh_token: account.refresh_token,
            },
        });
        self.changes.send_replace(Some(user.clone()));
        info!(uid = %user.uid, "identity session established");
        user
    }

    fn endpoint(&self, operation: &str) -> String {
        // The operation segment contains a colon, so this is assembled by
        // hand rather than with Url::join.
        format!(
            "{}/v1/{operation}?key={}",
            self.base_url,
            self.api_key.expose_secret()
        )
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<ActiveSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Provider response for sign-in, sign-up and profile updates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

/// Provider response for token refresh.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}
