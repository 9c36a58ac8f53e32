//! Auth session container.
//!
//! Wraps the identity provider's session stream and resolves a local
//! [`UserProfile`] from the remote profile document store. The container
//! starts in [`SessionState::Loading`] and settles on the first session
//! notification; after that every sign-in and sign-out is observed exactly
//! once.

mod error;

pub use error::AuthError;

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use shophub_core::{Email, Role};

use crate::models::{ProfileDocument, UserProfile};
use crate::services::identity::{IdentityClient, ProviderUser};
use crate::services::profiles::ProfileStore;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 6;

/// The authentication state visible to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the provider's first session notification.
    #[default]
    Loading,
    /// Signed in, with the resolved profile.
    Authenticated(UserProfile),
    /// Signed out.
    Anonymous,
}

/// The auth session container.
///
/// Construct once at process start; the provider subscription is released
/// when the container is dropped, so no state update can land after
/// teardown.
pub struct AuthSession {
    provider: Arc<IdentityClient>,
    profiles: Arc<ProfileStore>,
    state: Arc<Mutex<SessionState>>,
    listener: JoinHandle<()>,
}

impl AuthSession {
    /// Create the container and subscribe to the provider's session stream.
    ///
    /// Must be called within a Tokio runtime.
    #[must_use]
    pub fn new(provider: Arc<IdentityClient>, profiles: Arc<ProfileStore>) -> Self {
        let state = Arc::new(Mutex::new(SessionState::Loading));
        let listener = tokio::spawn(watch_session(
            provider.subscribe(),
            Arc::clone(&profiles),
            Arc::clone(&state),
        ));
        Self {
            provider,
            profiles,
            state,
            listener,
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    /// The signed-in user's profile, if any.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        match &*self.lock_state() {
            SessionState::Authenticated(profile) => Some(profile.clone()),
            _ => None,
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.lock_state(), SessionState::Authenticated(_))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the provider's rejection as a value; the session state is
    /// unchanged on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        Email::parse(email)?;
        let user = self.provider.sign_in(email, password).await?;
        let profile = resolve_profile(&self.profiles, &user).await;
        self.set_state(SessionState::Authenticated(profile.clone()));
        info!(uid = %profile.id, "login succeeded");
        Ok(profile)
    }

    /// Create an account, optionally set a display name, and sign in.
    ///
    /// The initial profile document is written with merge semantics so a
    /// pre-existing document for the same account is not clobbered.
    ///
    /// # Errors
    ///
    /// Returns validation or provider errors as values; the session state
    /// is unchanged on failure.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        let parsed = Email::parse(email)?;
        validate_password(password)?;

        let created = self.provider.create_account(email, password).await?;
        if let Some(name) = full_name {
            self.provider.update_display_name(name).await?;
        }

        let doc = ProfileDocument {
            full_name: Some(
                full_name.map_or_else(|| parsed.local_part().to_string(), ToString::to_string),
            ),
            role: Some(Role::Customer.as_str().to_string()),
            created_at: Some(Utc::now()),
        };
        self.profiles.set(&created.uid, &doc, true).await?;

        let user = self.provider.current_user().unwrap_or(created);
        let profile = resolve_profile(&self.profiles, &user).await;
        self.set_state(SessionState::Authenticated(profile.clone()));
        info!(uid = %profile.id, "registration succeeded");
        Ok(profile)
    }

    /// Sign out and drop the in-memory profile.
    ///
    /// Nothing about the session is persisted, so there is nothing else to
    /// clean up.
    pub fn logout(&self) {
        self.provider.sign_out();
        self.set_state(SessionState::Anonymous);
    }

    /// A freshly-refreshed bearer token, or `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns the provider's rejection of the refresh as a value.
    pub async fn access_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.provider.get_token(true).await?)
    }

    fn set_state(&self, next: SessionState) {
        *self.lock_state() = next;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        // Release the session subscription so no update lands after teardown.
        self.listener.abort();
    }
}

/// Follow the provider's session stream and keep the state in sync.
async fn watch_session(
    mut changes: watch::Receiver<Option<ProviderUser>>,
    profiles: Arc<ProfileStore>,
    state: Arc<Mutex<SessionState>>,
) {
    loop {
        let user = changes.borrow_and_update().clone();
        let next = match user {
            Some(user) => SessionState::Authenticated(resolve_profile(&profiles, &user).await),
            None => SessionState::Anonymous,
        };
        // The session may have moved on while the profile was resolving;
        // apply only if this snapshot is still current.
        if !changes.has_changed().unwrap_or(true) {
            *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        }

        if changes.changed().await.is_err() {
            break;
        }
    }
}

/// Resolve the local profile for a signed-in provider user.
///
/// Reads the remote profile document, creating a default one on first
/// login. A failing document store degrades to a profile built from
/// provider fields with the customer role, rather than blocking login.
async fn resolve_profile(profiles: &ProfileStore, user: &ProviderUser) -> UserProfile {
    match profiles.get(&user.uid).await {
        Ok(Some(doc)) => UserProfile {
            id: user.uid.clone(),
            email: user.email.clone(),
            name: doc
                .full_name
                .or_else(|| user.display_name.clone())
                .unwrap_or_else(|| fallback_name(user)),
            role: Role::parse_or_default(doc.role.as_deref()),
        },
        Ok(None) => {
            let doc = ProfileDocument {
                full_name: Some(
                    user.display_name
                        .clone()
                        .unwrap_or_else(|| fallback_name(user)),
                ),
                role: Some(Role::Customer.as_str().to_string()),
                created_at: Some(Utc::now()),
            };
            if let Err(err) = profiles.set(&user.uid, &doc, false).await {
                warn!(uid = %user.uid, error = %err, "failed to create default profile document");
            }
            UserProfile {
                id: user.uid.clone(),
                email: user.email.clone(),
                name: doc.full_name.unwrap_or_default(),
                role: Role::Customer,
            }
        }
        Err(err) => {
            warn!(uid = %user.uid, error = %err, "profile resolution failed, using provider fields");
            UserProfile {
                id: user.uid.clone(),
                email: user.email.clone(),
                name: user
                    .display_name
                    .clone()
                    .unwrap_or_else(|| fallback_name(user)),
                role: Role::Customer,
            }
        }
    }
}

/// Display-name fallback: the local part of the account email.
fn fallback_name(user: &ProviderUser) -> String {
    user.email
        .split('@')
        .next()
        .unwrap_or(user.email.as_str())
        .to_string()
}

/// Validate a registration password.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
