//! Application state shared across the UI.
//!
//! Containers are constructed exactly once at process start and live until
//! shutdown; consumers receive references through [`App`], which is cheaply
//! cloneable via `Arc`.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::config::StorefrontConfig;
use crate::services::auth::AuthSession;
use crate::services::identity::{IdentityClient, IdentityError};
use crate::services::profiles::{ProfileStore, ProfileStoreError};
use crate::state::cart::CartState;
use crate::state::toast::Toasts;
use crate::state::wishlist::WishlistState;
use crate::storage::JsonFileStore;

/// Error building the application state.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("identity client error: {0}")]
    Identity(#[from] IdentityError),
    #[error("profile store error: {0}")]
    Profiles(#[from] ProfileStoreError),
}

/// Application state shared across all consumers.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: StorefrontConfig,
    cart: Mutex<CartState<JsonFileStore>>,
    wishlist: Mutex<WishlistState<JsonFileStore>>,
    toasts: Toasts,
    auth: AuthSession,
}

impl App {
    /// Build the containers and hydrate cart/wishlist from local snapshots.
    ///
    /// Must be called within a Tokio runtime; the auth session spawns its
    /// subscription task here.
    ///
    /// # Errors
    ///
    /// Returns an error if a service client cannot be constructed from the
    /// configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let provider = Arc::new(IdentityClient::new(&config.identity)?);
        let profiles = Arc::new(ProfileStore::new(&config.profiles_url)?);
        let auth = AuthSession::new(provider, profiles);

        let cart = Mutex::new(CartState::new(JsonFileStore::new(&config.storage_dir)));
        let wishlist = Mutex::new(WishlistState::new(JsonFileStore::new(&config.storage_dir)));

        Ok(Self {
            inner: Arc::new(AppInner {
                config,
                cart,
                wishlist,
                toasts: Toasts::new(),
                auth,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart container.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartState<JsonFileStore>> {
        &self.inner.cart
    }

    /// Get a reference to the wishlist container.
    #[must_use]
    pub fn wishlist(&self) -> &Mutex<WishlistState<JsonFileStore>> {
        &self.inner.wishlist
    }

    /// Get a reference to the notification container.
    #[must_use]
    pub fn toasts(&self) -> &Toasts {
        &self.inner.toasts
    }

    /// Get a reference to the auth session container.
    #[must_use]
    pub fn auth(&self) -> &AuthSession {
        &self.inner.auth
    }
}
