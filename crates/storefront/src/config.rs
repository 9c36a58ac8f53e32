//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPHUB_IDENTITY_URL` - Base URL of the identity provider REST API
//! - `SHOPHUB_IDENTITY_API_KEY` - Identity provider API key
//! - `SHOPHUB_PROFILES_URL` - Base URL of the profile document store
//!
//! ## Optional
//! - `SHOPHUB_ADMIN_API_URL` - Base URL for the admin CRUD endpoints
//! - `SHOPHUB_STORAGE_DIR` - Directory for local snapshots (default: .shophub)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default directory for local cart/wishlist snapshots.
const DEFAULT_STORAGE_DIR: &str = ".shophub";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Identity provider configuration
    pub identity: IdentityConfig,
    /// Base URL of the remote profile document store
    pub profiles_url: String,
    /// Base URL for the admin CRUD endpoints, if this client uses them
    pub admin_api_url: Option<String>,
    /// Directory where cart/wishlist snapshots are written
    pub storage_dir: PathBuf,
}

/// Identity provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Base URL of the identity provider REST API
    pub base_url: String,
    /// API key sent with every identity request
    pub api_key: SecretString,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or if a URL
    /// variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let identity = IdentityConfig {
            base_url: get_validated_url("SHOPHUB_IDENTITY_URL")?,
            api_key: SecretString::from(get_required_env("SHOPHUB_IDENTITY_API_KEY")?),
        };
        let profiles_url = get_validated_url("SHOPHUB_PROFILES_URL")?;
        let admin_api_url = match get_optional_env("SHOPHUB_ADMIN_API_URL") {
            Some(raw) => Some(validate_url("SHOPHUB_ADMIN_API_URL", &raw)?),
            None => None,
        };
        let storage_dir =
            PathBuf::from(get_env_or_default("SHOPHUB_STORAGE_DIR", DEFAULT_STORAGE_DIR));

        Ok(Self {
            identity,
            profiles_url,
            admin_api_url,
            storage_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable that must parse as a URL.
fn get_validated_url(key: &str) -> Result<String, ConfigError> {
    let raw = get_required_env(key)?;
    validate_url(key, &raw)
}

/// Check that a value parses as an absolute URL.
fn validate_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(raw.to_string())
}
