//! Authentication error types.

use thiserror::Error;

use shophub_core::EmailError;

use crate::services::identity::IdentityError;
use crate::services::profiles::ProfileStoreError;

/// Errors that can occur during authentication operations.
///
/// These are returned to the caller as values; the session state is left
/// unchanged when an operation fails.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Identity provider rejected the operation.
    #[error("identity provider error: {0}")]
    Provider(#[from] IdentityError),

    /// Profile document store rejected the operation.
    #[error("profile store error: {0}")]
    Profile(#[from] ProfileStoreError),
}
