//! User profile types.
//!
//! [`UserProfile`] is the in-memory view held by the auth session while a
//! user is signed in. [`ProfileDocument`] is the wire format of the remote
//! record in the `profiles` collection; every field is optional there, and
//! the defaulting rules live at the read boundary in the auth session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shophub_core::Role;

/// The signed-in user as seen by the UI.
///
/// Held in memory only; discarded on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Opaque identifier from the identity provider.
    pub id: String,
    /// Account email address.
    pub email: String,
    /// Display name (stored full name, provider display name, or the
    /// local part of the email - first one available).
    pub name: String,
    /// Storefront role; never auto-escalated.
    pub role: Role,
}

impl UserProfile {
    /// Whether this user may access the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A remote profile document, keyed by provider user id.
///
/// `createdAt` is epoch milliseconds on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    /// Stored full name, if the user ever set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Stored role string; anything unrecognized reads as customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// When the document was first created.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}
