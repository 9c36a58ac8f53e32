//! User role type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's role on the storefront.
///
/// Roles come from the remote profile document and default to `Customer`
/// whenever the stored value is absent or unrecognized. Nothing in the
/// client core ever escalates a role; `Admin` only appears when the
/// profile document explicitly says so.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper (the default).
    #[default]
    Customer,
    /// Admin panel access.
    Admin,
}

impl Role {
    /// Parse a stored role string, falling back to `Customer`.
    ///
    /// Unknown or absent values map to `Customer` so a malformed profile
    /// document can never grant elevated access.
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Admin,
            _ => Self::Customer,
        }
    }

    /// The wire representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    /// Whether this role grants admin panel access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
