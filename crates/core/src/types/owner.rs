//! Cart ownership.
//!
//! A server cart belongs to exactly one of: an authenticated user, or a
//! guest session. The two are mutually exclusive, which the enum makes
//! unrepresentable rather than relying on "at most one of two optional
//! fields is set".

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::UserId;

/// An opaque guest session token.
///
/// Minted by the storefront for shoppers who have not signed in and kept
/// in their session cookie. The token is opaque to this crate; the
/// storefront generates it from random bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GuestToken(String);

impl GuestToken {
    /// Wrap an already-generated token string.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(token)
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The owner of a server cart: an authenticated user or a guest session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CartOwner {
    /// An authenticated user, by document id.
    User(UserId),
    /// An anonymous shopper, by guest session token.
    Guest(GuestToken),
}

impl CartOwner {
    /// The query parameter key/value pair the cafe API uses to address
    /// this owner's cart.
    #[must_use]
    pub fn as_query(&self) -> (&'static str, &str) {
        match self {
            Self::User(id) => ("user", id.as_str()),
            Self::Guest(token) => ("guest", token.as_str()),
        }
    }

    /// Whether this owner is an authenticated user.
    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

impl fmt::Display for CartOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Guest(token) => write!(f, "guest:{token}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn user_owner_query_params() {
        let id = UserId::parse("0123456789abcdef01234567").unwrap();
        let owner = CartOwner::User(id);
        assert_eq!(owner.as_query(), ("user", "0123456789abcdef01234567"));
        assert!(owner.is_user());
    }

    #[test]
    fn guest_owner_query_params() {
        let owner = CartOwner::Guest(GuestToken::new("tok-abc123".to_string()));
        assert_eq!(owner.as_query(), ("guest", "tok-abc123"));
        assert!(!owner.is_user());
    }

    #[test]
    fn display_includes_kind() {
        let owner = CartOwner::Guest(GuestToken::new("tok".to_string()));
        assert_eq!(owner.to_string(), "guest:tok");
    }
}
