//! Session-related types.
//!
//! The session carries just enough to resolve a cart owner: the signed-in
//! user if there is one, otherwise a guest token minted on first use.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use marigold_core::{CartOwner, Email, GuestToken, UserId};

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's document id in the cafe API.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the anonymous shopper's guest token.
    pub const GUEST_TOKEN: &str = "guest_token";
}

/// Mint a fresh guest token from 32 random bytes, URL-safe encoded.
#[must_use]
pub fn mint_guest_token() -> GuestToken {
    let bytes: [u8; 32] = rand::rng().random();
    GuestToken::new(URL_SAFE_NO_PAD.encode(bytes))
}

/// Resolve the cart owner for this session.
///
/// A signed-in user owns their cart by user id. Anonymous shoppers get a
/// guest token, minted and persisted in the session on first need so the
/// same cart is addressed across requests.
///
/// # Errors
///
/// Returns a session error if the backing store fails.
pub async fn resolve_owner(session: &Session) -> Result<CartOwner, tower_sessions::session::Error> {
    if let Some(user) = session.get::<CurrentUser>(keys::CURRENT_USER).await? {
        return Ok(CartOwner::User(user.id));
    }

    if let Some(token) = session.get::<GuestToken>(keys::GUEST_TOKEN).await? {
        return Ok(CartOwner::Guest(token));
    }

    let token = mint_guest_token();
    session.insert(keys::GUEST_TOKEN, &token).await?;
    Ok(CartOwner::Guest(token))
}
