//! Domain models for the storefront.

pub mod cart;
pub mod session;

pub use cart::{CartLineView, CartView, LocalCartLine};
pub use session::{CurrentUser, mint_guest_token, resolve_owner};
