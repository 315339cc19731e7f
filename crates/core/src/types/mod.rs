//! Core types for Marigold Cafe.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod owner;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use owner::{CartOwner, GuestToken};
pub use price::{CurrencyCode, Price};
pub use status::*;
