//! Marigold Cafe Core - Shared types library.
//!
//! This crate provides common types used across the Marigold Cafe
//! components:
//! - `storefront` - Customer-facing ordering service
//! - `integration-tests` - End-to-end test harness
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! database access. Everything here is pure data that can be used from
//! any component.
//!
//! # Modules
//!
//! - [`types`] - Validated document ids, cart ownership, prices, emails,
//!   and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
