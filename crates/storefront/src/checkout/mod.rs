//! Checkout cart reconciliation.
//!
//! Bridges the client-held Local Cart Snapshot and the server cart the
//! cafe API persists, at the moment the shopper places an order. The
//! pipeline is linear with no back-edges and no automatic retry:
//!
//! ```text
//! Validating -> Synchronizing -> Verifying -> order creation
//!                     |               |
//!                     +---> Aborted <-+
//! ```
//!
//! Every abort maps to a retryable, user-facing message; nothing in this
//! flow is fatal to the process. The worst outcome is a blocked checkout
//! with a descriptive error.

mod sync;
mod validate;
mod verify;

pub use sync::{LineOutcome, SyncOutcome, synchronize};
pub use validate::validate;
pub use verify::verify;

use std::fmt;

use marigold_core::CartOwner;
use thiserror::Error;

use crate::cafe_api::CartStore;
use crate::models::LocalCartLine;

/// The phase a checkout attempt is in, for logging and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Validating,
    Synchronizing,
    Verifying,
    OrderCreation,
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Synchronizing => "synchronizing",
            Self::Verifying => "verifying",
            Self::OrderCreation => "order_creation",
        };
        f.write_str(name)
    }
}

/// Reasons a checkout aborts before order creation.
///
/// All variants are recoverable by the shopper; none should be treated as
/// a process error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// The snapshot was empty, or every line failed validation. The
    /// shopper's local cart is stale or corrupt and should be discarded.
    #[error("cart is empty or contains no valid items")]
    EmptyCart,

    /// Valid lines were submitted but none could be added to the server
    /// cart.
    #[error("unable to sync cart with the server")]
    SyncFailed,

    /// The re-read after synchronization found no cart or an empty one.
    #[error("cart could not be confirmed after sync")]
    VerificationFailed,
}

impl CheckoutError {
    /// The message shown to the shopper.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::EmptyCart => "Your cart is empty or its items are no longer valid. Please re-add items and try again.",
            Self::SyncFailed => "We couldn't sync your cart. Please try again.",
            Self::VerificationFailed => "We couldn't confirm your cart. Please try again.",
        }
    }

    /// Whether the client should discard its local cart copy.
    ///
    /// True only for the stale/corrupt-snapshot case; for transient sync
    /// and verification failures the local cart is still the best copy
    /// the shopper has.
    #[must_use]
    pub const fn reset_local_cart(self) -> bool {
        matches!(self, Self::EmptyCart)
    }

    /// The phase the abort happened in.
    #[must_use]
    pub const fn phase(self) -> CheckoutPhase {
        match self {
            Self::EmptyCart | Self::SyncFailed => CheckoutPhase::Synchronizing,
            Self::VerificationFailed => CheckoutPhase::Verifying,
        }
    }
}

/// Run the reconciliation pipeline up to the order-creation gate.
///
/// Synchronizes the snapshot into the owner's server cart, then
/// re-verifies the cart from the store. On success the server cart is
/// known non-empty and order creation may proceed.
///
/// # Errors
///
/// Returns a [`CheckoutError`] describing which gate aborted the
/// checkout.
pub async fn reconcile<S: CartStore + ?Sized>(
    store: &S,
    owner: &CartOwner,
    snapshot: &[LocalCartLine],
) -> Result<SyncOutcome, CheckoutError> {
    tracing::debug!(phase = %CheckoutPhase::Validating, owner = %owner, "reconciling cart snapshot");
    let outcome = synchronize(store, owner, snapshot).await;

    if !outcome.overall_success() {
        // Distinguish "nothing valid to sync" from "everything failed to
        // persist": the former means the local snapshot is unusable.
        if outcome.attempted == 0 {
            return Err(CheckoutError::EmptyCart);
        }
        return Err(CheckoutError::SyncFailed);
    }

    tracing::debug!(phase = %CheckoutPhase::Verifying, owner = %owner, "re-reading server cart");
    if !verify(store, owner).await {
        return Err(CheckoutError::VerificationFailed);
    }

    Ok(outcome)
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`CartStore`] fake for pipeline tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use tokio::sync::Mutex;

    use marigold_core::CartOwner;

    use crate::cafe_api::{
        CafeApiError, CartItemInput, CartStore, ItemModifiers, ServerCart, ServerCartLine,
    };

    /// Fake store: carts keyed by owner display string, with programmable
    /// failures.
    #[derive(Default)]
    pub struct FakeCartStore {
        pub carts: Mutex<HashMap<String, ServerCart>>,
        /// Product refs whose add always fails (e.g. deleted catalog
        /// items).
        pub failing_refs: Mutex<HashSet<String>>,
        /// Force every get_cart to fail.
        pub fail_gets: std::sync::atomic::AtomicBool,
        /// Force every delete_cart to fail with a non-NotFound error.
        pub fail_deletes: std::sync::atomic::AtomicBool,
        pub delete_calls: AtomicU64,
        pub add_calls: AtomicU64,
        pub get_calls: AtomicU64,
    }

    impl FakeCartStore {
        pub async fn fail_ref(&self, product_ref: &str) {
            self.failing_refs.lock().await.insert(product_ref.to_string());
        }

        pub async fn cart_names(&self, owner: &CartOwner) -> Vec<String> {
            self.carts
                .lock()
                .await
                .get(&owner.to_string())
                .map(|cart| cart.items.iter().map(|l| l.name.clone()).collect())
                .unwrap_or_default()
        }

        /// Drop the owner's cart out from under the pipeline, simulating
        /// a concurrent consumer.
        pub async fn evict(&self, owner: &CartOwner) {
            self.carts.lock().await.remove(&owner.to_string());
        }

        pub fn adds(&self) -> u64 {
            self.add_calls.load(Ordering::Relaxed)
        }

        pub fn deletes(&self) -> u64 {
            self.delete_calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl CartStore for FakeCartStore {
        async fn delete_cart(&self, owner: &CartOwner) -> Result<(), CafeApiError> {
            self.delete_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_deletes.load(Ordering::Relaxed) {
                return Err(CafeApiError::Upstream {
                    status: 500,
                    message: "injected delete failure".to_string(),
                });
            }
            match self.carts.lock().await.remove(&owner.to_string()) {
                Some(_) => Ok(()),
                None => Err(CafeApiError::NotFound(format!("cart for {owner}"))),
            }
        }

        async fn add_cart_item(
            &self,
            owner: &CartOwner,
            input: &CartItemInput,
        ) -> Result<ServerCart, CafeApiError> {
            self.add_calls.fetch_add(1, Ordering::Relaxed);
            if self.failing_refs.lock().await.contains(input.item.as_str()) {
                return Err(CafeApiError::Rejected {
                    status: 422,
                    message: "catalog item no longer exists".to_string(),
                });
            }

            let mut carts = self.carts.lock().await;
            let key = owner.to_string();
            let cart = carts.entry(key.clone()).or_insert_with(|| ServerCart {
                id: format!("cart-{key}"),
                user: None,
                guest_id: None,
                items: Vec::new(),
                total_amount: Decimal::ZERO,
            });
            cart.items.push(ServerCartLine {
                item: input.item.clone(),
                name: input.item.to_string(),
                quantity: input.quantity,
                price: Decimal::new(400, 2),
                modifiers: input.modifiers.clone(),
            });
            cart.total_amount += Decimal::new(400, 2) * Decimal::from(input.quantity);
            Ok(cart.clone())
        }

        async fn get_cart(&self, owner: &CartOwner) -> Result<ServerCart, CafeApiError> {
            self.get_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_gets.load(Ordering::Relaxed) {
                return Err(CafeApiError::Upstream {
                    status: 500,
                    message: "injected get failure".to_string(),
                });
            }
            self.carts
                .lock()
                .await
                .get(&owner.to_string())
                .cloned()
                .ok_or_else(|| CafeApiError::NotFound(format!("cart for {owner}")))
        }
    }

    /// Shorthand for a guest owner in tests.
    #[must_use]
    pub fn guest(token: &str) -> CartOwner {
        CartOwner::Guest(marigold_core::GuestToken::new(token.to_string()))
    }

    /// Shorthand for a local line in tests.
    #[must_use]
    pub fn local_line(product_ref: &str, name: &str, quantity: u32) -> crate::models::LocalCartLine {
        crate::models::LocalCartLine {
            product_ref: product_ref.to_string(),
            display_name: name.to_string(),
            quantity,
            special_instructions: None,
            selected_size: None,
            selected_milk: None,
            add_cold_foam: None,
        }
    }

    // A couple of well-formed refs for tests.
    pub const REF_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaa";
    pub const REF_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbb";
    pub const REF_C: &str = "cccccccccccccccccccccccc";
}
