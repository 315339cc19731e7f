//! Post-sync verification.
//!
//! The last gate before order creation. Deliberately re-reads the server
//! cart instead of trusting the synchronizer's in-process counters, which
//! guards against read-after-write inconsistency or a silent partial
//! commit in the store layer.

use tracing::{instrument, warn};

use marigold_core::CartOwner;

use crate::cafe_api::CartStore;

/// Confirm the server cart exists and holds at least one item.
///
/// Any fetch failure (missing cart or transport error) counts as
/// verification failure, as does a cart with an empty item collection.
#[instrument(skip(store), fields(owner = %owner))]
pub async fn verify<S: CartStore + ?Sized>(store: &S, owner: &CartOwner) -> bool {
    match store.get_cart(owner).await {
        Ok(cart) => {
            if cart.items.is_empty() {
                warn!("server cart is empty after sync");
                false
            } else {
                true
            }
        }
        Err(e) => {
            warn!(error = %e, "failed to re-fetch cart for verification");
            false
        }
    }
}
