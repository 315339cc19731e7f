//! Cart synchronization: replay the validated snapshot into the server
//! cart.
//!
//! The synchronizer deletes any existing cart for the owner, then replays
//! each valid line through the single-item add operation, one at a time,
//! in snapshot order. Per-item failures are recorded and do not halt the
//! loop. No transaction wraps the delete and the adds: a crash (or a
//! failure tail) mid-replay leaves the server cart partially populated.
//! That window is accepted - the cafe API offers no batch replace - and
//! is logged explicitly whenever a sync finishes partial.

use tracing::{instrument, warn};

use marigold_core::CartOwner;

use crate::cafe_api::{CafeApiError, CartStore};
use crate::models::LocalCartLine;

use super::validate;

/// Per-line replay result.
#[derive(Debug)]
pub struct LineOutcome {
    /// Display name of the replayed line.
    pub display_name: String,
    /// Product reference of the replayed line.
    pub product_ref: String,
    /// The add failure, if the line did not persist.
    pub error: Option<CafeApiError>,
}

impl LineOutcome {
    /// Whether this line was added successfully.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of one synchronization attempt.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    /// Number of valid lines replayed (all of them, never fail-fast).
    pub attempted: usize,
    /// Number of lines that persisted.
    pub succeeded: usize,
    /// Per-line outcomes, in replay order.
    pub lines: Vec<LineOutcome>,
}

impl SyncOutcome {
    /// True iff at least one valid line was both present and added.
    #[must_use]
    pub const fn overall_success(&self) -> bool {
        self.succeeded > 0
    }

    /// Whether some but not all lines persisted.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.succeeded > 0 && self.succeeded < self.attempted
    }
}

/// Make the server cart match the local snapshot for this owner.
///
/// Algorithm, in order:
/// 1. Empty snapshot: fail immediately, no store calls.
/// 2. Validate; an empty valid set also fails without store calls - the
///    shopper's snapshot is stale or corrupt and proceeding to checkout
///    with zero items is never valid.
/// 3. Best-effort delete of the existing cart. A missing cart is the
///    normal case for first-time shoppers; any other failure is logged
///    and ignored.
/// 4. Replay every valid line sequentially through the single-item add.
///    Failures are recorded per line and later lines are still
///    attempted.
///
/// Replay order matches snapshot order post-filtering; no guarantee is
/// made about the resulting server-side line order if the store reorders
/// on add.
#[instrument(skip(store, snapshot), fields(owner = %owner, snapshot_len = snapshot.len()))]
pub async fn synchronize<S: CartStore + ?Sized>(
    store: &S,
    owner: &CartOwner,
    snapshot: &[LocalCartLine],
) -> SyncOutcome {
    if snapshot.is_empty() {
        return SyncOutcome::default();
    }

    let valid = validate(snapshot);
    if valid.is_empty() {
        warn!("no valid lines in snapshot, aborting sync");
        return SyncOutcome::default();
    }

    // Clear the previous cart so the replay is the whole cart, not an
    // append. Absence is not an error; anything else is best-effort.
    match store.delete_cart(owner).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => {
            warn!(error = %e, "failed to clear existing cart, continuing");
        }
    }

    let mut outcome = SyncOutcome {
        attempted: valid.len(),
        ..SyncOutcome::default()
    };

    for line in &valid {
        // validate() guarantees the ref parses; a None here would mean
        // the two checks drifted apart.
        let Some(input) = line.to_input() else {
            outcome.lines.push(LineOutcome {
                display_name: line.display_name.clone(),
                product_ref: line.product_ref.clone(),
                error: Some(CafeApiError::NotFound(format!(
                    "malformed product ref {}",
                    line.product_ref
                ))),
            });
            continue;
        };

        let error = match store.add_cart_item(owner, &input).await {
            Ok(_) => {
                outcome.succeeded += 1;
                None
            }
            Err(e) => {
                warn!(
                    product_ref = %line.product_ref,
                    name = %line.display_name,
                    error = %e,
                    "cart line failed to persist, continuing with remaining lines"
                );
                Some(e)
            }
        };

        outcome.lines.push(LineOutcome {
            display_name: line.display_name.clone(),
            product_ref: line.product_ref.clone(),
            error,
        });
    }

    if outcome.is_partial() {
        // The server cart now holds fewer lines than the shopper asked
        // for and there is no rollback. Make the window visible.
        warn!(
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            "cart sync completed partially; server cart holds a subset of the snapshot"
        );
    }

    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::{FakeCartStore, REF_A, REF_B, REF_C, guest, local_line};
    use super::*;

    #[tokio::test]
    async fn empty_snapshot_fails_without_store_calls() {
        let store = FakeCartStore::default();
        let owner = guest("tok");

        let outcome = synchronize(&store, &owner, &[]).await;

        assert!(!outcome.overall_success());
        assert_eq!(outcome.attempted, 0);
        assert_eq!(store.adds(), 0);
        assert_eq!(store.deletes(), 0);
    }

    #[tokio::test]
    async fn all_invalid_snapshot_fails_without_adds() {
        let store = FakeCartStore::default();
        let owner = guest("tok");
        let snapshot = vec![
            local_line("short", "Latte", 1),
            local_line(REF_A, "", 1),
        ];

        let outcome = synchronize(&store, &owner, &snapshot).await;

        assert!(!outcome.overall_success());
        assert_eq!(outcome.attempted, 0);
        assert_eq!(store.adds(), 0);
        assert_eq!(store.deletes(), 0);
    }

    #[tokio::test]
    async fn happy_path_clears_then_replays_in_order() {
        let store = FakeCartStore::default();
        let owner = guest("tok");

        // Seed an old cart that the sync must clear.
        let stale = vec![local_line(REF_C, "Stale Drip", 1)];
        synchronize(&store, &owner, &stale).await;

        let snapshot = vec![
            local_line(REF_A, "Latte", 2),
            local_line(REF_B, "Mocha", 1),
        ];
        let outcome = synchronize(&store, &owner, &snapshot).await;

        assert!(outcome.overall_success());
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.succeeded, 2);

        // The stale line is gone; replay order matches snapshot order.
        let names = store.cart_names(&owner).await;
        assert_eq!(names, [REF_A, REF_B]);
    }

    #[tokio::test]
    async fn invalid_lines_are_skipped_but_valid_ones_replay() {
        let store = FakeCartStore::default();
        let owner = guest("tok");
        let snapshot = vec![
            local_line("not-a-ref", "Ghost", 1),
            local_line(REF_A, "Latte", 1),
        ];

        let outcome = synchronize(&store, &owner, &snapshot).await;

        assert!(outcome.overall_success());
        assert_eq!(outcome.attempted, 1);
        assert_eq!(store.adds(), 1);
    }

    #[tokio::test]
    async fn per_line_failure_does_not_halt_replay() {
        let store = FakeCartStore::default();
        store.fail_ref(REF_B).await;
        let owner = guest("tok");
        let snapshot = vec![
            local_line(REF_A, "Latte", 1),
            local_line(REF_B, "Discontinued", 1),
            local_line(REF_C, "Cold Brew", 1),
        ];

        let outcome = synchronize(&store, &owner, &snapshot).await;

        // All three attempted, exactly one failed.
        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 2);
        assert!(outcome.overall_success());
        assert!(outcome.is_partial());
        assert_eq!(store.adds(), 3);

        // The failed line's outcome carries the store error.
        let failed: Vec<_> = outcome.lines.iter().filter(|l| !l.succeeded()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed.first().unwrap().product_ref, REF_B);

        // Only the surviving lines are in the server cart.
        let names = store.cart_names(&owner).await;
        assert_eq!(names, [REF_A, REF_C]);
    }

    #[tokio::test]
    async fn zero_adds_succeeding_is_overall_failure() {
        let store = FakeCartStore::default();
        store.fail_ref(REF_A).await;
        store.fail_ref(REF_B).await;
        let owner = guest("tok");
        let snapshot = vec![
            local_line(REF_A, "Latte", 1),
            local_line(REF_B, "Mocha", 1),
        ];

        let outcome = synchronize(&store, &owner, &snapshot).await;

        assert!(!outcome.overall_success());
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.succeeded, 0);
        // Both were still attempted - no fail-fast.
        assert_eq!(store.adds(), 2);
    }

    #[tokio::test]
    async fn delete_failure_is_swallowed() {
        let store = FakeCartStore::default();
        store
            .fail_deletes
            .store(true, std::sync::atomic::Ordering::Relaxed);
        let owner = guest("tok");
        let snapshot = vec![local_line(REF_A, "Latte", 1)];

        let outcome = synchronize(&store, &owner, &snapshot).await;

        // The failed delete did not abort the replay.
        assert!(outcome.overall_success());
        assert_eq!(store.deletes(), 1);
        assert_eq!(store.adds(), 1);
    }

    #[tokio::test]
    async fn missing_cart_on_delete_is_not_an_error() {
        let store = FakeCartStore::default();
        let owner = guest("fresh-shopper");
        let snapshot = vec![local_line(REF_A, "Latte", 1)];

        let outcome = synchronize(&store, &owner, &snapshot).await;

        assert!(outcome.overall_success());
        assert_eq!(outcome.succeeded, 1);
    }
}
