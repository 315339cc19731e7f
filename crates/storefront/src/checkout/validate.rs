//! Local cart snapshot validation.
//!
//! Decides, per line, whether it is eligible for server-side replay. A
//! line is kept iff its product reference has the 24-lowercase-hex shape
//! of a document id AND its display name is non-empty. Everything else is
//! dropped silently - individual invalid lines are not an error, an
//! entirely invalid snapshot is the synchronizer's problem.

use crate::models::LocalCartLine;

/// Filter a snapshot down to the lines eligible for replay.
///
/// Pure and total: preserves the order of surviving lines, never mutates
/// them, and never fails. Empty input yields empty output.
#[must_use]
pub fn validate(snapshot: &[LocalCartLine]) -> Vec<LocalCartLine> {
    snapshot
        .iter()
        .filter(|line| line.is_valid())
        .cloned()
        .collect()
}
