//! `fleet-rating` — the built-in scoring listeners.
//!
//! Each rater implements [`Rater`](fleet_sim::Rater) for exactly one
//! [`RatingCriteria`](fleet_sim::RatingCriteria), folds the event stream
//! into a handful of counters, and exposes a pure `score()` in `[0, 1]`:
//!
//! | Rater                   | Criterion        | Score                                   |
//! |-------------------------|------------------|-----------------------------------------|
//! | [`AmountDeliveredRater`]| Amount Delivered | `factor ^ undelivered`                  |
//! | [`InTimeRater`]         | In Time          | delivered-on-time / delivered           |
//! | [`TravelDistanceRater`] | Travel Distance  | `1 − distance / (factor · reference)`   |
//!
//! Raters see nothing but events, so they can be driven by a live
//! simulation or by synthetic event lists in tests — both score the same.

pub mod amount;
pub mod error;
pub mod in_time;
pub mod travel;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use amount::{AmountDeliveredRater, AmountDeliveredRaterFactory};
pub use error::{RatingError, RatingResult};
pub use in_time::{InTimeRater, InTimeRaterFactory};
pub use travel::{TravelDistanceRater, TravelDistanceRaterFactory};
