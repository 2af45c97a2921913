//! Rating criteria and the rater traits.
//!
//! A [`Rater`] is a [`SimulationListener`] bound to exactly one
//! [`RatingCriteria`].  It folds the event stream into internal accumulators
//! and exposes a pure, idempotent [`score`](Rater::score) in `[0, 1]` that
//! can be read at any point of the run, not just the end.
//!
//! Concrete raters live in the `fleet-rating` crate; this module only
//! defines the contract the engine and problem definitions depend on.

use fleet_vehicle::VehicleManager;

use crate::{SimResult, SimulationListener};

// ── RatingCriteria ────────────────────────────────────────────────────────────

/// The closed set of criteria a simulation can be scored on.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RatingCriteria {
    /// Punctuality: were delivered orders on time?
    InTime,
    /// Throughput: how many confirmed orders were delivered at all?
    AmountDelivered,
    /// Efficiency: how much distance did the fleet burn doing it?
    TravelDistance,
}

impl RatingCriteria {
    pub const ALL: [RatingCriteria; 3] = [
        RatingCriteria::InTime,
        RatingCriteria::AmountDelivered,
        RatingCriteria::TravelDistance,
    ];

    /// Human-readable display name.
    pub fn display_name(self) -> &'static str {
        match self {
            RatingCriteria::InTime => "In Time",
            RatingCriteria::AmountDelivered => "Amount Delivered",
            RatingCriteria::TravelDistance => "Travel Distance",
        }
    }
}

impl std::fmt::Display for RatingCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ── Rater ─────────────────────────────────────────────────────────────────────

/// A scoring listener.
///
/// # Contract
///
/// - [`on_tick`](SimulationListener::on_tick) updates internal accumulators
///   from the given events only — no other state access.
/// - [`score`](Self::score) is a side-effect-free read returning a value in
///   `[0, 1]`; calling it twice without an intervening `on_tick` returns the
///   same value.
pub trait Rater: SimulationListener {
    /// The criterion this rater is designed for.
    fn criteria(&self) -> RatingCriteria;

    /// The score accumulated so far, in `[0, 1]`.
    fn score(&self) -> f64;
}

/// Constructs a fresh [`Rater`] per simulation run.
pub trait RaterFactory: Send + Sync {
    /// The criterion every rater from this factory is bound to.
    fn criteria(&self) -> RatingCriteria;

    fn create(&self) -> Box<dyn Rater>;

    /// Problem-construction hook: reject a vehicle manager this factory's
    /// raters cannot score (e.g. a distance rater built for a different
    /// region).  The default accepts everything.
    fn validate(&self, _manager: &VehicleManager) -> SimResult<()> {
        Ok(())
    }
}
