//! Travel-distance rater.
//!
//! # Normalization
//!
//! The score needs a region-intrinsic reference to compare the fleet's
//! actual travel against.  This rater uses the region's **weighted diameter**
//! (longest finite shortest path): every received order is budgeted two
//! diameters — the worst useful detour a single order can force (drive the
//! long way to the pickup, then the long way to the delivery).  With
//!
//! ```text
//! reference = factor · 2 · diameter · orders_received
//! score     = max(0, 1 − distance_traveled / reference)
//! ```
//!
//! `factor` tightens (small) or relaxes (1.0) the budget.  While no orders
//! exist the reference is zero: an idle fleet scores 1.0 and any movement
//! without a reason to move scores 0.0.

use std::sync::Arc;

use fleet_core::Tick;
use fleet_region::{Region, weighted_diameter};
use fleet_sim::{Rater, RaterFactory, RatingCriteria, SimError, SimResult, SimulationListener};
use fleet_vehicle::{Event, VehicleManager};

use crate::{RatingError, RatingResult};

/// Scores fleet efficiency as an inverse function of distance traveled.
///
/// Distance is accumulated from [`Event::ArrivedAtNode`] — each completed
/// edge adds its duration.  Partial traversals still in progress at the end
/// of a run are not counted; only finished edges cost score.
pub struct TravelDistanceRater {
    factor: f64,
    /// Two weighted diameters, the per-order travel budget.
    budget_per_order: u64,
    distance: u64,
    received: u64,
}

impl SimulationListener for TravelDistanceRater {
    fn on_tick(&mut self, events: &[Event], _tick: Tick) {
        for event in events {
            match event {
                Event::ArrivedAtNode { via, .. } => self.distance += via.duration(),
                Event::OrderReceived { .. } => self.received += 1,
                _ => {}
            }
        }
    }
}

impl Rater for TravelDistanceRater {
    fn criteria(&self) -> RatingCriteria {
        RatingCriteria::TravelDistance
    }

    fn score(&self) -> f64 {
        let reference = self.factor * (self.budget_per_order * self.received) as f64;
        if reference <= 0.0 {
            return if self.distance == 0 { 1.0 } else { 0.0 };
        }
        (1.0 - self.distance as f64 / reference).max(0.0)
    }
}

/// Factory for [`TravelDistanceRater`], bound to the region it was built
/// against.
///
/// The factory's [`validate`](RaterFactory::validate) hook rejects any
/// vehicle manager whose region differs (by value) from this one — a
/// distance budget computed for one map is meaningless on another.
pub struct TravelDistanceRaterFactory {
    region: Arc<Region>,
    factor: f64,
    budget_per_order: u64,
}

impl TravelDistanceRaterFactory {
    pub const DEFAULT_FACTOR: f64 = 0.5;

    /// Build a factory for `region`; the region's weighted diameter is
    /// computed once, here.
    ///
    /// # Errors
    /// [`RatingError::FactorOutOfRange`] unless `0 < factor <= 1`.
    pub fn new(region: Arc<Region>, factor: f64) -> RatingResult<Self> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(RatingError::FactorOutOfRange { got: factor, range: "(0, 1]" });
        }
        let budget_per_order = 2 * weighted_diameter(&region);
        Ok(Self { region, factor, budget_per_order })
    }

    /// [`new`](Self::new) with [`DEFAULT_FACTOR`](Self::DEFAULT_FACTOR).
    pub fn for_region(region: Arc<Region>) -> Self {
        let budget_per_order = 2 * weighted_diameter(&region);
        Self { region, factor: Self::DEFAULT_FACTOR, budget_per_order }
    }
}

impl RaterFactory for TravelDistanceRaterFactory {
    fn criteria(&self) -> RatingCriteria {
        RatingCriteria::TravelDistance
    }

    fn create(&self) -> Box<dyn Rater> {
        Box::new(TravelDistanceRater {
            factor: self.factor,
            budget_per_order: self.budget_per_order,
            distance: 0,
            received: 0,
        })
    }

    fn validate(&self, manager: &VehicleManager) -> SimResult<()> {
        if manager.region() != self.region.as_ref() {
            return Err(SimError::RegionMismatch);
        }
        Ok(())
    }
}
