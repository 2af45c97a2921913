//! Punctuality rater.

use fleet_core::Tick;
use fleet_sim::{Rater, RaterFactory, RatingCriteria, SimulationListener};
use fleet_vehicle::Event;

/// Scores the fraction of delivered orders that arrived on time, i.e. with
/// delivery tick ≤ deadline.
///
/// A run that delivers nothing scores 0.0 — an idle fleet is never punctual.
#[derive(Default)]
pub struct InTimeRater {
    delivered: u64,
    on_time: u64,
}

impl SimulationListener for InTimeRater {
    fn on_tick(&mut self, events: &[Event], _tick: Tick) {
        for event in events {
            if let Event::OrderDelivered { tick, order, .. } = event {
                self.delivered += 1;
                if order.in_time(*tick) {
                    self.on_time += 1;
                }
            }
        }
    }
}

impl Rater for InTimeRater {
    fn criteria(&self) -> RatingCriteria {
        RatingCriteria::InTime
    }

    fn score(&self) -> f64 {
        if self.delivered == 0 {
            0.0
        } else {
            self.on_time as f64 / self.delivered as f64
        }
    }
}

/// Factory for [`InTimeRater`].
#[derive(Copy, Clone, Debug, Default)]
pub struct InTimeRaterFactory;

impl RaterFactory for InTimeRaterFactory {
    fn criteria(&self) -> RatingCriteria {
        RatingCriteria::InTime
    }

    fn create(&self) -> Box<dyn Rater> {
        Box::new(InTimeRater::default())
    }
}
