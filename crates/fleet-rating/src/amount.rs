//! Delivery-volume rater.

use fleet_core::Tick;
use fleet_sim::{Rater, RaterFactory, RatingCriteria, SimulationListener};
use fleet_vehicle::Event;

use crate::{RatingError, RatingResult};

/// Scores how much of the confirmed order volume was actually delivered.
///
/// The score starts at 1.0 and every undelivered order multiplies it by
/// `factor`: `score = factor ^ (received − delivered)`.  Expired orders were
/// received and never delivered, so they count against the score
/// automatically.  The score can recover while a run is in progress (a
/// pending order being delivered removes its penalty), but for a fixed set
/// of undelivered orders it only ever decreases.
pub struct AmountDeliveredRater {
    factor: f64,
    received: u64,
    delivered: u64,
}

impl SimulationListener for AmountDeliveredRater {
    fn on_tick(&mut self, events: &[Event], _tick: Tick) {
        for event in events {
            match event {
                Event::OrderReceived { .. } => self.received += 1,
                Event::OrderDelivered { .. } => self.delivered += 1,
                _ => {}
            }
        }
    }
}

impl Rater for AmountDeliveredRater {
    fn criteria(&self) -> RatingCriteria {
        RatingCriteria::AmountDelivered
    }

    fn score(&self) -> f64 {
        let undelivered = self.received.saturating_sub(self.delivered);
        self.factor.powi(undelivered.min(i32::MAX as u64) as i32)
    }
}

/// Validated factory for [`AmountDeliveredRater`].
#[derive(Copy, Clone, Debug)]
pub struct AmountDeliveredRaterFactory {
    factor: f64,
}

impl AmountDeliveredRaterFactory {
    pub const DEFAULT_FACTOR: f64 = 0.99;

    /// # Errors
    /// [`RatingError::FactorOutOfRange`] unless `0 < factor < 1`.
    pub fn new(factor: f64) -> RatingResult<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(RatingError::FactorOutOfRange { got: factor, range: "(0, 1)" });
        }
        Ok(Self { factor })
    }
}

impl Default for AmountDeliveredRaterFactory {
    fn default() -> Self {
        Self { factor: Self::DEFAULT_FACTOR }
    }
}

impl RaterFactory for AmountDeliveredRaterFactory {
    fn criteria(&self) -> RatingCriteria {
        RatingCriteria::AmountDelivered
    }

    fn create(&self) -> Box<dyn Rater> {
        Box::new(AmountDeliveredRater { factor: self.factor, received: 0, delivered: 0 })
    }
}
