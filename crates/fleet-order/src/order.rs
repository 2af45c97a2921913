//! The immutable order descriptor.

use fleet_core::{Location, OrderId, Tick, TickInterval};

use crate::{OrderError, OrderResult};

/// A confirmed delivery request: pick cargo up at one node, drop it at
/// another, before the deadline.
///
/// `ConfirmedOrder` never changes after construction; delivery and expiry
/// are tracked by the [`OrderLedger`](crate::OrderLedger), not on the order
/// itself.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedOrder {
    id: OrderId,
    pickup: Location,
    delivery: Location,
    created: Tick,
    deadline: Tick,
    weight: f64,
}

impl ConfirmedOrder {
    /// Construct a validated order.
    ///
    /// # Errors
    ///
    /// [`OrderError::InvalidWindow`] if the deadline precedes the creation
    /// tick, [`OrderError::InvalidWeight`] for non-positive or non-finite
    /// weights.
    pub fn new(
        id: OrderId,
        pickup: Location,
        delivery: Location,
        created: Tick,
        deadline: Tick,
        weight: f64,
    ) -> OrderResult<Self> {
        if deadline < created {
            return Err(OrderError::InvalidWindow { created, deadline });
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(OrderError::InvalidWeight(weight));
        }
        Ok(Self { id, pickup, delivery, created, deadline, weight })
    }

    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Node the cargo must be picked up at.
    #[inline]
    pub fn pickup(&self) -> Location {
        self.pickup
    }

    /// Node the cargo must be dropped at.
    #[inline]
    pub fn delivery(&self) -> Location {
        self.delivery
    }

    /// Tick at which the order entered the system.
    #[inline]
    pub fn created(&self) -> Tick {
        self.created
    }

    /// Last tick at which delivery still counts as on time.
    #[inline]
    pub fn deadline(&self) -> Tick {
        self.deadline
    }

    /// Cargo weight, counted against vehicle capacity.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The window `[created, deadline]` as an interval.
    pub fn window(&self) -> TickInterval {
        // Validated at construction; reconstructing cannot fail.
        TickInterval::new(self.created, self.deadline)
            .unwrap_or_else(|_| unreachable!("order window validated at construction"))
    }

    /// `true` if delivering at `tick` would be on time.
    #[inline]
    pub fn in_time(&self, tick: Tick) -> bool {
        tick <= self.deadline
    }
}

impl std::fmt::Display for ConfirmedOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}→{} due {} ({} kg)",
            self.id, self.pickup, self.delivery, self.deadline, self.weight
        )
    }
}
