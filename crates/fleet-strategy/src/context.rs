//! The per-tick view handed to every strategy invocation.

use fleet_core::Tick;
use fleet_order::ConfirmedOrder;
use fleet_vehicle::{Event, VehicleManager};

/// Everything a [`DrivingStrategy`](crate::DrivingStrategy) may see and touch
/// during one tick.
///
/// Built fresh by the engine for every tick; borrows live only for the
/// strategy invocation.
pub struct StrategyContext<'a> {
    /// The tick being executed.
    pub tick: Tick,

    /// Events emitted earlier in this tick: arrivals from the movement
    /// phase, newly received orders, and expirations.  Events caused by the
    /// strategy's own operations are *not* visible here; they join the
    /// stream dispatched to listeners at the end of the tick.
    pub events: &'a [Event],

    /// The fleet.  All move/load/unload operations go through here and
    /// return their `Result` to the strategy.
    pub fleet: &'a mut VehicleManager,

    /// Orders admitted but not yet claimed by any vehicle.
    ///
    /// A strategy claims an order by removing it from this pool before (or
    /// while) loading it; orders left in the pool remain claimable next
    /// tick.  Expired orders are removed by the engine.
    pub unassigned: &'a mut Vec<ConfirmedOrder>,
}

impl<'a> StrategyContext<'a> {
    pub fn new(
        tick: Tick,
        events: &'a [Event],
        fleet: &'a mut VehicleManager,
        unassigned: &'a mut Vec<ConfirmedOrder>,
    ) -> Self {
        Self { tick, events, fleet, unassigned }
    }
}
