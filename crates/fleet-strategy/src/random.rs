//! A seeded random-walk strategy.
//!
//! Vehicles wander to a random adjacent node whenever they stand still,
//! delivering whatever they happen to carry to wherever they happen to be,
//! and picking up whatever waits at their current node.  It is a terrible
//! dispatcher and a very useful one: it exercises every manager operation,
//! and with a fixed seed it replays exactly.

use fleet_core::{Location, SimRng, VehicleId};

use crate::{DrivingStrategy, StrategyContext, StrategyFactory};

/// Random-walk dispatcher with deterministic, seeded randomness.
pub struct RandomStrategy {
    rng: SimRng,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self { rng: SimRng::new(seed) }
    }

    fn act(&mut self, cx: &mut StrategyContext<'_>, vehicle: VehicleId, node: Location) {
        // Drop off any cargo addressed to this node.
        let deliverable: Vec<_> = match cx.fleet.vehicle(vehicle) {
            Some(v) => v
                .load()
                .iter()
                .filter(|o| o.delivery() == node)
                .map(|o| o.id())
                .collect(),
            None => return,
        };
        for order in deliverable {
            // Position and possession were just checked; a failure here
            // means another action raced us within the tick — skip it.
            let _ = cx.fleet.unload_order(vehicle, order, cx.tick);
        }

        // Claim waiting orders at this node while capacity lasts.
        loop {
            let Some(v) = cx.fleet.vehicle(vehicle) else { return };
            let headroom = v.capacity() - v.current_weight();
            let Some(i) = cx
                .unassigned
                .iter()
                .position(|o| o.pickup() == node && o.weight() <= headroom)
            else {
                break;
            };
            let order = cx.unassigned.remove(i);
            if cx.fleet.load_order(vehicle, order.clone(), cx.tick).is_err() {
                // Put it back for somebody else and stop trying this tick.
                cx.unassigned.push(order);
                break;
            }
        }

        // Wander off.
        let neighbors: Vec<Location> = cx
            .fleet
            .region()
            .node(node)
            .map(|n| n.adjacent_locations().collect())
            .unwrap_or_default();
        if let Some(&next) = self.rng.choose(&neighbors) {
            // A dead-end region or a same-tick conflict leaves the vehicle
            // parked; that is an acceptable outcome for a random walk.
            let _ = cx.fleet.move_vehicle(vehicle, next, cx.tick);
        }
    }
}

impl DrivingStrategy for RandomStrategy {
    fn on_tick(&mut self, cx: &mut StrategyContext<'_>) {
        // Act on every vehicle standing at a node this tick: freshly spawned,
        // just arrived, or parked earlier because it had nowhere to go.
        let standing: Vec<(VehicleId, Location)> = cx
            .fleet
            .vehicles()
            .iter()
            .filter_map(|v| v.position().node().map(|n| (v.id(), n)))
            .collect();

        for (vehicle, node) in standing {
            self.act(cx, vehicle, node);
        }
    }
}

/// Factory for [`RandomStrategy`]; every run gets the same seed and thus the
/// same walk.
#[derive(Copy, Clone, Debug)]
pub struct RandomStrategyFactory {
    pub seed: u64,
}

impl RandomStrategyFactory {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl StrategyFactory for RandomStrategyFactory {
    fn create(&self) -> Box<dyn DrivingStrategy> {
        Box::new(RandomStrategy::new(self.seed))
    }
}
