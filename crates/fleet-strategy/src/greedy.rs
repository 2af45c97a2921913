//! A nearest-first greedy dispatcher.
//!
//! Each idle vehicle picks a goal — the closest delivery among its cargo, or
//! failing that the closest claimable pickup — computes a shortest path to
//! it, and then follows that path one edge per decision point.  Unreachable
//! goals are skipped explicitly; a vehicle with no reachable goal parks.

use std::collections::{HashMap, VecDeque};

use fleet_core::{Location, VehicleId};
use fleet_region::RouteError;

use crate::{DrivingStrategy, StrategyContext, StrategyFactory};

/// Greedy nearest-goal dispatcher.
///
/// Per-vehicle waypoint queues are the only state; they are re-planned from
/// scratch whenever a move is rejected, so the strategy self-heals after any
/// operational error.
#[derive(Default)]
pub struct GreedyStrategy {
    /// Remaining waypoints per vehicle, front first.
    routes: HashMap<VehicleId, VecDeque<Location>>,
}

impl GreedyStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unload cargo addressed here, then claim and load waiting pickups
    /// while capacity lasts.
    fn exchange_cargo(cx: &mut StrategyContext<'_>, vehicle: VehicleId, node: Location) {
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
            let _ = cx.fleet.unload_order(vehicle, order, cx.tick);
        }

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
                cx.unassigned.push(order);
                break;
            }
        }
    }

    /// Choose the nearest goal for a vehicle standing at `node` and queue
    /// the path to it.  Cargo deliveries take priority over new pickups.
    fn plan(&mut self, cx: &StrategyContext<'_>, vehicle: VehicleId, node: Location) {
        let Some(v) = cx.fleet.vehicle(vehicle) else { return };

        let goals: Vec<Location> = if v.load().is_empty() {
            cx.unassigned.iter().map(|o| o.pickup()).collect()
        } else {
            v.load().iter().map(|o| o.delivery()).collect()
        };

        let mut best: Option<(u64, Location, VecDeque<Location>)> = None;
        for goal in goals {
            if goal == node {
                continue;
            }
            let route = match cx
                .fleet
                .path_calculator()
                .shortest_path(cx.fleet.region(), node, goal)
            {
                Ok(route) => route,
                // Disconnected goal: skip it, try the next one.
                Err(RouteError::Unreachable { .. }) | Err(RouteError::UnknownNode(_)) => continue,
            };
            let waypoints: VecDeque<Location> = route.node_sequence(node).into();
            let candidate = (route.total_duration, goal, waypoints);
            let better = match &best {
                None => true,
                Some((cost, loc, _)) => {
                    (candidate.0, candidate.1) < (*cost, *loc)
                }
            };
            if better {
                best = Some(candidate);
            }
        }

        if let Some((_, _, waypoints)) = best {
            self.routes.insert(vehicle, waypoints);
        }
    }

    /// Step the vehicle along its queued route, re-planning on rejection.
    fn follow_route(&mut self, cx: &mut StrategyContext<'_>, vehicle: VehicleId) {
        let Some(route) = self.routes.get_mut(&vehicle) else { return };
        let Some(&next) = route.front() else {
            self.routes.remove(&vehicle);
            return;
        };
        match cx.fleet.move_vehicle(vehicle, next, cx.tick) {
            Ok(()) => {
                route.pop_front();
                if route.is_empty() {
                    self.routes.remove(&vehicle);
                }
            }
            Err(_) => {
                // Stale plan (e.g. goal claimed elsewhere, or we re-planned
                // across an in-progress traversal).  Drop it and re-plan on
                // the next decision point.
                self.routes.remove(&vehicle);
            }
        }
    }
}

impl DrivingStrategy for GreedyStrategy {
    fn on_tick(&mut self, cx: &mut StrategyContext<'_>) {
        let standing: Vec<(VehicleId, Location)> = cx
            .fleet
            .vehicles()
            .iter()
            .filter_map(|v| v.position().node().map(|n| (v.id(), n)))
            .collect();

        for (vehicle, node) in standing {
            Self::exchange_cargo(cx, vehicle, node);

            if !self.routes.contains_key(&vehicle) {
                self.plan(cx, vehicle, node);
            }
            self.follow_route(cx, vehicle);
        }
    }
}

/// Factory for [`GreedyStrategy`].
#[derive(Copy, Clone, Debug, Default)]
pub struct GreedyStrategyFactory;

impl StrategyFactory for GreedyStrategyFactory {
    fn create(&self) -> Box<dyn DrivingStrategy> {
        Box::new(GreedyStrategy::new())
    }
}
