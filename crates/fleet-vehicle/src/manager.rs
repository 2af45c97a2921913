//! The `VehicleManager` — single mutator of fleet state.

use std::sync::Arc;

use fleet_core::{Location, OrderId, Tick, VehicleId};
use fleet_order::ConfirmedOrder;
use fleet_region::{DijkstraPathCalculator, PathCalculator, Region};

use crate::{Event, EventLog, Vehicle, VehicleError, VehiclePosition, VehicleResult};

// ── VehicleManager ────────────────────────────────────────────────────────────

/// Owns the region (shared, read-only) and the live fleet, and arbitrates
/// every movement and load operation.
///
/// Operations validate, mutate, and record an [`Event`] — or fail without
/// touching anything.  The engine drains the event log once per tick via
/// [`take_events`](Self::take_events).
pub struct VehicleManager {
    region: Arc<Region>,
    path_calculator: Box<dyn PathCalculator>,
    vehicles: Vec<Vehicle>,
    events: EventLog,
}

impl std::fmt::Debug for VehicleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleManager")
            .field("vehicle_count", &self.vehicles.len())
            .finish_non_exhaustive()
    }
}

impl VehicleManager {
    /// Returns a new [`VehicleManagerBuilder`].
    pub fn builder() -> VehicleManagerBuilder {
        VehicleManagerBuilder::new()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// A new shared handle to the region.
    pub fn shared_region(&self) -> Arc<Region> {
        Arc::clone(&self.region)
    }

    /// The routing engine strategies should use for path planning.
    pub fn path_calculator(&self) -> &dyn PathCalculator {
        self.path_calculator.as_ref()
    }

    /// All vehicles, in ID order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Begin moving `vehicle` from its current node onto the edge toward the
    /// adjacent location `toward`.
    ///
    /// # Errors
    ///
    /// [`VehicleError::NotAtNode`] if the vehicle is mid-edge,
    /// [`VehicleError::InvalidMove`] if no edge connects its node to
    /// `toward`.
    pub fn move_vehicle(
        &mut self,
        vehicle: VehicleId,
        toward: Location,
        now: Tick,
    ) -> VehicleResult<()> {
        let v = self.vehicle_mut(vehicle)?;
        let from = match v.position.node() {
            Some(node) => node,
            None => return Err(VehicleError::NotAtNode { vehicle }),
        };
        let edge = self
            .region
            .edge(from, toward)
            .filter(|e| e.other_endpoint(from) == Some(toward))
            .cloned()
            .ok_or(VehicleError::InvalidMove { vehicle, from, to: toward })?;

        let v = self.vehicle_mut(vehicle)?;
        v.position = VehiclePosition::OnEdge { from, to: toward, progress: 0 };
        self.events.push(Event::EnteredEdge { tick: now, vehicle, from, edge });
        Ok(())
    }

    /// Advance every in-transit vehicle by one tick of progress.
    ///
    /// Vehicles whose progress reaches their edge's duration arrive at the
    /// far node (an [`Event::ArrivedAtNode`] is recorded) and can receive new
    /// decisions during the same tick.  Vehicles are processed in ID order
    /// for deterministic event sequences.
    pub fn advance_tick(&mut self, now: Tick) {
        for i in 0..self.vehicles.len() {
            let VehiclePosition::OnEdge { from, to, progress } = self.vehicles[i].position else {
                continue;
            };
            let Some(edge) = self.region.edge(from, to).cloned() else {
                // The region is validated and immutable; a recorded traversal
                // always has its edge.
                continue;
            };

            let progress = progress + 1;
            if progress >= edge.duration() {
                self.vehicles[i].position = VehiclePosition::AtNode { node: to };
                self.events.push(Event::ArrivedAtNode {
                    tick: now,
                    vehicle: self.vehicles[i].id(),
                    node: to,
                    via: edge,
                });
            } else {
                self.vehicles[i].position = VehiclePosition::OnEdge { from, to, progress };
            }
        }
    }

    /// Load `order` onto `vehicle` at the order's pickup node.
    ///
    /// Fails without mutating on a wrong location, an already-carried order,
    /// or a capacity overrun.
    pub fn load_order(
        &mut self,
        vehicle: VehicleId,
        order: ConfirmedOrder,
        now: Tick,
    ) -> VehicleResult<()> {
        let v = self.vehicle_ref(vehicle)?;
        if v.position.node() != Some(order.pickup()) {
            return Err(VehicleError::LocationMismatch { vehicle, expected: order.pickup() });
        }
        if v.carries(order.id()) {
            return Err(VehicleError::DuplicateOrder { vehicle, order: order.id() });
        }
        let load = v.current_weight();
        if load + order.weight() > v.capacity() {
            return Err(VehicleError::CapacityExceeded {
                vehicle,
                capacity: v.capacity(),
                load,
                weight: order.weight(),
            });
        }

        let v = self.vehicle_mut(vehicle)?;
        v.load.push(order.clone());
        self.events.push(Event::OrderLoaded { tick: now, vehicle, order });
        Ok(())
    }

    /// Unload the carried order `order` at its delivery node.
    pub fn unload_order(
        &mut self,
        vehicle: VehicleId,
        order: OrderId,
        now: Tick,
    ) -> VehicleResult<()> {
        let v = self.vehicle_ref(vehicle)?;
        let Some(idx) = v.load.iter().position(|o| o.id() == order) else {
            return Err(VehicleError::OrderNotCarried { vehicle, order });
        };
        let destination = v.load[idx].delivery();
        if v.position.node() != Some(destination) {
            return Err(VehicleError::LocationMismatch { vehicle, expected: destination });
        }

        let v = self.vehicle_mut(vehicle)?;
        let order = v.load.remove(idx);
        self.events.push(Event::OrderDelivered { tick: now, vehicle, order });
        Ok(())
    }

    /// Return every vehicle to its starting node with an empty load and
    /// queue fresh spawn events.
    pub fn reset(&mut self) {
        self.events = EventLog::new();
        for v in &mut self.vehicles {
            v.reset();
        }
        self.queue_spawn_events(Tick::ZERO);
    }

    /// Drain all events recorded since the last call, in emission order.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn queue_spawn_events(&mut self, tick: Tick) {
        for v in &self.vehicles {
            self.events.push(Event::VehicleSpawned {
                tick,
                vehicle: v.id(),
                node: v.start(),
            });
        }
    }

    fn vehicle_ref(&self, id: VehicleId) -> VehicleResult<&Vehicle> {
        self.vehicles.get(id.index()).ok_or(VehicleError::UnknownVehicle(id))
    }

    fn vehicle_mut(&mut self, id: VehicleId) -> VehicleResult<&mut Vehicle> {
        self.vehicles.get_mut(id.index()).ok_or(VehicleError::UnknownVehicle(id))
    }
}

// ── VehicleManagerBuilder ─────────────────────────────────────────────────────

/// Fluent builder for [`VehicleManager`].
///
/// # Required inputs
///
/// - `.region(...)` — the validated, shared region graph.
///
/// # Optional inputs
///
/// | Method                 | Default                      |
/// |------------------------|------------------------------|
/// | `.path_calculator(..)` | [`DijkstraPathCalculator`]   |
/// | `.add_vehicle(..)`     | no vehicles                  |
pub struct VehicleManagerBuilder {
    region: Option<Arc<Region>>,
    path_calculator: Option<Box<dyn PathCalculator>>,
    vehicles: Vec<(Location, f64)>,
}

impl VehicleManagerBuilder {
    pub fn new() -> Self {
        Self { region: None, path_calculator: None, vehicles: Vec::new() }
    }

    pub fn region(mut self, region: Arc<Region>) -> Self {
        self.region = Some(region);
        self
    }

    pub fn path_calculator(mut self, calculator: Box<dyn PathCalculator>) -> Self {
        self.path_calculator = Some(calculator);
        self
    }

    /// Add a vehicle spawning at `start` with the given weight capacity.
    pub fn add_vehicle(mut self, start: Location, capacity: f64) -> Self {
        self.vehicles.push((start, capacity));
        self
    }

    /// Remove all vehicles previously added at `start`.
    pub fn remove_vehicles_at(mut self, start: Location) -> Self {
        self.vehicles.retain(|(l, _)| *l != start);
        self
    }

    /// Validate and build.  Vehicles receive sequential IDs in insertion
    /// order and spawn events are queued for the first tick.
    ///
    /// # Errors
    ///
    /// [`VehicleError::MissingRegion`], [`VehicleError::InvalidCapacity`],
    /// or [`VehicleError::UnknownStartNode`].
    pub fn build(self) -> VehicleResult<VehicleManager> {
        let region = self.region.ok_or(VehicleError::MissingRegion)?;

        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        for (i, (start, capacity)) in self.vehicles.into_iter().enumerate() {
            if !capacity.is_finite() || capacity <= 0.0 {
                return Err(VehicleError::InvalidCapacity { capacity });
            }
            if region.node(start).is_none() {
                return Err(VehicleError::UnknownStartNode(start));
            }
            vehicles.push(Vehicle::new(VehicleId(i as u32), start, capacity));
        }

        let mut manager = VehicleManager {
            region,
            path_calculator: self
                .path_calculator
                .unwrap_or_else(|| Box::new(DijkstraPathCalculator)),
            vehicles,
            events: EventLog::new(),
        };
        manager.queue_spawn_events(Tick::ZERO);
        Ok(manager)
    }
}

impl Default for VehicleManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
