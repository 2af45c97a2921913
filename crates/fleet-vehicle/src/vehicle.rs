//! The `Vehicle` entity.

use fleet_core::{Location, OrderId, VehicleId};
use fleet_order::ConfirmedOrder;

use crate::VehiclePosition;

/// A delivery vehicle.
///
/// Owned by the [`VehicleManager`](crate::VehicleManager) for the lifetime of
/// the simulation; all mutation goes through the manager's operations.
#[derive(Clone, Debug)]
pub struct Vehicle {
    id: VehicleId,
    capacity: f64,
    start: Location,
    pub(crate) position: VehiclePosition,
    pub(crate) load: Vec<ConfirmedOrder>,
}

impl Vehicle {
    pub(crate) fn new(id: VehicleId, start: Location, capacity: f64) -> Self {
        Self {
            id,
            capacity,
            start,
            position: VehiclePosition::AtNode { node: start },
            load: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Maximum total cargo weight this vehicle can carry.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// The node this vehicle spawns at (and returns to on reset).
    #[inline]
    pub fn start(&self) -> Location {
        self.start
    }

    #[inline]
    pub fn position(&self) -> VehiclePosition {
        self.position
    }

    /// Orders currently on board.
    pub fn load(&self) -> &[ConfirmedOrder] {
        &self.load
    }

    /// Summed weight of all carried orders.
    pub fn current_weight(&self) -> f64 {
        self.load.iter().map(ConfirmedOrder::weight).sum()
    }

    /// `true` if the given order is on board.
    pub fn carries(&self, order: OrderId) -> bool {
        self.load.iter().any(|o| o.id() == order)
    }

    pub(crate) fn reset(&mut self) {
        self.position = VehiclePosition::AtNode { node: self.start };
        self.load.clear();
    }
}

impl std::fmt::Display for Vehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({:.1}/{:.1} kg, {} orders)",
            self.id,
            self.position,
            self.current_weight(),
            self.capacity,
            self.load.len()
        )
    }
}
