//! Simulation events and the per-tick event log.
//!
//! Every observable state change — a vehicle entering an edge, an order
//! changing hands — is described by one [`Event`].  Events are the only
//! channel between the mutable simulation state and its observers: raters
//! fold them into scores, GUIs render them, tests assert on them.  Emission
//! order within a tick is meaningful and preserved.

use fleet_core::{Location, Tick, VehicleId};
use fleet_order::ConfirmedOrder;
use fleet_region::Edge;

// ── Event ─────────────────────────────────────────────────────────────────────

/// Something that happened during a tick.
#[derive(Clone, PartialEq, Debug)]
pub enum Event {
    /// A vehicle was placed at its starting node (simulation setup or reset).
    VehicleSpawned {
        tick: Tick,
        vehicle: VehicleId,
        node: Location,
    },

    /// A vehicle left `from` onto `edge`.
    EnteredEdge {
        tick: Tick,
        vehicle: VehicleId,
        from: Location,
        edge: Edge,
    },

    /// A vehicle finished traversing `via` and now stands at `node`.
    ArrivedAtNode {
        tick: Tick,
        vehicle: VehicleId,
        node: Location,
        via: Edge,
    },

    /// A new order entered the system.
    OrderReceived { tick: Tick, order: ConfirmedOrder },

    /// A vehicle picked the order up at its pickup node.
    OrderLoaded {
        tick: Tick,
        vehicle: VehicleId,
        order: ConfirmedOrder,
    },

    /// A vehicle dropped the order at its delivery node.
    OrderDelivered {
        tick: Tick,
        vehicle: VehicleId,
        order: ConfirmedOrder,
    },

    /// The order's deadline passed while it was undelivered.
    OrderExpired { tick: Tick, order: ConfirmedOrder },
}

impl Event {
    /// The tick during which this event occurred.
    pub fn tick(&self) -> Tick {
        match self {
            Event::VehicleSpawned { tick, .. }
            | Event::EnteredEdge { tick, .. }
            | Event::ArrivedAtNode { tick, .. }
            | Event::OrderReceived { tick, .. }
            | Event::OrderLoaded { tick, .. }
            | Event::OrderDelivered { tick, .. }
            | Event::OrderExpired { tick, .. } => *tick,
        }
    }

    /// The vehicle involved, if any.
    pub fn vehicle(&self) -> Option<VehicleId> {
        match self {
            Event::VehicleSpawned { vehicle, .. }
            | Event::EnteredEdge { vehicle, .. }
            | Event::ArrivedAtNode { vehicle, .. }
            | Event::OrderLoaded { vehicle, .. }
            | Event::OrderDelivered { vehicle, .. } => Some(*vehicle),
            Event::OrderReceived { .. } | Event::OrderExpired { .. } => None,
        }
    }

    /// The order involved, if any.
    pub fn order(&self) -> Option<&ConfirmedOrder> {
        match self {
            Event::OrderReceived { order, .. }
            | Event::OrderLoaded { order, .. }
            | Event::OrderDelivered { order, .. }
            | Event::OrderExpired { order, .. } => Some(order),
            _ => None,
        }
    }
}

// ── EventLog ──────────────────────────────────────────────────────────────────

/// An append-only queue of events awaiting end-of-tick dispatch.
///
/// The simulation is single-threaded within a tick, so this is a plain `Vec`
/// — emission order is exactly append order.
#[derive(Default)]
pub struct EventLog {
    queued: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.queued.push(event);
    }

    /// Drain all queued events, preserving emission order.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.queued)
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}
