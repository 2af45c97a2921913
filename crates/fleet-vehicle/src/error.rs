use fleet_core::{Location, OrderId, VehicleId};
use thiserror::Error;

/// Operational and construction errors of the vehicle subsystem.
///
/// The operational variants (`NotAtNode`, `InvalidMove`, `CapacityExceeded`,
/// `LocationMismatch`, `OrderNotCarried`, `DuplicateOrder`) are returned to
/// the driving strategy and are recoverable — the tick continues.  The
/// builder variants are construction failures and fatal to that manager.
#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("vehicle {0} does not exist")]
    UnknownVehicle(VehicleId),

    #[error("vehicle {vehicle} is mid-edge and cannot start a new move")]
    NotAtNode { vehicle: VehicleId },

    #[error("no edge from {from} toward {to} for vehicle {vehicle}")]
    InvalidMove {
        vehicle: VehicleId,
        from: Location,
        to: Location,
    },

    #[error(
        "loading {weight:.2} onto vehicle {vehicle} exceeds capacity \
         ({load:.2} carried, {capacity:.2} max)"
    )]
    CapacityExceeded {
        vehicle: VehicleId,
        capacity: f64,
        load: f64,
        weight: f64,
    },

    #[error("vehicle {vehicle} is not at {expected}")]
    LocationMismatch {
        vehicle: VehicleId,
        expected: Location,
    },

    #[error("vehicle {vehicle} does not carry order {order}")]
    OrderNotCarried {
        vehicle: VehicleId,
        order: OrderId,
    },

    #[error("vehicle {vehicle} already carries order {order}")]
    DuplicateOrder {
        vehicle: VehicleId,
        order: OrderId,
    },

    // ── Builder validation ────────────────────────────────────────────────
    #[error("vehicle manager needs a region")]
    MissingRegion,

    #[error("vehicle capacity must be positive and finite, got {capacity}")]
    InvalidCapacity { capacity: f64 },

    #[error("vehicle starting location {0} is not a node of the region")]
    UnknownStartNode(Location),
}

pub type VehicleResult<T> = Result<T, VehicleError>;
