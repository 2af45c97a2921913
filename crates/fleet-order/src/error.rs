use fleet_core::{CoreError, Location, OrderId, Tick};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order deadline {deadline} precedes creation tick {created}")]
    InvalidWindow { created: Tick, deadline: Tick },

    #[error("order weight must be positive and finite, got {0}")]
    InvalidWeight(f64),

    #[error("order {0} already exists in the ledger")]
    DuplicateOrder(OrderId),

    #[error("order {0} is not in the ledger")]
    UnknownOrder(OrderId),

    #[error("order {id} cannot transition from {from} to {to}")]
    InvalidTransition {
        id: OrderId,
        from: &'static str,
        to: &'static str,
    },

    #[error("generator configuration error: {0}")]
    Config(String),

    #[error("no node at {0} in the generator's region")]
    UnknownLocation(Location),

    #[error("order schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type OrderResult<T> = Result<T, OrderError>;
