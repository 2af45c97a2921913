//! Region-subsystem error types.

use fleet_core::Location;
use thiserror::Error;

/// Construction-time validation failures.  A region that fails to build is
/// never partially usable — `RegionBuilder::build` returns before any graph
/// state escapes.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("duplicate component name {0:?}")]
    DuplicateName(String),

    #[error("duplicate node at {0}")]
    DuplicateNode(Location),

    #[error("duplicate edge between {a} and {b}")]
    DuplicateEdge { a: Location, b: Location },

    #[error("edge {name:?} endpoint {location} is not a node of this region")]
    MissingEndpoint { name: String, location: Location },

    #[error("edge {name:?} connects {location} to itself")]
    SelfLoop { name: String, location: Location },

    #[error("edge {name:?} has zero duration")]
    ZeroDuration { name: String },
}

pub type RegionResult<T> = Result<T, RegionError>;

/// Routing failures.  These are typed, recoverable results — a disconnected
/// node pair is a fact about the graph, not a bug in the caller.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route from {from} to {to}")]
    Unreachable { from: Location, to: Location },

    #[error("no node at {0}")]
    UnknownNode(Location),
}

pub type RouteResult<T> = Result<T, RouteError>;
