//! `fleet-core` — foundational types for the `fleetsim` delivery-simulation
//! framework.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It
//! intentionally has no `fleet-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `VehicleId`, `OrderId`                                |
//! | [`location`] | `Location` — integer 2-D coordinate                   |
//! | [`distance`] | `DistanceCalculator` trait + standard metrics         |
//! | [`time`]     | `Tick`, `TickInterval`                                |
//! | [`rng`]      | `TickRng` (per-tick), `SimRng` (global)               |
//! | [`error`]    | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod distance;
pub mod error;
pub mod ids;
pub mod location;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use distance::{Chessboard, DistanceCalculator, Euclidean, Manhattan};
pub use error::{CoreError, CoreResult};
pub use ids::{OrderId, VehicleId};
pub use location::Location;
pub use rng::{SimRng, TickRng};
pub use time::{Tick, TickInterval};
