//! `fleet-order` — delivery orders and their lifecycle.
//!
//! # Lifecycle
//!
//! ```text
//! admit            load              unload at destination
//!  ──────▶ Pending ──────▶ InTransit ──────▶ Delivered { tick }
//!             │                │
//!             └────────────────┴──────▶ Expired   (deadline passed)
//! ```
//!
//! [`ConfirmedOrder`] is an immutable descriptor; all mutable lifecycle state
//! lives in the [`OrderLedger`], which guarantees terminal states are final
//! and that each expiration fires exactly once.
//!
//! # Generation
//!
//! [`OrderGenerator::generate`] is a pure function of the tick: the same tick
//! always yields the same orders, no matter how often or in what order ticks
//! are queried.  Three implementations ship here — [`EmptyOrderGenerator`],
//! the seeded [`UniformOrderGenerator`], and [`ScheduledOrderGenerator`]
//! (replaying a CSV order schedule, see [`loader`]).

pub mod error;
pub mod generator;
pub mod ledger;
pub mod loader;
pub mod order;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{OrderError, OrderResult};
pub use generator::{
    EmptyOrderFactory, EmptyOrderGenerator, OrderGenerator, OrderGeneratorFactory,
    ScheduledOrderFactory, ScheduledOrderGenerator, UniformOrderConfig, UniformOrderFactory,
};
pub use ledger::{OrderLedger, OrderStatus};
pub use loader::{load_orders_csv, load_orders_reader};
pub use order::ConfirmedOrder;
