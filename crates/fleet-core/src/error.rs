//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` impls or wrap it as one variant.  Both patterns are
//! acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::Tick;

/// The top-level error type for `fleet-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A signed tick value from an external source was negative.
    #[error("tick value out of range: {value}")]
    OutOfRange { value: i64 },

    /// An interval was constructed with `start > end`.
    #[error("interval start {start} is after end {end}")]
    InvertedInterval { start: Tick, end: Tick },
}

/// Shorthand result type for all `fleet-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
