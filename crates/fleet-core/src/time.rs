//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; there is no mapping to
//! wall-clock time inside the core.  Using an unsigned integer tick as the
//! canonical unit means all deadline arithmetic is exact and negative ticks
//! are unrepresentable by construction.  External inputs that carry signed
//! tick values (CSV schedules, hand-written configs) must cross
//! [`Tick::from_signed`], which is where out-of-range values surface as
//! [`CoreError::OutOfRange`].

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`: even at one tick per simulated second a run would take
/// longer than the age of the universe to overflow.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Convert a signed tick value from an external source.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfRange`] for negative input.
    pub fn from_signed(value: i64) -> CoreResult<Tick> {
        u64::try_from(value)
            .map(Tick)
            .map_err(|_| CoreError::OutOfRange { value })
    }

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickInterval ──────────────────────────────────────────────────────────────

/// A closed interval `[start, end]` of simulation ticks.
///
/// Used for delivery windows: an order placed inside the simulation carries
/// the interval in which it should reach its destination.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickInterval {
    start: Tick,
    end: Tick,
}

impl TickInterval {
    /// Construct a validated interval.
    ///
    /// # Errors
    /// Returns [`CoreError::InvertedInterval`] if `start > end`.
    pub fn new(start: Tick, end: Tick) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvertedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> Tick {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Tick {
        self.end
    }

    /// The number of ticks between start and end.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    /// `true` if `tick` lies inside the closed interval.
    #[inline]
    pub fn contains(&self, tick: Tick) -> bool {
        self.start <= tick && tick <= self.end
    }
}

impl fmt::Display for TickInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
