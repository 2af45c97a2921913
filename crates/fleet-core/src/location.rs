//! Integer grid coordinate type.
//!
//! Regions live on an abstract integer grid, not on real-world geography.
//! `i32` coordinates are exact (no floating-point comparisons in map keys)
//! and small enough to keep `Location` a freely copyable 8-byte value.

/// An immutable 2-D integer coordinate.
///
/// The derived `Ord` is lexicographic by `x`, then `y` — field order matters
/// and must not be changed.  Edge normalization and deterministic routing
/// tie-breaks both depend on this ordering.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[inline]
    pub fn add(self, other: Location) -> Location {
        Location::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference (`self - other`).
    #[inline]
    pub fn sub(self, other: Location) -> Location {
        Location::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(i32, i32)> for Location {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Location::new(x, y)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
