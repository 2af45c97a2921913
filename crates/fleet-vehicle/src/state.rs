//! Per-vehicle movement state.

use fleet_core::Location;

/// Where a vehicle currently is.
///
/// Exactly one of two states at all times; the manager's operations are the
/// only code that transitions between them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VehiclePosition {
    /// Standing at a node, available for move/load/unload decisions.
    AtNode { node: Location },

    /// Traversing the edge between `from` and `to`.
    ///
    /// `progress` counts completed ticks on the edge, `0..duration`; the
    /// vehicle arrives at `to` during the tick that takes progress to the
    /// edge's duration.
    OnEdge {
        from: Location,
        to: Location,
        progress: u64,
    },
}

impl VehiclePosition {
    /// The node the vehicle stands at, or `None` while traversing.
    #[inline]
    pub fn node(&self) -> Option<Location> {
        match self {
            VehiclePosition::AtNode { node } => Some(*node),
            VehiclePosition::OnEdge { .. } => None,
        }
    }

    #[inline]
    pub fn is_at_node(&self) -> bool {
        matches!(self, VehiclePosition::AtNode { .. })
    }

    /// Fraction of the traversal completed, in `[0.0, 1.0]`.
    ///
    /// `1.0` for a vehicle standing at a node.  Visualization helper; the
    /// simulation itself only uses integer progress.
    pub fn progress_fraction(&self, edge_duration: u64) -> f64 {
        match self {
            VehiclePosition::AtNode { .. } => 1.0,
            VehiclePosition::OnEdge { progress, .. } => {
                if edge_duration == 0 {
                    1.0
                } else {
                    (*progress as f64 / edge_duration as f64).min(1.0)
                }
            }
        }
    }
}

impl std::fmt::Display for VehiclePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehiclePosition::AtNode { node } => write!(f, "at {node}"),
            VehiclePosition::OnEdge { from, to, progress } => {
                write!(f, "{from}→{to} (+{progress})")
            }
        }
    }
}
