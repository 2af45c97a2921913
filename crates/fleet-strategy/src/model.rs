//! The `DrivingStrategy` trait — the main extension point for user code.

use crate::StrategyContext;

/// Pluggable per-tick decision making.
///
/// Implement this trait to define how vehicles are dispatched.  The engine
/// calls [`on_tick`](Self::on_tick) exactly once per tick, after movement
/// and order admission, with a [`StrategyContext`] giving mutable access to
/// the fleet and the unassigned-order pool.
///
/// # Error handling
///
/// Fleet operations return `Result`s *to the strategy*.  A rejected move or
/// an over-capacity load is not simulation-fatal — pick a different action,
/// or skip the vehicle this tick.  Strategies that ignore errors simply
/// leave the vehicle where it stands.
///
/// # Determinism
///
/// Strategies must not draw on ambient entropy (wall clock, map iteration
/// order, thread IDs).  Seeded randomness via
/// [`SimRng`](fleet_core::SimRng) is fine — two identically constructed
/// strategies must replay identical decisions.
pub trait DrivingStrategy: Send {
    /// Decide and apply this tick's fleet operations.
    fn on_tick(&mut self, cx: &mut StrategyContext<'_>);
}

/// Constructs a fresh [`DrivingStrategy`] per simulation run.
pub trait StrategyFactory: Send + Sync {
    fn create(&self) -> Box<dyn DrivingStrategy>;
}
