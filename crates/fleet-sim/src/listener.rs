//! Simulation listener trait and registration handles.

use fleet_core::Tick;
use fleet_vehicle::Event;

/// Observes a running simulation.
///
/// After each tick is sealed, every listener receives that tick's complete
/// event list in emission order.  Notification is synchronous and ordered:
/// all listeners see tick N before any listener sees tick N+1.
///
/// Listeners must not assume access to any simulation state beyond the
/// events they are handed — raters in particular are required to score from
/// events alone.
pub trait SimulationListener: Send {
    /// Called once per sealed tick with everything that happened in it.
    fn on_tick(&mut self, events: &[Event], tick: Tick);
}

/// Handle identifying a registered listener.
///
/// Returned by [`Simulation::add_listener`](crate::Simulation::add_listener);
/// pass it to [`remove_listener`](crate::Simulation::remove_listener).
/// Removal never affects notifications already dispatched this tick.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub(crate) u64);
