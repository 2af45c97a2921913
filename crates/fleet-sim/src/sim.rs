//! The `Simulation` struct and its tick loop.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fleet_core::Tick;
use fleet_order::{ConfirmedOrder, OrderGenerator, OrderGeneratorFactory, OrderLedger};
use fleet_strategy::{DrivingStrategy, StrategyContext, StrategyFactory};
use fleet_vehicle::{Event, VehicleManager};

use crate::{
    ListenerId, ProblemArchetype, Rater, RaterFactory, RatingCriteria, SimError, SimResult,
    SimulationListener,
};

// ── SimState ──────────────────────────────────────────────────────────────────

/// Lifecycle of a simulation run.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SimState {
    NotStarted,
    Running,
    /// Reached the configured length or was cooperatively terminated.
    /// Scores are final until the next [`Simulation::run`] re-sets-up.
    Finished,
}

// ── TerminationHandle ─────────────────────────────────────────────────────────

/// Cooperative cancellation flag for a running simulation.
///
/// Cloneable and thread-safe; hand it to a controlling thread and call
/// [`terminate`](Self::terminate).  The loop checks it **between** ticks, so
/// a run always stops at a tick boundary with a clean partial result.
#[derive(Clone)]
pub struct TerminationHandle(Arc<AtomicBool>);

impl TerminationHandle {
    pub fn terminate(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_terminated(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── Per-run state ─────────────────────────────────────────────────────────────

/// Everything that is recreated by `setup` at the start of each run.
struct RunState {
    generator: Box<dyn OrderGenerator>,
    strategy: Box<dyn DrivingStrategy>,
    raters: BTreeMap<RatingCriteria, Box<dyn Rater>>,
    ledger: OrderLedger,
    unassigned: Vec<ConfirmedOrder>,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// A tick-based simulation of one [`ProblemArchetype`] under one driving
/// strategy.
///
/// Re-runnable: every call to [`run`](Self::run) starts from a fresh setup
/// (reset fleet, new generator/strategy/raters), so repeated runs of a
/// deterministic problem reproduce identical event streams and scores.
pub struct Simulation {
    name: String,
    simulation_length: u64,
    manager: VehicleManager,
    generator_factory: Box<dyn OrderGeneratorFactory>,
    rater_factories: BTreeMap<RatingCriteria, Box<dyn RaterFactory>>,
    strategy_factory: Box<dyn StrategyFactory>,

    state: SimState,
    current_tick: Tick,
    run: Option<RunState>,
    listeners: Vec<(ListenerId, Box<dyn SimulationListener>)>,
    next_listener: u64,
    termination: Arc<AtomicBool>,
    last_events: Vec<Event>,
}

impl Simulation {
    /// Build a simulation from a validated problem and a strategy factory.
    pub fn new(problem: ProblemArchetype, strategy_factory: Box<dyn StrategyFactory>) -> Self {
        let (name, simulation_length, manager, generator_factory, rater_factories) =
            problem.into_parts();
        Self {
            name,
            simulation_length,
            manager,
            generator_factory,
            rater_factories,
            strategy_factory,
            state: SimState::NotStarted,
            current_tick: Tick::ZERO,
            run: None,
            listeners: Vec::new(),
            next_listener: 0,
            termination: Arc::new(AtomicBool::new(false)),
            last_events: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// The next tick to execute (equals the number of sealed ticks).
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn simulation_length(&self) -> u64 {
        self.simulation_length
    }

    pub fn vehicle_manager(&self) -> &VehicleManager {
        &self.manager
    }

    /// The events of the most recently sealed tick.
    pub fn last_events(&self) -> &[Event] {
        &self.last_events
    }

    /// A cancellation handle for this simulation.
    pub fn termination_handle(&self) -> TerminationHandle {
        TerminationHandle(Arc::clone(&self.termination))
    }

    // ── Listener registration ─────────────────────────────────────────────

    /// Register an external observer; returns its removal handle.
    pub fn add_listener(&mut self, listener: Box<dyn SimulationListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Deregister a listener.  Returns `true` if it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    // ── Scores ────────────────────────────────────────────────────────────

    /// The current score for `criterion`.
    ///
    /// # Errors
    /// [`SimError::NoRaterForCriterion`] if the problem does not rate it (or
    /// the simulation has never been set up).
    pub fn score(&self, criterion: RatingCriteria) -> SimResult<f64> {
        self.run
            .as_ref()
            .and_then(|r| r.raters.get(&criterion))
            .map(|r| r.score())
            .ok_or(SimError::NoRaterForCriterion(criterion))
    }

    /// All current scores, keyed by criterion.
    pub fn scores(&self) -> BTreeMap<RatingCriteria, f64> {
        self.run
            .as_ref()
            .map(|r| r.raters.iter().map(|(&c, rater)| (c, rater.score())).collect())
            .unwrap_or_default()
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run from a fresh setup until the configured length is reached or the
    /// termination handle fires.  Always ends in `Finished`.
    pub fn run(&mut self) -> SimResult<()> {
        self.setup();
        while self.state == SimState::Running {
            if self.termination.load(Ordering::Relaxed) {
                self.state = SimState::Finished;
                break;
            }
            self.run_tick()?;
        }
        self.state = SimState::Finished;
        Ok(())
    }

    /// Execute exactly one tick.
    ///
    /// Sets up a fresh run first when called on a `NotStarted` simulation,
    /// so tests and GUIs can single-step without calling [`run`](Self::run).
    ///
    /// # Errors
    /// [`SimError::AlreadyFinished`] once the run is over.
    pub fn run_tick(&mut self) -> SimResult<()> {
        match self.state {
            SimState::Finished => return Err(SimError::AlreadyFinished),
            SimState::NotStarted => self.setup(),
            SimState::Running => {}
        }
        let now = self.current_tick;
        let run = self.run.as_mut().ok_or(SimError::NotStarted)?;

        // ── Phase 1: movement ─────────────────────────────────────────────
        self.manager.advance_tick(now);
        let mut events = self.manager.take_events();

        // ── Phase 2: order admission and expiry ───────────────────────────
        for order in run.generator.generate(now) {
            run.ledger.admit(order.clone())?;
            run.unassigned.push(order.clone());
            events.push(Event::OrderReceived { tick: now, order });
        }
        for order in run.ledger.expire_due(now) {
            run.unassigned.retain(|o| o.id() != order.id());
            events.push(Event::OrderExpired { tick: now, order });
        }

        // ── Phase 3: strategy decisions ───────────────────────────────────
        {
            let mut cx =
                StrategyContext::new(now, &events, &mut self.manager, &mut run.unassigned);
            run.strategy.on_tick(&mut cx);
        }

        // ── Phase 4: seal and dispatch ────────────────────────────────────
        events.extend(self.manager.take_events());

        // Sync the ledger from the strategy's load/deliver events.  Terminal
        // orders are left untouched: delivering already-expired cargo is a
        // physical action with no lifecycle effect.
        for event in &events {
            match event {
                Event::OrderLoaded { order, .. } => {
                    if run.ledger.status(order.id()).is_some_and(|s| !s.is_terminal()) {
                        run.ledger.mark_in_transit(order.id())?;
                    }
                }
                Event::OrderDelivered { tick, order, .. } => {
                    if run.ledger.status(order.id()).is_some_and(|s| !s.is_terminal()) {
                        run.ledger.mark_delivered(order.id(), *tick)?;
                    }
                }
                _ => {}
            }
        }

        // Raters first (criteria order), then external listeners
        // (registration order).  All of them see the full tick.
        for rater in run.raters.values_mut() {
            rater.on_tick(&events, now);
        }
        for (_, listener) in &mut self.listeners {
            listener.on_tick(&events, now);
        }

        self.last_events = events;
        self.current_tick = now.offset(1);
        if self.current_tick.0 >= self.simulation_length {
            self.state = SimState::Finished;
        }
        Ok(())
    }

    /// The order ledger of the current (or just finished) run, if any.
    pub fn ledger(&self) -> Option<&OrderLedger> {
        self.run.as_ref().map(|r| &r.ledger)
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    fn setup(&mut self) {
        self.termination.store(false, Ordering::Relaxed);
        self.current_tick = Tick::ZERO;
        self.last_events = Vec::new();
        self.manager.reset();

        let raters: BTreeMap<RatingCriteria, Box<dyn Rater>> = self
            .rater_factories
            .iter()
            .map(|(&c, f)| (c, f.create()))
            .collect();

        self.run = Some(RunState {
            generator: self.generator_factory.create(),
            strategy: self.strategy_factory.create(),
            raters,
            ledger: OrderLedger::new(),
            unassigned: Vec::new(),
        });
        self.state = SimState::Running;
    }
}
