//! Order generation — the `OrderGenerator` trait and shipped implementations.
//!
//! # Purity contract
//!
//! `generate(tick)` must be a pure function of the tick: the same generator
//! asked for the same tick always returns the same orders, regardless of
//! query order or repetition.  The simulation engine relies on this for
//! replayable runs; [`UniformOrderGenerator`] honors it by deriving a fresh
//! [`TickRng`] from `(seed, tick)` on every call instead of keeping RNG
//! state.

use std::collections::BTreeMap;
use std::sync::Arc;

use fleet_core::{Location, OrderId, Tick, TickRng};
use fleet_region::Region;

use crate::{ConfirmedOrder, OrderError, OrderResult};

// ── Traits ────────────────────────────────────────────────────────────────────

/// Produces the orders confirmed at a given tick.
pub trait OrderGenerator: Send {
    /// All orders that enter the system at exactly `tick`, in a stable order.
    fn generate(&self, tick: Tick) -> Vec<ConfirmedOrder>;
}

/// Constructs a fresh [`OrderGenerator`] per simulation run.
///
/// A problem definition carries one of these; every run gets its own
/// generator instance so runs cannot leak state into one another.
pub trait OrderGeneratorFactory: Send + Sync {
    fn create(&self) -> Box<dyn OrderGenerator>;
}

// ── EmptyOrderGenerator ───────────────────────────────────────────────────────

/// A generator that never yields orders.
///
/// Useful for vehicle-movement tests and as a placeholder while wiring up a
/// problem definition.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyOrderGenerator;

impl OrderGenerator for EmptyOrderGenerator {
    fn generate(&self, _tick: Tick) -> Vec<ConfirmedOrder> {
        vec![]
    }
}

/// Factory for [`EmptyOrderGenerator`].
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyOrderFactory;

impl OrderGeneratorFactory for EmptyOrderFactory {
    fn create(&self) -> Box<dyn OrderGenerator> {
        Box::new(EmptyOrderGenerator)
    }
}

// ── UniformOrderGenerator ─────────────────────────────────────────────────────

/// Configuration for [`UniformOrderFactory`].
///
/// Validated by [`UniformOrderFactory::new`]; invalid combinations never
/// produce a generator.
#[derive(Clone)]
pub struct UniformOrderConfig {
    /// Region whose nodes serve as pickup/delivery sites.
    pub region: Arc<Region>,
    /// Seed for the per-tick RNG derivation.
    pub seed: u64,
    /// Maximum number of orders per tick; each slot fires independently.
    pub orders_per_tick: u32,
    /// Probability that a given slot produces an order, in `[0, 1]`.
    pub arrival_probability: f64,
    /// Deadline lead time range in ticks after creation (inclusive).
    pub min_lead: u64,
    pub max_lead: u64,
    /// Cargo weight range (inclusive).
    pub min_weight: f64,
    pub max_weight: f64,
}

/// A seeded generator sampling uniformly random pickup/delivery pairs.
///
/// Sampling picks a random grid point inside the region's bounding box and
/// snaps it to the nearest node, so dense areas of the map attract
/// proportionally more traffic.
#[derive(Clone)]
pub struct UniformOrderGenerator {
    config: UniformOrderConfig,
    /// Sorted node locations — fallback sampling and bbox bounds.
    nodes: Arc<Vec<Location>>,
    min: Location,
    max: Location,
}

impl UniformOrderGenerator {
    fn sample_node(&self, rng: &mut TickRng) -> Location {
        let probe = Location::new(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
        );
        match self.config.region.nearest_node(probe) {
            Some(node) => node.location(),
            // Non-empty node list is a construction invariant.
            None => self.nodes[0],
        }
    }
}

impl OrderGenerator for UniformOrderGenerator {
    fn generate(&self, tick: Tick) -> Vec<ConfirmedOrder> {
        let cfg = &self.config;
        let mut rng = TickRng::for_tick(cfg.seed, tick);
        let mut orders = Vec::new();

        for slot in 0..cfg.orders_per_tick {
            if !rng.gen_bool(cfg.arrival_probability) {
                continue;
            }

            let pickup = self.sample_node(&mut rng);
            let mut delivery = self.sample_node(&mut rng);
            for _ in 0..8 {
                if delivery != pickup {
                    break;
                }
                delivery = self.sample_node(&mut rng);
            }
            if delivery == pickup {
                // Snapping keeps landing on the same node; fall back to the
                // next node in sorted order.
                let i = self.nodes.binary_search(&pickup).unwrap_or_default();
                delivery = self.nodes[(i + 1) % self.nodes.len()];
            }

            let lead = rng.gen_range(cfg.min_lead..=cfg.max_lead);
            let weight = rng.gen_range(cfg.min_weight..=cfg.max_weight);
            // Slot-indexed IDs are globally unique and replay-stable.
            let id = OrderId(tick.0 * cfg.orders_per_tick as u64 + slot as u64);

            match ConfirmedOrder::new(id, pickup, delivery, tick, tick.offset(lead), weight) {
                Ok(order) => orders.push(order),
                // Config validation rules this out; skip rather than panic.
                Err(_) => continue,
            }
        }

        orders
    }
}

/// Validated factory for [`UniformOrderGenerator`].
#[derive(Clone)]
pub struct UniformOrderFactory {
    proto: UniformOrderGenerator,
}

impl UniformOrderFactory {
    /// Validate `config` and build the factory.
    ///
    /// # Errors
    ///
    /// [`OrderError::Config`] for an empty region, fewer than two nodes, an
    /// out-of-range probability, inverted lead or weight ranges, or
    /// non-positive weights.
    pub fn new(config: UniformOrderConfig) -> OrderResult<Self> {
        if config.region.node_count() < 2 {
            return Err(OrderError::Config(
                "uniform generation needs at least two nodes".into(),
            ));
        }
        if config.orders_per_tick == 0 {
            return Err(OrderError::Config("orders_per_tick must be positive".into()));
        }
        if !(0.0..=1.0).contains(&config.arrival_probability) {
            return Err(OrderError::Config(format!(
                "arrival_probability {} outside [0, 1]",
                config.arrival_probability
            )));
        }
        if config.min_lead > config.max_lead {
            return Err(OrderError::Config(format!(
                "lead range inverted: {}..={}",
                config.min_lead, config.max_lead
            )));
        }
        if config.min_weight > config.max_weight
            || config.min_weight <= 0.0
            || !config.max_weight.is_finite()
        {
            return Err(OrderError::Config(format!(
                "weight range invalid: {}..={}",
                config.min_weight, config.max_weight
            )));
        }

        let nodes: Vec<Location> = config.region.nodes().map(|n| n.location()).collect();
        let min = Location::new(
            nodes.iter().map(|l| l.x).min().unwrap_or(0),
            nodes.iter().map(|l| l.y).min().unwrap_or(0),
        );
        let max = Location::new(
            nodes.iter().map(|l| l.x).max().unwrap_or(0),
            nodes.iter().map(|l| l.y).max().unwrap_or(0),
        );

        Ok(Self {
            proto: UniformOrderGenerator { config, nodes: Arc::new(nodes), min, max },
        })
    }
}

impl OrderGeneratorFactory for UniformOrderFactory {
    fn create(&self) -> Box<dyn OrderGenerator> {
        Box::new(self.proto.clone())
    }
}

// ── ScheduledOrderGenerator ───────────────────────────────────────────────────

/// Replays a fixed, tick-keyed order schedule (typically loaded from CSV,
/// see [`crate::loader`]).
#[derive(Clone, Debug)]
pub struct ScheduledOrderGenerator {
    schedule: Arc<BTreeMap<Tick, Vec<ConfirmedOrder>>>,
}

impl ScheduledOrderGenerator {
    pub fn new(schedule: BTreeMap<Tick, Vec<ConfirmedOrder>>) -> Self {
        Self { schedule: Arc::new(schedule) }
    }

    /// Total orders across all ticks.
    pub fn order_count(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }

    /// The last tick with at least one order, if any.
    pub fn last_tick(&self) -> Option<Tick> {
        self.schedule.keys().next_back().copied()
    }
}

impl OrderGenerator for ScheduledOrderGenerator {
    fn generate(&self, tick: Tick) -> Vec<ConfirmedOrder> {
        self.schedule.get(&tick).cloned().unwrap_or_default()
    }
}

/// Factory for [`ScheduledOrderGenerator`]; clones share the schedule.
#[derive(Clone, Debug)]
pub struct ScheduledOrderFactory {
    proto: ScheduledOrderGenerator,
}

impl ScheduledOrderFactory {
    pub fn new(generator: ScheduledOrderGenerator) -> Self {
        Self { proto: generator }
    }
}

impl OrderGeneratorFactory for ScheduledOrderFactory {
    fn create(&self) -> Box<dyn OrderGenerator> {
        Box::new(self.proto.clone())
    }
}
