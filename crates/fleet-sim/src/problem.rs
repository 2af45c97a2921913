//! Problem definitions — a complete, validated simulation setup.

use std::collections::BTreeMap;

use fleet_order::OrderGeneratorFactory;
use fleet_vehicle::VehicleManager;

use crate::{RaterFactory, RatingCriteria, SimError, SimResult};

/// A complete, validated bundle of everything one simulation run needs: the
/// region-backed vehicle manager, an order-generator factory, one rater
/// factory per registered criterion, a positive run length, and a name.
///
/// Validation happens exactly once, at construction; a `ProblemArchetype`
/// that exists is runnable.
pub struct ProblemArchetype {
    name: String,
    simulation_length: u64,
    vehicle_manager: VehicleManager,
    order_generator_factory: Box<dyn OrderGeneratorFactory>,
    rater_factories: BTreeMap<RatingCriteria, Box<dyn RaterFactory>>,
}

impl ProblemArchetype {
    /// Validate and bundle a problem definition.
    ///
    /// # Errors
    ///
    /// - [`SimError::BlankName`] for an empty or whitespace-only name.
    /// - [`SimError::ZeroLength`] for a zero simulation length.
    /// - [`SimError::CriteriaMismatch`] if a factory is registered under a
    ///   criterion it does not rate.
    /// - Whatever a factory's [`validate`](RaterFactory::validate) hook
    ///   rejects (e.g. [`SimError::RegionMismatch`]).
    pub fn new(
        name: impl Into<String>,
        simulation_length: u64,
        vehicle_manager: VehicleManager,
        order_generator_factory: Box<dyn OrderGeneratorFactory>,
        rater_factories: BTreeMap<RatingCriteria, Box<dyn RaterFactory>>,
    ) -> SimResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SimError::BlankName);
        }
        if simulation_length == 0 {
            return Err(SimError::ZeroLength);
        }
        for (&criteria, factory) in &rater_factories {
            if factory.criteria() != criteria {
                return Err(SimError::CriteriaMismatch {
                    expected: criteria,
                    got: factory.criteria(),
                });
            }
            factory.validate(&vehicle_manager)?;
        }

        Ok(Self {
            name,
            simulation_length,
            vehicle_manager,
            order_generator_factory,
            rater_factories,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of ticks a full run executes.
    pub fn simulation_length(&self) -> u64 {
        self.simulation_length
    }

    pub fn vehicle_manager(&self) -> &VehicleManager {
        &self.vehicle_manager
    }

    /// The criteria this problem is scored on.
    pub fn criteria(&self) -> impl Iterator<Item = RatingCriteria> + '_ {
        self.rater_factories.keys().copied()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        u64,
        VehicleManager,
        Box<dyn OrderGeneratorFactory>,
        BTreeMap<RatingCriteria, Box<dyn RaterFactory>>,
    ) {
        (
            self.name,
            self.simulation_length,
            self.vehicle_manager,
            self.order_generator_factory,
            self.rater_factories,
        )
    }
}

impl std::fmt::Display for ProblemArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::fmt::Debug for ProblemArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemArchetype")
            .field("name", &self.name)
            .field("simulation_length", &self.simulation_length)
            .field("criteria", &self.rater_factories.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
