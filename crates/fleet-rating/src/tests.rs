//! Unit tests for fleet-rating.
//!
//! Raters are pure event consumers, so most tests drive them with synthetic
//! event lists rather than a live simulation; the final module wires all
//! three raters into a real run.

mod helpers {
    use std::sync::Arc;

    use fleet_core::{Location, OrderId, Tick, VehicleId};
    use fleet_order::ConfirmedOrder;
    use fleet_region::{Edge, Region, RegionBuilder};
    use fleet_vehicle::Event;

    pub const A: Location = Location::new(0, 0);
    pub const B: Location = Location::new(1, 0);
    pub const C: Location = Location::new(2, 0);
    pub const D: Location = Location::new(3, 0);

    /// Diamond region with weighted diameter 7 (A↔D).
    pub fn diamond() -> Arc<Region> {
        let mut b = RegionBuilder::new();
        b.add_node("a", A)
            .add_node("b", B)
            .add_node("c", C)
            .add_node("d", D)
            .add_edge("ab", A, B, 1)
            .add_edge("bc", B, C, 2)
            .add_edge("ac", A, C, 3)
            .add_edge("cd", C, D, 4);
        Arc::new(b.build().unwrap())
    }

    pub fn order(id: u64, deadline: u64) -> ConfirmedOrder {
        ConfirmedOrder::new(OrderId(id), A, D, Tick::ZERO, Tick(deadline), 1.0).unwrap()
    }

    pub fn received(tick: u64, order: ConfirmedOrder) -> Event {
        Event::OrderReceived { tick: Tick(tick), order }
    }

    pub fn delivered(tick: u64, order: ConfirmedOrder) -> Event {
        Event::OrderDelivered { tick: Tick(tick), vehicle: VehicleId(0), order }
    }

    pub fn arrival(region: &Region, tick: u64, a: Location, b: Location) -> Event {
        let via: Edge = region.edge(a, b).cloned().unwrap();
        Event::ArrivedAtNode { tick: Tick(tick), vehicle: VehicleId(0), node: b, via }
    }
}

mod amount {
    use fleet_core::Tick;
    use fleet_sim::{Rater, RaterFactory, SimulationListener};

    use super::helpers::{delivered, order, received};
    use crate::{AmountDeliveredRaterFactory, RatingError};

    fn rater(factor: f64) -> Box<dyn Rater> {
        AmountDeliveredRaterFactory::new(factor).unwrap().create()
    }

    #[test]
    fn starts_at_one_and_stays_there_when_everything_arrives() {
        let mut r = rater(0.9);
        assert_eq!(r.score(), 1.0);

        r.on_tick(
            &[received(0, order(1, 10)), received(0, order(2, 10))],
            Tick(0),
        );
        r.on_tick(
            &[delivered(3, order(1, 10)), delivered(3, order(2, 10))],
            Tick(3),
        );
        assert_eq!(r.score(), 1.0);
    }

    #[test]
    fn each_undelivered_order_multiplies_by_the_factor() {
        let mut r = rater(0.5);
        let events: Vec<_> = (1..=4).map(|i| received(0, order(i, 10))).collect();
        r.on_tick(&events, Tick(0));
        // 4 undelivered → 0.5^4
        assert_eq!(r.score(), 0.0625);

        r.on_tick(
            &[delivered(1, order(1, 10)), delivered(1, order(2, 10))],
            Tick(1),
        );
        // 2 undelivered → 0.5^2
        assert_eq!(r.score(), 0.25);
    }

    #[test]
    fn score_never_increases_as_undelivered_orders_accumulate() {
        let mut r = rater(0.99);
        let mut last = r.score();
        for i in 0..20 {
            r.on_tick(&[received(i, order(i, 100))], Tick(i));
            let now = r.score();
            assert!(now <= last, "undelivered grew but score rose: {last} → {now}");
            last = now;
        }
    }

    #[test]
    fn score_reads_are_idempotent() {
        let mut r = rater(0.7);
        r.on_tick(&[received(0, order(1, 5))], Tick(0));
        assert_eq!(r.score(), r.score());
    }

    #[test]
    fn factory_rejects_factors_outside_the_open_unit_interval() {
        for factor in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(
                matches!(
                    AmountDeliveredRaterFactory::new(factor),
                    Err(RatingError::FactorOutOfRange { .. })
                ),
                "factor {factor}"
            );
        }
        assert!(AmountDeliveredRaterFactory::new(0.99).is_ok());
    }
}

mod in_time {
    use fleet_core::Tick;
    use fleet_sim::{Rater, RaterFactory, SimulationListener};

    use super::helpers::{delivered, order, received};
    use crate::InTimeRaterFactory;

    #[test]
    fn no_deliveries_scores_zero() {
        let mut r = InTimeRaterFactory.create();
        assert_eq!(r.score(), 0.0);
        r.on_tick(&[received(0, order(1, 5))], Tick(0));
        assert_eq!(r.score(), 0.0, "received-but-undelivered is not punctual");
    }

    #[test]
    fn deadline_tick_itself_is_still_on_time() {
        let mut r = InTimeRaterFactory.create();
        r.on_tick(&[delivered(5, order(1, 5))], Tick(5));
        assert_eq!(r.score(), 1.0);

        r.on_tick(&[delivered(6, order(2, 5))], Tick(6));
        assert_eq!(r.score(), 0.5, "one on time out of two delivered");
    }

    #[test]
    fn all_late_scores_zero() {
        let mut r = InTimeRaterFactory.create();
        r.on_tick(
            &[delivered(9, order(1, 5)), delivered(9, order(2, 5))],
            Tick(9),
        );
        assert_eq!(r.score(), 0.0);
    }
}

mod travel {
    use std::sync::Arc;

    use fleet_core::Tick;
    use fleet_sim::{Rater, RaterFactory, SimError, SimulationListener};
    use fleet_vehicle::VehicleManagerBuilder;

    use super::helpers::{A, B, C, D, arrival, diamond, order, received};
    use crate::{RatingError, TravelDistanceRaterFactory};

    #[test]
    fn factor_must_be_in_half_open_unit_interval() {
        for factor in [0.0, -1.0, 1.01] {
            assert!(
                matches!(
                    TravelDistanceRaterFactory::new(diamond(), factor),
                    Err(RatingError::FactorOutOfRange { .. })
                ),
                "factor {factor}"
            );
        }
        assert!(TravelDistanceRaterFactory::new(diamond(), 1.0).is_ok());
    }

    #[test]
    fn idle_fleet_scores_one_and_pointless_movement_scores_zero() {
        let region = diamond();
        let factory = TravelDistanceRaterFactory::new(Arc::clone(&region), 0.5).unwrap();

        let r = factory.create();
        assert_eq!(r.score(), 1.0);

        // Movement with zero received orders has no budget at all.
        let mut r = factory.create();
        r.on_tick(&[arrival(&region, 1, A, B)], Tick(1));
        assert_eq!(r.score(), 0.0);
    }

    #[test]
    fn distance_is_scored_against_two_diameters_per_order() {
        let region = diamond();
        // Diameter 7 → budget 14 per order, factor 1.0 keeps it unscaled.
        let factory = TravelDistanceRaterFactory::new(Arc::clone(&region), 1.0).unwrap();
        let mut r = factory.create();

        r.on_tick(&[received(0, order(1, 50))], Tick(0));
        assert_eq!(r.score(), 1.0, "no distance burned yet");

        // A→C (3) + C→D (4): 7 of the 14-tick budget.
        r.on_tick(&[arrival(&region, 3, A, C)], Tick(3));
        r.on_tick(&[arrival(&region, 7, C, D)], Tick(7));
        assert_eq!(r.score(), 0.5);

        // Burn the rest of the budget and overshoot: clamped at 0.
        r.on_tick(&[arrival(&region, 11, D, C)], Tick(11));
        r.on_tick(&[arrival(&region, 14, C, A)], Tick(14));
        r.on_tick(&[arrival(&region, 15, A, B)], Tick(15));
        assert_eq!(r.score(), 0.0);
    }

    #[test]
    fn validate_accepts_equal_regions_and_rejects_different_ones() {
        let factory = TravelDistanceRaterFactory::for_region(diamond());

        // A manager over a structurally equal region (fresh Arc) passes.
        let manager = VehicleManagerBuilder::new()
            .region(diamond())
            .add_vehicle(A, 5.0)
            .build()
            .unwrap();
        assert!(factory.validate(&manager).is_ok());

        // A different region is rejected at problem-construction time.
        let mut b = fleet_region::RegionBuilder::new();
        b.add_node("x", A).add_node("y", B).add_edge("xy", A, B, 1);
        let other = std::sync::Arc::new(b.build().unwrap());
        let manager = VehicleManagerBuilder::new()
            .region(other)
            .add_vehicle(A, 5.0)
            .build()
            .unwrap();
        assert!(matches!(factory.validate(&manager), Err(SimError::RegionMismatch)));
    }
}

mod pipeline {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use fleet_core::{OrderId, Tick};
    use fleet_order::{ConfirmedOrder, ScheduledOrderFactory, ScheduledOrderGenerator};
    use fleet_sim::{ProblemArchetype, RaterFactory, RatingCriteria, Simulation};
    use fleet_strategy::GreedyStrategyFactory;
    use fleet_vehicle::VehicleManagerBuilder;

    use super::helpers::{A, D, diamond};
    use crate::{AmountDeliveredRaterFactory, InTimeRaterFactory, TravelDistanceRaterFactory};

    #[test]
    fn all_three_raters_score_a_real_run() {
        let region = diamond();

        let manager = VehicleManagerBuilder::new()
            .region(Arc::clone(&region))
            .add_vehicle(A, 5.0)
            .build()
            .unwrap();

        let order =
            ConfirmedOrder::new(OrderId(1), A, D, Tick::ZERO, Tick(20), 1.0).unwrap();
        let mut schedule = BTreeMap::new();
        schedule.insert(Tick::ZERO, vec![order]);
        let generator = ScheduledOrderFactory::new(ScheduledOrderGenerator::new(schedule));

        let mut raters: BTreeMap<RatingCriteria, Box<dyn RaterFactory>> = BTreeMap::new();
        raters.insert(RatingCriteria::InTime, Box::new(InTimeRaterFactory));
        raters.insert(
            RatingCriteria::AmountDelivered,
            Box::new(AmountDeliveredRaterFactory::default()),
        );
        raters.insert(
            RatingCriteria::TravelDistance,
            Box::new(TravelDistanceRaterFactory::for_region(Arc::clone(&region))),
        );

        let problem =
            ProblemArchetype::new("diamond run", 25, manager, Box::new(generator), raters)
                .unwrap();
        let mut sim = Simulation::new(problem, Box::new(GreedyStrategyFactory));
        sim.run().unwrap();

        let scores = sim.scores();
        assert_eq!(scores.len(), 3);
        for (&criterion, &score) in &scores {
            assert!((0.0..=1.0).contains(&score), "{criterion}: {score}");
        }
        // The single order travels A→D (7 ticks of driving) well before its
        // deadline: full marks for volume and punctuality.
        assert_eq!(scores[&RatingCriteria::AmountDelivered], 1.0);
        assert_eq!(scores[&RatingCriteria::InTime], 1.0);
        // 7 of the 14-tick budget at factor 0.5 → exactly on budget.
        assert_eq!(scores[&RatingCriteria::TravelDistance], 0.0);
    }
}
