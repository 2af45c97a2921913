//! Unit tests for fleet-region.
//!
//! All tests use small hand-crafted graphs.

mod helpers {
    use fleet_core::Location;

    use crate::{Region, RegionBuilder};

    pub const A: Location = Location::new(0, 0);
    pub const B: Location = Location::new(1, 0);
    pub const C: Location = Location::new(2, 0);
    pub const D: Location = Location::new(3, 0);

    /// The diamond graph:
    ///
    ///   A—B (1), B—C (2), A—C (3), C—D (4)
    ///
    /// A→D costs 7 both ways round the diamond; the edge-sequence tie-break
    /// must pick A—B—C—D.
    pub fn diamond() -> Region {
        let mut b = RegionBuilder::new();
        b.add_node("a", A)
            .add_node("b", B)
            .add_node("c", C)
            .add_node("d", D)
            .add_edge("ab", A, B, 1)
            .add_edge("bc", B, C, 2)
            .add_edge("ac", A, C, 3)
            .add_edge("cd", C, D, 4);
        b.build().unwrap()
    }
}

// ── Edge & node value semantics ───────────────────────────────────────────────

mod components {
    use fleet_core::Location;

    use crate::RegionBuilder;

    #[test]
    fn edge_endpoints_are_normalized() {
        let mut b = RegionBuilder::new();
        b.add_node("n1", Location::new(5, 5))
            .add_node("n2", Location::new(1, 1))
            // Deliberately pass the larger endpoint first.
            .add_edge("e", Location::new(5, 5), Location::new(1, 1), 2);
        let region = b.build().unwrap();

        let edge = region.edge(Location::new(5, 5), Location::new(1, 1)).unwrap();
        assert_eq!(edge.location_a(), Location::new(1, 1));
        assert_eq!(edge.location_b(), Location::new(5, 5));
        assert_eq!(edge.other_endpoint(Location::new(1, 1)), Some(Location::new(5, 5)));
        assert_eq!(edge.other_endpoint(Location::new(0, 0)), None);
    }

    #[test]
    fn edges_order_by_endpoint_pair() {
        let region = super::helpers::diamond();
        let names: Vec<&str> = region.edges().map(|e| e.name()).collect();
        // (A,B) < (A,C) < (B,C) < (C,D)
        assert_eq!(names, ["ab", "ac", "bc", "cd"]);
    }

    #[test]
    fn nodes_order_by_location() {
        let region = super::helpers::diamond();
        let names: Vec<&str> = region.nodes().map(|n| n.name()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

mod builder {
    use fleet_core::{Location, Manhattan};

    use crate::{RegionBuilder, RegionError};

    #[test]
    fn rejects_duplicate_names() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0)).add_node("x", Location::new(1, 0));
        assert!(matches!(b.build(), Err(RegionError::DuplicateName(_))));
    }

    #[test]
    fn rejects_two_nodes_at_one_location() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0)).add_node("y", Location::new(0, 0));
        assert!(matches!(b.build(), Err(RegionError::DuplicateNode(_))));
    }

    #[test]
    fn rejects_dangling_edge_endpoint() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0))
            .add_edge("e", Location::new(0, 0), Location::new(9, 9), 1);
        let err = b.build().unwrap_err();
        assert!(
            matches!(err, RegionError::MissingEndpoint { ref location, .. }
                if *location == Location::new(9, 9))
        );
    }

    #[test]
    fn rejects_duplicate_edges_regardless_of_direction() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0))
            .add_node("y", Location::new(1, 0))
            .add_edge("e1", Location::new(0, 0), Location::new(1, 0), 1)
            .add_edge("e2", Location::new(1, 0), Location::new(0, 0), 2);
        assert!(matches!(b.build(), Err(RegionError::DuplicateEdge { .. })));
    }

    #[test]
    fn rejects_self_loops_and_zero_durations() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0)).add_edge(
            "loop",
            Location::new(0, 0),
            Location::new(0, 0),
            1,
        );
        assert!(matches!(b.build(), Err(RegionError::SelfLoop { .. })));

        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0))
            .add_node("y", Location::new(1, 0))
            .add_edge("e", Location::new(0, 0), Location::new(1, 0), 0);
        assert!(matches!(b.build(), Err(RegionError::ZeroDuration { .. })));
    }

    #[test]
    fn measured_edge_duration_rounds_up() {
        let mut b = RegionBuilder::with_calculator(Box::new(Manhattan));
        b.add_node("x", Location::new(0, 0))
            .add_node("y", Location::new(2, 3))
            .add_measured_edge("e", Location::new(0, 0), Location::new(2, 3));
        let region = b.build().unwrap();
        let edge = region.edge(Location::new(0, 0), Location::new(2, 3)).unwrap();
        assert_eq!(edge.duration(), 5);
    }

    #[test]
    fn check_and_remove_component() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0)).add_node("y", Location::new(1, 0));

        assert!(!b.check_node("x", Location::new(5, 5)), "name taken");
        assert!(!b.check_node("z", Location::new(1, 0)), "location taken");
        assert!(b.check_node("z", Location::new(2, 0)));

        assert!(b.check_edge("e", Location::new(0, 0), Location::new(1, 0)));
        assert!(!b.check_edge("e", Location::new(0, 0), Location::new(7, 7)), "dangling");

        assert!(b.remove_component("y"));
        assert!(!b.remove_component("y"));
        assert_eq!(b.node_count(), 1);
    }

    #[test]
    fn round_trip_and_adjacency_consistency() {
        let region = super::helpers::diamond();

        // Every edge that was added is retrievable, in both argument orders.
        for edge in region.edges() {
            let via_ab = region.edge(edge.location_a(), edge.location_b()).unwrap();
            let via_ba = region.edge(edge.location_b(), edge.location_a()).unwrap();
            assert_eq!(via_ab, edge);
            assert_eq!(via_ba, edge);
        }

        // Adjacency is mutually consistent: an edge appears in one endpoint's
        // adjacency iff it appears in the other's.
        for node in region.nodes() {
            for nb in node.adjacent_locations() {
                let other = region.node(nb).unwrap();
                assert!(other.adjacent_locations().any(|l| l == node.location()));
                assert!(region.edge(node.location(), nb).is_some());
            }
        }

        // And every edge is recorded on both endpoints.
        for edge in region.edges() {
            for endpoint in [edge.location_a(), edge.location_b()] {
                assert!(
                    region
                        .adjacent_edges(endpoint)
                        .any(|e| e == edge)
                );
            }
        }
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

mod snap {
    use fleet_core::Location;

    use crate::RegionBuilder;

    #[test]
    fn nearest_node_exact_and_nearby() {
        let region = super::helpers::diamond();
        assert_eq!(region.nearest_node(super::helpers::A).unwrap().name(), "a");
        // (0,1) is distance 1 from A and sqrt(2) from B.
        assert_eq!(region.nearest_node(Location::new(0, 1)).unwrap().name(), "a");
    }

    #[test]
    fn empty_region_returns_none() {
        let region = RegionBuilder::new().build().unwrap();
        assert!(region.nearest_node(Location::new(0, 0)).is_none());
        assert!(region.is_empty());
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

mod routing {
    use fleet_core::Location;

    use super::helpers::{self, A, B, C, D};
    use crate::{
        CachedPathCalculator, DijkstraPathCalculator, PathCalculator, RegionBuilder, RouteError,
        weighted_diameter,
    };

    #[test]
    fn trivial_same_node() {
        let region = helpers::diamond();
        let route = DijkstraPathCalculator.shortest_path(&region, A, A).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.total_duration, 0);
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let region = helpers::diamond();
        let result = DijkstraPathCalculator.shortest_path(&region, A, Location::new(9, 9));
        assert!(matches!(result, Err(RouteError::UnknownNode(_))));
    }

    #[test]
    fn unreachable_pair_is_an_error() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0)).add_node("y", Location::new(5, 5));
        let region = b.build().unwrap();
        let result =
            DijkstraPathCalculator.shortest_path(&region, Location::new(0, 0), Location::new(5, 5));
        assert!(matches!(result, Err(RouteError::Unreachable { .. })));
    }

    #[test]
    fn diamond_tie_breaks_to_smaller_edge_sequence() {
        let region = helpers::diamond();
        let route = DijkstraPathCalculator.shortest_path(&region, A, D).unwrap();

        // A—C—D also costs 7; the lexicographically smaller sequence wins.
        assert_eq!(route.total_duration, 7);
        let names: Vec<&str> = route.edges.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["ab", "bc", "cd"]);
        assert_eq!(route.node_sequence(A), [B, C, D]);
    }

    #[test]
    fn direct_edge_is_an_upper_bound() {
        let region = helpers::diamond();
        for edge in region.edges() {
            let route = DijkstraPathCalculator
                .shortest_path(&region, edge.location_a(), edge.location_b())
                .unwrap();
            assert!(route.total_duration <= edge.duration());
        }
        // A—C is dominated by A—B—C, so the bound is strict there.
        let via = DijkstraPathCalculator.shortest_path(&region, A, C).unwrap();
        assert_eq!(via.total_duration, 3);
        assert_eq!(via.edges.len(), 2);
    }

    #[test]
    fn cached_calculator_matches_inner_and_memoizes() {
        let region = helpers::diamond();
        let cached = CachedPathCalculator::new(DijkstraPathCalculator);

        let direct = DijkstraPathCalculator.shortest_path(&region, A, D).unwrap();
        let first = cached.shortest_path(&region, A, D).unwrap();
        let second = cached.shortest_path(&region, A, D).unwrap();

        assert_eq!(first, direct);
        assert_eq!(second, direct);
        assert_eq!(cached.cached_routes(), 1);
    }

    #[test]
    fn diameter_of_diamond() {
        let region = helpers::diamond();
        // Farthest pair is A↔D at cost 7.
        assert_eq!(weighted_diameter(&region), 7);
    }

    #[test]
    fn diameter_ignores_unreachable_pairs() {
        let mut b = RegionBuilder::new();
        b.add_node("x", Location::new(0, 0))
            .add_node("y", Location::new(1, 0))
            .add_node("island", Location::new(9, 9))
            .add_edge("e", Location::new(0, 0), Location::new(1, 0), 3);
        let region = b.build().unwrap();
        assert_eq!(weighted_diameter(&region), 3);
    }
}
