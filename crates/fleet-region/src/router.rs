//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The vehicle manager calls routing via the [`PathCalculator`] trait, so
//! applications can swap in custom implementations (A*, contraction
//! hierarchies, congestion models) without touching the framework core.  The
//! default [`DijkstraPathCalculator`] is sufficient for grid-sized regions;
//! [`CachedPathCalculator`] wraps any calculator with a route cache for
//! strategies that re-query the same pairs every tick.
//!
//! # Determinism
//!
//! Edge durations are the (non-negative, in fact strictly positive) weights.
//! When two paths tie on total duration, the lexicographically smaller edge
//! sequence wins, comparing edges by their natural ordering (endpoint pair,
//! then duration, then name).  Because durations are strictly positive, every
//! node on a cost-optimal path settles strictly before the path's endpoint,
//! so the tie-break can be resolved locally during relaxation.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::sync::Mutex;

use fleet_core::Location;

use crate::region::{Edge, Region};
use crate::{RouteError, RouteResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered list of edges and the summed
/// traversal duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<Edge>,
    /// Total traversal time in ticks.
    pub total_duration: u64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// The sequence of nodes visited after the start node, ending at the
    /// destination.
    pub fn node_sequence(&self, from: Location) -> Vec<Location> {
        let mut at = from;
        self.edges
            .iter()
            .filter_map(|e| {
                let next = e.other_endpoint(at)?;
                at = next;
                Some(next)
            })
            .collect()
    }
}

// ── PathCalculator trait ──────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a single calculator can serve
/// parallel trial runs sharing one region.
pub trait PathCalculator: Send + Sync {
    /// Compute the shortest path from `from` to `to` by total edge duration.
    ///
    /// `from == to` yields a trivial empty route rather than an error.
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownNode`] if either endpoint names no node, and
    /// [`RouteError::Unreachable`] if the nodes lie in different components.
    fn shortest_path(&self, region: &Region, from: Location, to: Location) -> RouteResult<Route>;
}

// ── DijkstraPathCalculator ────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the region graph with the
/// lexicographic tie-break described in the module docs.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraPathCalculator;

impl PathCalculator for DijkstraPathCalculator {
    fn shortest_path(&self, region: &Region, from: Location, to: Location) -> RouteResult<Route> {
        dijkstra(region, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(region: &Region, from: Location, to: Location) -> RouteResult<Route> {
    for endpoint in [from, to] {
        if region.node(endpoint).is_none() {
            return Err(RouteError::UnknownNode(endpoint));
        }
    }
    if from == to {
        return Ok(Route { edges: vec![], total_duration: 0 });
    }

    // dist[v] = best known cost to reach v; prev[v] = predecessor node on the
    // lexicographically smallest cost-optimal path found so far.
    let mut dist: BTreeMap<Location, u64> = BTreeMap::new();
    let mut prev: BTreeMap<Location, Location> = BTreeMap::new();
    dist.insert(from, 0);

    // Min-heap: (cost, node).  Reverse makes BinaryHeap (max) behave as a
    // min-heap; the Location secondary key makes pop order deterministic.
    let mut heap: BinaryHeap<Reverse<(u64, Location)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(region, &prev, from, to, cost));
        }

        // Skip stale heap entries.
        if dist.get(&node).is_some_and(|&d| cost > d) {
            continue;
        }

        for edge in region.adjacent_edges(node) {
            let Some(neighbor) = edge.other_endpoint(node) else {
                continue;
            };
            let new_cost = cost.saturating_add(edge.duration());

            match dist.get(&neighbor) {
                Some(&d) if new_cost > d => {}
                Some(&d) if new_cost == d => {
                    // Cost tie: keep whichever full edge sequence is
                    // lexicographically smaller.  Both candidate prefixes run
                    // through settled nodes, so they are final.
                    let candidate = path_keys(&prev, from, node, edge.key());
                    let incumbent = incumbent_keys(&prev, from, neighbor);
                    if lex_smaller(region, &candidate, &incumbent) {
                        prev.insert(neighbor, node);
                    }
                }
                _ => {
                    dist.insert(neighbor, new_cost);
                    prev.insert(neighbor, node);
                    heap.push(Reverse((new_cost, neighbor)));
                }
            }
        }
    }

    Err(RouteError::Unreachable { from, to })
}

/// Edge keys of the path `from → … → tail`, extended with `last`.
fn path_keys(
    prev: &BTreeMap<Location, Location>,
    from: Location,
    tail: Location,
    last: (Location, Location),
) -> Vec<(Location, Location)> {
    let mut keys = walk_back(prev, from, tail);
    keys.push(last);
    keys
}

/// Edge keys of the currently recorded path `from → … → node`.
fn incumbent_keys(
    prev: &BTreeMap<Location, Location>,
    from: Location,
    node: Location,
) -> Vec<(Location, Location)> {
    walk_back(prev, from, node)
}

fn walk_back(
    prev: &BTreeMap<Location, Location>,
    from: Location,
    mut at: Location,
) -> Vec<(Location, Location)> {
    let mut keys = Vec::new();
    while at != from {
        let Some(&p) = prev.get(&at) else { break };
        keys.push(if p <= at { (p, at) } else { (at, p) });
        at = p;
    }
    keys.reverse();
    keys
}

/// `true` if edge sequence `a` orders strictly before `b`.
fn lex_smaller(
    region: &Region,
    a: &[(Location, Location)],
    b: &[(Location, Location)],
) -> bool {
    let resolve = |keys: &[(Location, Location)]| -> Vec<&Edge> {
        keys.iter().filter_map(|&(x, y)| region.edge(x, y)).collect()
    };
    resolve(a) < resolve(b)
}

fn reconstruct(
    region: &Region,
    prev: &BTreeMap<Location, Location>,
    from: Location,
    to: Location,
    total_duration: u64,
) -> Route {
    let edges = walk_back(prev, from, to)
        .into_iter()
        .filter_map(|(a, b)| region.edge(a, b).cloned())
        .collect();
    Route { edges, total_duration }
}

// ── CachedPathCalculator ──────────────────────────────────────────────────────

/// Wraps another [`PathCalculator`] and memoizes successful queries.
///
/// Routes over an immutable region never change, so the cache needs no
/// invalidation.  Failures (unreachable pairs) are recomputed on every query;
/// they are expected to be rare and cheap relative to cache bookkeeping.
pub struct CachedPathCalculator<P> {
    inner: P,
    cache: Mutex<BTreeMap<(Location, Location), Route>>,
}

impl<P: PathCalculator> CachedPathCalculator<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, cache: Mutex::new(BTreeMap::new()) }
    }

    /// Number of memoized routes.
    pub fn cached_routes(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl<P: PathCalculator> PathCalculator for CachedPathCalculator<P> {
    fn shortest_path(&self, region: &Region, from: Location, to: Location) -> RouteResult<Route> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(route) = cache.get(&(from, to)) {
                return Ok(route.clone());
            }
        }
        let route = self.inner.shortest_path(region, from, to)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert((from, to), route.clone());
        }
        Ok(route)
    }
}

// ── Region-wide measures ──────────────────────────────────────────────────────

/// The longest finite shortest-path duration between any two nodes.
///
/// Unreachable pairs contribute nothing; an empty or fully disconnected
/// region has diameter 0.  Used by distance-based raters as the
/// region-intrinsic reference scale.
pub fn weighted_diameter(region: &Region) -> u64 {
    let mut diameter = 0;
    for source in region.nodes() {
        for (_, cost) in all_distances(region, source.location()) {
            diameter = diameter.max(cost);
        }
    }
    diameter
}

/// Single-source shortest-path durations to every reachable node.
fn all_distances(region: &Region, from: Location) -> Vec<(Location, u64)> {
    let mut dist: BTreeMap<Location, u64> = BTreeMap::new();
    let mut heap: BinaryHeap<Reverse<(u64, Location)>> = BinaryHeap::new();
    dist.insert(from, 0);
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if dist.get(&node).is_some_and(|&d| cost > d) {
            continue;
        }
        for edge in region.adjacent_edges(node) {
            let Some(neighbor) = edge.other_endpoint(node) else {
                continue;
            };
            let new_cost = cost.saturating_add(edge.duration());
            if dist.get(&neighbor).is_none_or(|&d| new_cost < d) {
                dist.insert(neighbor, new_cost);
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    dist.into_iter().collect()
}
