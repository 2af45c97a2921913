//! Region graph representation and builder.
//!
//! # Data layout
//!
//! Nodes live in a `BTreeMap<Location, Node>` and edges in a
//! `BTreeMap<(Location, Location), Edge>` whose keys are normalized so the
//! smaller endpoint comes first.  Every node stores the locations it connects
//! to, and the builder guarantees the two maps agree: an edge exists for
//! every recorded adjacency and vice versa.  BTree ownership keeps all
//! iteration orders sorted, which the deterministic router relies on.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps grid coordinates to the nearest node.  Order
//! generators use it to snap sampled locations onto the graph.

use std::collections::{BTreeMap, BTreeSet};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use fleet_core::{DistanceCalculator, Euclidean, Location};

use crate::{RegionError, RegionResult};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// An undirected weighted connection between two nodes.
///
/// Endpoints are normalized at construction so `location_a <= location_b`;
/// the derived ordering therefore compares endpoint pairs first, with
/// duration and name only disambiguating otherwise-identical connections.
/// Equality and hashing cover all four fields.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    location_a: Location,
    location_b: Location,
    duration: u64,
    name: String,
}

impl Edge {
    /// Construct an edge, swapping endpoints into normalized order if needed.
    pub(crate) fn new(name: String, a: Location, b: Location, duration: u64) -> Self {
        let (location_a, location_b) = if a <= b { (a, b) } else { (b, a) };
        Self { location_a, location_b, duration, name }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The smaller endpoint.
    #[inline]
    pub fn location_a(&self) -> Location {
        self.location_a
    }

    /// The larger endpoint.
    #[inline]
    pub fn location_b(&self) -> Location {
        self.location_b
    }

    /// Ticks a vehicle needs to traverse this edge.  Always > 0.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// `true` if `location` is one of the two endpoints.
    #[inline]
    pub fn is_incident(&self, location: Location) -> bool {
        self.location_a == location || self.location_b == location
    }

    /// The endpoint opposite `location`, or `None` if not incident.
    pub fn other_endpoint(&self, location: Location) -> Option<Location> {
        if location == self.location_a {
            Some(self.location_b)
        } else if location == self.location_b {
            Some(self.location_a)
        } else {
            None
        }
    }

    /// The normalized endpoint pair, usable as a map key.
    #[inline]
    pub fn key(&self) -> (Location, Location) {
        (self.location_a, self.location_b)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}..{}, {} ticks]", self.name, self.location_a, self.location_b, self.duration)
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A named location in the region graph.
///
/// Nodes are owned exclusively by their [`Region`]; the adjacency set stores
/// neighbor locations, and the incident [`Edge`] for each neighbor is
/// resolved through [`Region::edge`].
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    name: String,
    location: Location,
    connections: BTreeSet<Location>,
}

impl Node {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Locations of all adjacent nodes, in sorted order.
    pub fn adjacent_locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.connections.iter().copied()
    }

    /// Number of incident edges.
    #[inline]
    pub fn degree(&self) -> usize {
        self.connections.len()
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    /// Nodes order by location; locations are unique within a region.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.location.cmp(&other.location)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.location)
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D integer point with the
/// associated node location.
#[derive(Clone)]
struct NodeEntry {
    point: [i64; 2],
    location: Location,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in grid units.  `i64` math cannot overflow
    /// for `i32` input coordinates.
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Region ────────────────────────────────────────────────────────────────────

/// The static road-network graph a delivery problem simulates over.
///
/// Conceptually immutable: no method mutates the graph after
/// [`RegionBuilder::build`] returns.  Equality compares nodes and edges only,
/// so two regions built from the same description are equal regardless of
/// which distance calculator produced them.
pub struct Region {
    nodes: BTreeMap<Location, Node>,
    edges: BTreeMap<(Location, Location), Edge>,
    calculator: Box<dyn DistanceCalculator>,
    spatial_idx: RTree<NodeEntry>,
}

impl Region {
    /// Returns a new [`RegionBuilder`] using the [`Euclidean`] metric.
    pub fn builder() -> RegionBuilder {
        RegionBuilder::new()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// The node at `location`, if any.
    pub fn node(&self, location: Location) -> Option<&Node> {
        self.nodes.get(&location)
    }

    /// The edge connecting `a` and `b`, in either argument order.
    pub fn edge(&self, a: Location, b: Location) -> Option<&Edge> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.edges.get(&key)
    }

    /// All nodes, in location order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges, in endpoint order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All edges incident to the node at `location`, in neighbor order.
    ///
    /// Empty iterator if `location` names no node.
    pub fn adjacent_edges(&self, location: Location) -> impl Iterator<Item = &Edge> + '_ {
        self.nodes
            .get(&location)
            .into_iter()
            .flat_map(move |node| {
                node.connections.iter().filter_map(move |&nb| self.edge(location, nb))
            })
    }

    /// The distance metric this region was built with.
    pub fn distance_calculator(&self) -> &dyn DistanceCalculator {
        self.calculator.as_ref()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `location` in straight-line grid distance.
    ///
    /// Returns `None` only for an empty region.
    pub fn nearest_node(&self, location: Location) -> Option<&Node> {
        self.spatial_idx
            .nearest_neighbor(&[location.x as i64, location.y as i64])
            .and_then(|e| self.nodes.get(&e.location))
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl Eq for Region {}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

// ── RegionBuilder ─────────────────────────────────────────────────────────────

/// Construct a [`Region`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and edges in any order; `build()` performs the
/// single validation pass — duplicate names, duplicate locations, duplicate
/// or dangling edges, zero durations — and assembles the adjacency maps and
/// the R-tree.
///
/// # Example
///
/// ```
/// use fleet_core::Location;
/// use fleet_region::RegionBuilder;
///
/// let mut b = RegionBuilder::new();
/// b.add_node("depot", Location::new(0, 0));
/// b.add_node("north", Location::new(0, 3));
/// b.add_edge("main", Location::new(0, 0), Location::new(0, 3), 3);
/// let region = b.build().unwrap();
/// assert_eq!(region.node_count(), 2);
/// assert!(region.edge(Location::new(0, 3), Location::new(0, 0)).is_some());
/// ```
pub struct RegionBuilder {
    calculator: Box<dyn DistanceCalculator>,
    nodes: Vec<(String, Location)>,
    edges: Vec<RawEdge>,
}

struct RawEdge {
    name: String,
    a: Location,
    b: Location,
    /// `None` → derive from the distance calculator at build time.
    duration: Option<u64>,
}

impl RegionBuilder {
    pub fn new() -> Self {
        Self::with_calculator(Box::new(Euclidean))
    }

    /// A builder whose measured edges use the given metric.
    pub fn with_calculator(calculator: Box<dyn DistanceCalculator>) -> Self {
        Self { calculator, nodes: Vec::new(), edges: Vec::new() }
    }

    /// Add a node named `name` at `location`.
    pub fn add_node(&mut self, name: impl Into<String>, location: Location) -> &mut Self {
        self.nodes.push((name.into(), location));
        self
    }

    /// Add an edge with an explicit traversal duration in ticks.
    pub fn add_edge(
        &mut self,
        name: impl Into<String>,
        a: Location,
        b: Location,
        duration: u64,
    ) -> &mut Self {
        self.edges.push(RawEdge { name: name.into(), a, b, duration: Some(duration) });
        self
    }

    /// Add an edge whose duration is the calculator distance between its
    /// endpoints, rounded up to a whole tick.
    pub fn add_measured_edge(
        &mut self,
        name: impl Into<String>,
        a: Location,
        b: Location,
    ) -> &mut Self {
        self.edges.push(RawEdge { name: name.into(), a, b, duration: None });
        self
    }

    /// `true` if a node with this name and location could currently be added
    /// without failing validation.
    pub fn check_node(&self, name: &str, location: Location) -> bool {
        !self.name_taken(name) && self.nodes.iter().all(|(_, l)| *l != location)
    }

    /// `true` if an edge with this name and endpoints could currently be
    /// added without failing validation.
    pub fn check_edge(&self, name: &str, a: Location, b: Location) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        a != b
            && !self.name_taken(name)
            && self.nodes.iter().any(|(_, l)| *l == a)
            && self.nodes.iter().any(|(_, l)| *l == b)
            && !self.edges.iter().any(|e| {
                let k = if e.a <= e.b { (e.a, e.b) } else { (e.b, e.a) };
                k == key
            })
    }

    /// Remove the node or edge previously added under `name`.
    ///
    /// Returns `true` if a component was removed.
    pub fn remove_component(&mut self, name: &str) -> bool {
        if let Some(i) = self.nodes.iter().position(|(n, _)| n == name) {
            self.nodes.remove(i);
            return true;
        }
        if let Some(i) = self.edges.iter().position(|e| e.name == name) {
            self.edges.remove(i);
            return true;
        }
        false
    }

    fn name_taken(&self, name: &str) -> bool {
        self.nodes.iter().any(|(n, _)| n == name) || self.edges.iter().any(|e| e.name == name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Consume the builder and produce a validated [`Region`].
    ///
    /// # Errors
    ///
    /// Returns the first [`RegionError`] encountered: duplicate component
    /// names, two nodes at one location, self-loops, duplicate or dangling
    /// edges, or a zero traversal duration.
    pub fn build(self) -> RegionResult<Region> {
        let mut names: BTreeSet<String> = BTreeSet::new();
        let mut nodes: BTreeMap<Location, Node> = BTreeMap::new();

        for (name, location) in self.nodes {
            if !names.insert(name.clone()) {
                return Err(RegionError::DuplicateName(name));
            }
            let node = Node { name, location, connections: BTreeSet::new() };
            if nodes.insert(location, node).is_some() {
                return Err(RegionError::DuplicateNode(location));
            }
        }

        let mut edges: BTreeMap<(Location, Location), Edge> = BTreeMap::new();
        for raw in self.edges {
            if !names.insert(raw.name.clone()) {
                return Err(RegionError::DuplicateName(raw.name));
            }
            if raw.a == raw.b {
                return Err(RegionError::SelfLoop { name: raw.name, location: raw.a });
            }
            for endpoint in [raw.a, raw.b] {
                if !nodes.contains_key(&endpoint) {
                    return Err(RegionError::MissingEndpoint {
                        name: raw.name,
                        location: endpoint,
                    });
                }
            }

            let duration = match raw.duration {
                Some(d) => d,
                None => self.calculator.distance(raw.a, raw.b).ceil() as u64,
            };
            if duration == 0 {
                return Err(RegionError::ZeroDuration { name: raw.name });
            }

            let edge = Edge::new(raw.name, raw.a, raw.b, duration);
            let key = edge.key();
            if edges.contains_key(&key) {
                return Err(RegionError::DuplicateEdge { a: key.0, b: key.1 });
            }

            // Record the adjacency on both endpoints (verified present above).
            if let Some(n) = nodes.get_mut(&key.0) {
                n.connections.insert(key.1);
            }
            if let Some(n) = nodes.get_mut(&key.1) {
                n.connections.insert(key.0);
            }
            edges.insert(key, edge);
        }

        // Bulk-load the R-tree for O(N log N) construction.
        let entries: Vec<NodeEntry> = nodes
            .keys()
            .map(|&location| NodeEntry {
                point: [location.x as i64, location.y as i64],
                location,
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(Region { nodes, edges, calculator: self.calculator, spatial_idx })
    }
}

impl Default for RegionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
