//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `WaypointId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! Every road is stored twice, once per direction, with the same weight (the
//! Euclidean length of the segment).  Iteration over a waypoint's neighbours
//! is a contiguous memory scan, which is what Dijkstra's inner loop wants.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps an arbitrary position to the nearest
//! waypoint.  Vehicles and stations are rarely exactly on a waypoint, so
//! every road-distance query snaps both ends first.
//!
//! # Exact lookup
//!
//! Waypoints are identified by their coordinates: adding the same position
//! twice yields the same [`WaypointId`].  [`RoadNetwork::waypoint_at`]
//! performs the reverse lookup.

use std::collections::HashMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ev_core::{Point, WaypointId};

use crate::{DijkstraRouter, Router, SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index.
#[derive(Clone, Debug)]
struct WaypointEntry {
    point: [f64; 2],
    id:    WaypointId,
}

impl RTreeObject for WaypointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for WaypointEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format plus a spatial index for snapping.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].
#[derive(Debug)]
pub struct RoadNetwork {
    /// Position of each waypoint.  Indexed by `WaypointId`.
    pub waypoint_pos: Vec<Point>,

    /// CSR row pointer.  Length = `waypoint_count + 1`.
    pub out_start: Vec<u32>,

    /// Destination waypoint of each directed edge.
    pub edge_to: Vec<WaypointId>,

    /// Length of each directed edge.  Always finite and non-negative.
    pub edge_weight: Vec<f64>,

    by_position: HashMap<(u64, u64), WaypointId>,
    spatial_idx: RTree<WaypointEntry>,
}

impl RoadNetwork {
    /// Construct a network with no waypoints.  Every snap returns `None`.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn waypoint_count(&self) -> usize {
        self.waypoint_pos.len()
    }

    /// Number of directed edges (two per road).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoint_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: WaypointId) -> bool {
        id.index() < self.waypoint_pos.len()
    }

    /// Position of `id`, or [`SpatialError::UnknownWaypoint`].
    pub fn position(&self, id: WaypointId) -> SpatialResult<Point> {
        self.waypoint_pos
            .get(id.index())
            .copied()
            .ok_or(SpatialError::UnknownWaypoint(id))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Neighbours of `node` with the length of the connecting edge.
    ///
    /// Callers must check [`contains`](Self::contains) first.
    #[inline]
    pub fn neighbors(&self, node: WaypointId) -> impl Iterator<Item = (WaypointId, f64)> + '_ {
        let start = self.out_start[node.index()] as usize;
        let end   = self.out_start[node.index() + 1] as usize;
        (start..end).map(|e| (self.edge_to[e], self.edge_weight[e]))
    }

    #[inline]
    pub fn degree(&self, node: WaypointId) -> usize {
        let start = self.out_start[node.index()] as usize;
        let end   = self.out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Position lookups ──────────────────────────────────────────────────

    /// Waypoint located exactly at `pos`, if any.
    pub fn waypoint_at(&self, pos: Point) -> Option<WaypointId> {
        self.by_position.get(&pos.bits()).copied()
    }

    /// Like [`waypoint_at`](Self::waypoint_at) but treats a miss as an error.
    pub fn require_waypoint(&self, pos: Point) -> SpatialResult<WaypointId> {
        self.waypoint_at(pos).ok_or(SpatialError::UnknownPosition(pos))
    }

    /// Waypoint closest to `pos` by straight-line distance.
    ///
    /// Equidistant waypoints resolve to the one added first (lowest id), so
    /// the answer is stable for a fixed build order.  Returns `None` only if
    /// the network has no waypoints.
    pub fn nearest_waypoint(&self, pos: Point) -> Option<WaypointId> {
        let mut iter = self
            .spatial_idx
            .nearest_neighbor_iter_with_distance_2(&[pos.x, pos.y]);
        let (first, best_d2) = iter.next()?;
        let tied = iter
            .take_while(|(_, d2)| *d2 == best_d2)
            .map(|(e, _)| e.id);
        Some(tied.fold(first.id, WaypointId::min))
    }

    // ── Convenience queries (exact waypoint positions) ────────────────────

    /// Shortest road distance between two waypoints given by position.
    ///
    /// Returns `f64::INFINITY` when no path exists and `0.0` when
    /// `start == end`.
    pub fn shortest_distance(&self, start: Point, end: Point) -> SpatialResult<f64> {
        let from = self.require_waypoint(start)?;
        let to   = self.require_waypoint(end)?;
        DijkstraRouter.distance(self, from, to)
    }

    /// Waypoint positions along the shortest path, both ends inclusive.
    ///
    /// Empty when `end` is unreachable from `start`.
    pub fn shortest_path(&self, start: Point, end: Point) -> SpatialResult<Vec<Point>> {
        let from = self.require_waypoint(start)?;
        let to   = self.require_waypoint(end)?;
        match DijkstraRouter.route(self, from, to)? {
            None        => Ok(Vec::new()),
            Some(route) => Ok(route
                .waypoints
                .iter()
                .map(|w| self.waypoint_pos[w.index()])
                .collect()),
        }
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ev_core::Point;
/// use ev_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_road(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
/// let net = b.build();
/// assert_eq!(net.waypoint_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// assert_eq!(net.shortest_distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)).unwrap(), 5.0);
/// ```
pub struct RoadNetworkBuilder {
    nodes:       Vec<Point>,
    by_position: HashMap<(u64, u64), WaypointId>,
    raw_edges:   Vec<RawEdge>,
}

struct RawEdge {
    from:   WaypointId,
    to:     WaypointId,
    weight: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:       Vec::new(),
            by_position: HashMap::new(),
            raw_edges:   Vec::new(),
        }
    }

    /// Add a waypoint at `pos`, or return the existing one at that position.
    pub fn add_waypoint(&mut self, pos: Point) -> WaypointId {
        if let Some(&id) = self.by_position.get(&pos.bits()) {
            return id;
        }
        let id = WaypointId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.by_position.insert(pos.bits(), id);
        id
    }

    /// Add an undirected road between `a` and `b`, creating either waypoint
    /// if needed.  The road's weight is the straight-line distance between
    /// its endpoints.
    pub fn add_road(&mut self, a: Point, b: Point) -> (WaypointId, WaypointId) {
        let wa = self.add_waypoint(a);
        let wb = self.add_waypoint(b);
        let weight = a.distance(b);
        self.raw_edges.push(RawEdge { from: wa, to: wb, weight });
        self.raw_edges.push(RawEdge { from: wb, to: wa, weight });
        (wa, wb)
    }

    pub fn waypoint_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// O(E log E) for the edge sort plus O(N log N) for the R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        // Stable sort keeps insertion order among a node's edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_to:     Vec<WaypointId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>        = raw.iter().map(|e| e.weight).collect();

        let mut out_start = vec![0u32; node_count + 1];
        for e in &raw {
            out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            out_start[i] += out_start[i - 1];
        }
        debug_assert_eq!(out_start[node_count] as usize, raw.len());

        let entries: Vec<WaypointEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| WaypointEntry { point: [p.x, p.y], id: WaypointId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            waypoint_pos: self.nodes,
            out_start,
            edge_to,
            edge_weight,
            by_position: self.by_position,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
