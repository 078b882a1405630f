//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The assignment engine calls routing through the [`Router`] trait, so an
//! application can substitute A* or a precomputed distance oracle without
//! touching the engine.  [`DijkstraRouter`] is the default.
//!
//! # Cost units
//!
//! Costs are edge lengths in the same planar units as [`Point`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ev_core::{Point, WaypointId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a successful routing query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Waypoints in travel order, source and destination inclusive.
    pub waypoints: Vec<WaypointId>,
    /// Sum of edge lengths along `waypoints`.
    pub distance: f64,
}

impl Route {
    /// `true` if the source and destination are the same waypoint.
    pub fn is_trivial(&self) -> bool {
        self.waypoints.len() <= 1
    }

    /// Number of road segments traversed.
    pub fn hop_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve ants built
/// on a Rayon pool.
pub trait Router: Send + Sync {
    /// Shortest route from `from` to `to`.
    ///
    /// `Ok(None)` means the two waypoints are not connected.  `from == to`
    /// yields a single-waypoint route of length zero.
    ///
    /// # Errors
    ///
    /// [`SpatialError::UnknownWaypoint`] if either id is not in `network`.
    fn route(
        &self,
        network: &RoadNetwork,
        from:    WaypointId,
        to:      WaypointId,
    ) -> SpatialResult<Option<Route>>;

    /// Shortest distance, `f64::INFINITY` when unreachable.
    fn distance(
        &self,
        network: &RoadNetwork,
        from:    WaypointId,
        to:      WaypointId,
    ) -> SpatialResult<f64> {
        Ok(self.route(network, from, to)?.map_or(f64::INFINITY, |r| r.distance))
    }

    /// Distances from `from` to each of `targets`, in order.
    ///
    /// The default issues one query per target; implementations that can
    /// answer all targets from a single search should override it.
    fn distances_from(
        &self,
        network: &RoadNetwork,
        from:    WaypointId,
        targets: &[WaypointId],
    ) -> SpatialResult<Vec<f64>> {
        targets.iter().map(|&to| self.distance(network, from, to)).collect()
    }

    /// Road distance between two arbitrary positions after snapping each to
    /// its nearest waypoint.
    ///
    /// An empty network has nothing to snap to and reports `f64::INFINITY`.
    fn snapped_distance(&self, network: &RoadNetwork, a: Point, b: Point) -> SpatialResult<f64> {
        match (network.nearest_waypoint(a), network.nearest_waypoint(b)) {
            (Some(from), Some(to)) => self.distance(network, from, to),
            _ => Ok(f64::INFINITY),
        }
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR road graph with a binary heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    WaypointId,
        to:      WaypointId,
    ) -> SpatialResult<Option<Route>> {
        check(network, from)?;
        check(network, to)?;

        let tree = search(network, from, Some(to));
        let distance = tree.dist[to.index()];
        if distance.is_infinite() {
            return Ok(None);
        }
        Ok(Some(Route { waypoints: tree.path_to(to), distance }))
    }

    fn distances_from(
        &self,
        network: &RoadNetwork,
        from:    WaypointId,
        targets: &[WaypointId],
    ) -> SpatialResult<Vec<f64>> {
        check(network, from)?;
        for &t in targets {
            check(network, t)?;
        }
        let tree = search(network, from, None);
        Ok(targets.iter().map(|t| tree.dist[t.index()]).collect())
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn check(network: &RoadNetwork, id: WaypointId) -> SpatialResult<()> {
    if network.contains(id) {
        Ok(())
    } else {
        Err(SpatialError::UnknownWaypoint(id))
    }
}

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the cheapest
/// frontier node first.  Ties fall back to the lower waypoint id.
#[derive(Clone, Copy, PartialEq)]
struct Frontier {
    cost: f64,
    node: WaypointId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path tree rooted at the search source.
struct SearchTree {
    /// Best known distance per waypoint; `INFINITY` for unreached ones.
    dist: Vec<f64>,
    /// Predecessor on the best path; `None` for the source and unreached ones.
    prev: Vec<Option<WaypointId>>,
}

impl SearchTree {
    fn path_to(&self, to: WaypointId) -> Vec<WaypointId> {
        let mut path = vec![to];
        let mut cur = to;
        while let Some(p) = self.prev[cur.index()] {
            path.push(p);
            cur = p;
        }
        path.reverse();
        path
    }
}

/// Run Dijkstra from `from`.  With `Some(target)` the search stops as soon
/// as the target is settled.
fn search(network: &RoadNetwork, from: WaypointId, target: Option<WaypointId>) -> SearchTree {
    let n = network.waypoint_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev = vec![None; n];

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Frontier { cost: 0.0, node: from });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if Some(node) == target {
            break;
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, weight) in network.neighbors(node) {
            let new_cost = cost + weight;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = Some(node);
                heap.push(Frontier { cost: new_cost, node: neighbor });
            }
        }
    }

    SearchTree { dist, prev }
}
