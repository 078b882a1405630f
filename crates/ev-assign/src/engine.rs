//! The `AssignmentEngine` and its round pipeline.

use std::sync::Arc;

use tracing::{debug, warn};

use ev_colony::{DistanceTable, PheromoneStore, ProposalScorer, StationSelector};
use ev_core::{ColonyRng, EngineConfig, Station, Vehicle, VehicleId, total_slots, validate_roster};
use ev_spatial::{RoadNetwork, Router};

use crate::{
    AssignResult, Decision, NoopObserver, PriorityRanker, RoundAssignment, RoundObserver,
    RoundOutcome,
};

/// Assigns waiting vehicles to station slots, one round per call.
///
/// # One round
///
/// 1. Validate the roster.
/// 2. Rank vehicles by priority, descending.
/// 3. The top `Σ station.slots` vehicles become charging candidates; the rest
///    wait.
/// 4. Run the station selector on the candidates (updates the pheromone store).
/// 5. Walk candidates by priority, handing out slot-tokens: keep the proposed
///    station if it has a token left, otherwise move to the nearest station
///    that does, otherwise demote.
///
/// The engine owns its RNG and round counter; the pheromone store is owned by
/// the caller and passed to every round.  Calls on one store must not overlap.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct AssignmentEngine<R: Router, S: ProposalScorer> {
    pub(crate) config:  EngineConfig,
    pub(crate) network: Arc<RoadNetwork>,
    pub(crate) router:  R,
    pub(crate) scorer:  S,
    pub(crate) rng:     ColonyRng,
    pub(crate) round:   u64,
}

impl<R: Router, S: ProposalScorer> AssignmentEngine<R, S> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn network(&self) -> &Arc<RoadNetwork> {
        &self.network
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Number of rounds completed so far.
    pub fn rounds_run(&self) -> u64 {
        self.round
    }

    // ── Pheromone lifecycle ───────────────────────────────────────────────

    /// Fresh store covering every (vehicle, station) pair.
    pub fn initialize_pheromones(&self, vehicles: &[Vehicle], stations: &[Station]) -> PheromoneStore {
        let mut store = PheromoneStore::new();
        for v in vehicles {
            self.register(&mut store, v, stations);
        }
        store
    }

    /// Add a newly arrived vehicle without touching anyone else's affinities.
    /// Returns `true` if the vehicle was not yet known.
    pub fn register(&self, store: &mut PheromoneStore, vehicle: &Vehicle, stations: &[Station]) -> bool {
        let ids: Vec<_> = stations.iter().map(|s| s.id).collect();
        store.register(vehicle.id, &ids, self.config.colony.initial_affinity)
    }

    /// Drop a vehicle that left the active roster.
    pub fn retire(&self, store: &mut PheromoneStore, vehicle: VehicleId) -> bool {
        let evicted = store.evict(vehicle);
        if evicted {
            debug!(%vehicle, "vehicle retired; pheromone row evicted");
        }
        evicted
    }

    // ── Rounds ────────────────────────────────────────────────────────────

    /// Run one round without callbacks.
    pub fn run_round(
        &mut self,
        vehicles: &[Vehicle],
        stations: &[Station],
        store:    &mut PheromoneStore,
    ) -> AssignResult<RoundOutcome> {
        self.run_round_observed(vehicles, stations, store, &mut NoopObserver)
    }

    /// Run one round, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// - [`AssignError::Core`][crate::AssignError::Core] for out-of-range or
    ///   duplicate records.
    /// - [`AssignError::Colony`][crate::AssignError::Colony] when a candidate
    ///   has no pheromone entry.  The store is left untouched.
    ///
    /// In both cases the round counter does not advance.
    pub fn run_round_observed<O: RoundObserver>(
        &mut self,
        vehicles: &[Vehicle],
        stations: &[Station],
        store:    &mut PheromoneStore,
        observer: &mut O,
    ) -> AssignResult<RoundOutcome> {
        validate_roster(vehicles, stations)?;
        let round = self.round;
        observer.on_round_start(round, vehicles.len());

        // ── Rank and cut at the slot count ────────────────────────────────
        let priorities = PriorityRanker::new(&self.config.priority).rank(vehicles);
        let cut = total_slots(stations).min(vehicles.len());
        let (charging, waiting) = priorities.split_at(cut);
        let candidates: Vec<&Vehicle> = charging.iter().map(|r| &vehicles[r.index]).collect();

        // ── Colony proposal ───────────────────────────────────────────────
        let table = DistanceTable::build(&self.network, &self.router, &candidates, stations)?;
        let selection = StationSelector::new(&self.config.colony).select(
            &candidates,
            stations,
            &table,
            store,
            &self.scorer,
            &mut self.rng,
        )?;
        observer.on_proposal(round, &selection.proposal, selection.cost);

        // ── Conflict resolution ───────────────────────────────────────────
        let mut tokens: Vec<u32> = stations.iter().map(|s| s.slots).collect();
        let mut assignment = RoundAssignment::default();
        let mut off_road = 0;

        for (row, v) in candidates.iter().enumerate() {
            let decision = match selection.proposal.get(v.id).and_then(|s| table.station_col(s)) {
                Some(col) if tokens[col] > 0 => {
                    tokens[col] -= 1;
                    Decision::Confirmed(stations[col].id)
                }
                proposed => match nearest_available(&table, row, &tokens) {
                    Some(col) => {
                        tokens[col] -= 1;
                        if table.road_at(row, col).is_infinite() {
                            off_road += 1;
                        }
                        let station = stations[col].id;
                        Decision::Reassigned {
                            proposed: proposed.map_or(station, |p| stations[p].id),
                            station,
                        }
                    }
                    None => {
                        warn!(vehicle = %v.id, round, "no slot left; vehicle demoted");
                        Decision::Demoted
                    }
                },
            };
            assignment.push(v.id, decision);
        }
        for r in waiting {
            assignment.push(r.vehicle, Decision::Waiting);
        }

        if off_road > 0 {
            warn!(
                round,
                vehicles = off_road,
                "no free station reachable by road; reassigned by straight-line distance"
            );
        }
        debug!(
            round,
            vehicles = vehicles.len(),
            candidates = candidates.len(),
            assigned = assignment.assigned_count(),
            cost = selection.cost,
            "round complete"
        );

        let outcome = RoundOutcome { round, assignment, priorities, selection, off_road };
        observer.on_round_end(round, &outcome);
        self.round += 1;
        Ok(outcome)
    }
}

/// Column of the station with a free token closest to vehicle `row`.
///
/// Ordered by road distance, ties kept in station order.  Straight-line
/// distance only ranks stations that are both unreachable by road.
fn nearest_available(table: &DistanceTable, row: usize, tokens: &[u32]) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t > 0)
        .map(|(col, _)| col)
        .min_by(|&a, &b| {
            let (ra, rb) = (table.road_at(row, a), table.road_at(row, b));
            if ra.is_infinite() && rb.is_infinite() {
                table.straight_at(row, a).total_cmp(&table.straight_at(row, b))
            } else {
                ra.total_cmp(&rb)
            }
        })
}
