//! Result types of one orchestration round.

use std::collections::HashMap;

use ev_colony::Selection;
use ev_core::{StationId, VehicleId};

use crate::Ranked;

/// What happened to one vehicle in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The colony's proposal had a free slot and was kept.
    Confirmed(StationId),
    /// The proposed station was full; the vehicle was moved to the closest
    /// station that still had a slot.
    Reassigned { proposed: StationId, station: StationId },
    /// The vehicle was a charging candidate but every slot was taken.
    Demoted,
    /// Ranked below the slot cut-off; not considered this round.
    Waiting,
}

impl Decision {
    /// Assigned station, if any.
    pub fn station(&self) -> Option<StationId> {
        match *self {
            Decision::Confirmed(s) | Decision::Reassigned { station: s, .. } => Some(s),
            Decision::Demoted | Decision::Waiting => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.station().is_some()
    }
}

/// Vehicle → station-or-none mapping for one round.
///
/// Iteration follows descending priority.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundAssignment {
    order:     Vec<VehicleId>,
    decisions: HashMap<VehicleId, Decision>,
}

impl RoundAssignment {
    pub(crate) fn push(&mut self, vehicle: VehicleId, decision: Decision) {
        self.order.push(vehicle);
        self.decisions.insert(vehicle, decision);
    }

    pub fn decision(&self, vehicle: VehicleId) -> Option<Decision> {
        self.decisions.get(&vehicle).copied()
    }

    /// Station assigned to `vehicle`; `None` if it must wait or is unknown.
    pub fn station(&self, vehicle: VehicleId) -> Option<StationId> {
        self.decision(vehicle).and_then(|d| d.station())
    }

    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, Decision)> + '_ {
        self.order.iter().map(|v| (*v, self.decisions[v]))
    }

    /// `(vehicle, station)` for every vehicle that received a station.
    pub fn assigned(&self) -> impl Iterator<Item = (VehicleId, StationId)> + '_ {
        self.iter().filter_map(|(v, d)| d.station().map(|s| (v, s)))
    }

    /// Vehicles left without a station this round.
    pub fn unassigned(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.iter().filter(|(_, d)| !d.is_assigned()).map(|(v, _)| v)
    }

    pub fn assigned_count(&self) -> usize {
        self.decisions.values().filter(|d| d.is_assigned()).count()
    }

    /// Number of vehicles assigned to each station.
    pub fn station_loads(&self) -> HashMap<StationId, usize> {
        let mut loads = HashMap::new();
        for (_, s) in self.assigned() {
            *loads.entry(s).or_insert(0) += 1;
        }
        loads
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Everything a round produces.  The pheromone store is updated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    /// Zero-based round counter of the engine that produced this outcome.
    pub round: u64,
    pub assignment: RoundAssignment,
    /// Priority scores in descending order.
    pub priorities: Vec<Ranked>,
    /// The colony proposal before conflict resolution.
    pub selection: Selection,
    /// Reassignments chosen by straight-line distance because no free
    /// station was reachable by road.
    pub off_road: usize,
}

impl RoundOutcome {
    pub fn priority(&self, vehicle: VehicleId) -> Option<f64> {
        self.priorities.iter().find(|r| r.vehicle == vehicle).map(|r| r.score)
    }
}
