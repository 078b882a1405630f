//! A candidate vehicle → station assignment produced by one ant.

use std::collections::HashMap;

use ev_core::{StationId, VehicleId};

/// One station per candidate vehicle, in candidate order.
///
/// Not conflict-resolved: several vehicles may name the same station.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Proposal {
    picks: Vec<(VehicleId, StationId)>,
}

impl Proposal {
    pub fn new(picks: Vec<(VehicleId, StationId)>) -> Self {
        Self { picks }
    }

    /// Station proposed for `vehicle`.
    pub fn get(&self, vehicle: VehicleId) -> Option<StationId> {
        self.picks
            .iter()
            .find(|(v, _)| *v == vehicle)
            .map(|&(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, StationId)> + '_ {
        self.picks.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Number of vehicles proposed to each station.
    pub fn station_loads(&self) -> HashMap<StationId, usize> {
        let mut loads = HashMap::new();
        for &(_, s) in &self.picks {
            *loads.entry(s).or_insert(0) += 1;
        }
        loads
    }
}
