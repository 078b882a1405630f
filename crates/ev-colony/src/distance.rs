//! Per-round vehicle × station distance table.
//!
//! Road distances do not change while a round is being computed, so they are
//! resolved once (one shortest-path search per vehicle) and shared by the
//! ants, the scorer, and conflict resolution.

use std::collections::HashMap;

use ev_core::{Station, StationId, Vehicle, VehicleId};
use ev_spatial::{RoadNetwork, Router, SpatialResult};

/// Row-major `vehicles × stations` matrix of road and straight-line
/// distances.
///
/// Road distances are measured between the nearest waypoints of the two
/// positions and are `f64::INFINITY` when no road connects them (or the
/// network is empty).
#[derive(Clone, Debug)]
pub struct DistanceTable {
    vehicles: Vec<VehicleId>,
    stations: Vec<StationId>,
    road:     Vec<f64>,
    straight: Vec<f64>,
    row_of:   HashMap<VehicleId, usize>,
    col_of:   HashMap<StationId, usize>,
}

impl DistanceTable {
    /// Resolve all distances between `vehicles` and `stations`.
    ///
    /// Row and column order follow the input slices.
    pub fn build<R: Router + ?Sized>(
        network:  &RoadNetwork,
        router:   &R,
        vehicles: &[&Vehicle],
        stations: &[Station],
    ) -> SpatialResult<Self> {
        let snapped: Vec<_> = stations
            .iter()
            .map(|s| network.nearest_waypoint(s.position))
            .collect();
        let targets: Vec<_> = snapped.iter().flatten().copied().collect();

        let cols = stations.len();
        let mut road     = Vec::with_capacity(vehicles.len() * cols);
        let mut straight = Vec::with_capacity(vehicles.len() * cols);

        for v in vehicles {
            let reached = match network.nearest_waypoint(v.position) {
                Some(from) => router.distances_from(network, from, &targets)?,
                None       => Vec::new(),
            };
            let mut reached = reached.into_iter();
            for (s, snap) in stations.iter().zip(&snapped) {
                // `targets` skips unsnappable stations, so only advance the
                // iterator for stations that had a waypoint.
                let d = match snap {
                    Some(_) => reached.next().unwrap_or(f64::INFINITY),
                    None    => f64::INFINITY,
                };
                road.push(d);
                straight.push(v.position.distance(s.position));
            }
        }

        Ok(Self {
            row_of:   vehicles.iter().enumerate().map(|(i, v)| (v.id, i)).collect(),
            col_of:   stations.iter().enumerate().map(|(j, s)| (s.id, j)).collect(),
            vehicles: vehicles.iter().map(|v| v.id).collect(),
            stations: stations.iter().map(|s| s.id).collect(),
            road,
            straight,
        })
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn vehicle_row(&self, vehicle: VehicleId) -> Option<usize> {
        self.row_of.get(&vehicle).copied()
    }

    pub fn station_col(&self, station: StationId) -> Option<usize> {
        self.col_of.get(&station).copied()
    }

    /// Road distance by matrix position.
    #[inline]
    pub fn road_at(&self, row: usize, col: usize) -> f64 {
        self.road[row * self.stations.len() + col]
    }

    /// Straight-line distance by matrix position.
    #[inline]
    pub fn straight_at(&self, row: usize, col: usize) -> f64 {
        self.straight[row * self.stations.len() + col]
    }

    /// Road distance by id, `None` if either id is not in the table.
    pub fn road(&self, vehicle: VehicleId, station: StationId) -> Option<f64> {
        Some(self.road_at(self.vehicle_row(vehicle)?, self.station_col(station)?))
    }

    pub fn straight_line(&self, vehicle: VehicleId, station: StationId) -> Option<f64> {
        Some(self.straight_at(self.vehicle_row(vehicle)?, self.station_col(station)?))
    }

    /// Road distance, or straight-line distance when the road distance is
    /// unreachable.
    pub fn travel(&self, vehicle: VehicleId, station: StationId) -> Option<f64> {
        let row = self.vehicle_row(vehicle)?;
        let col = self.station_col(station)?;
        let d = self.road_at(row, col);
        Some(if d.is_finite() { d } else { self.straight_at(row, col) })
    }
}
