//! Demo road map and roster.
//!
//! Two parallel east-west roads (y = 200 and y = 350) joined by north-south
//! connectors at x = 300 and x = 500.  Vehicles queue on the west side,
//! stations sit just beyond the east end.

use ev_core::{Point, Station, StationId, Vehicle, VehicleId};
use ev_spatial::{RoadNetwork, RoadNetworkBuilder};

const WAYPOINTS: [(f64, f64); 8] = [
    (100.0, 200.0), (300.0, 200.0), (500.0, 200.0), (700.0, 200.0),
    (100.0, 350.0), (300.0, 350.0), (500.0, 350.0), (700.0, 350.0),
];

/// Index pairs into `WAYPOINTS`.
const ROADS: [(usize, usize); 8] = [
    (0, 1), (1, 2), (2, 3), // north road
    (4, 5), (5, 6), (6, 7), // south road
    (1, 5), (2, 6),         // connectors
];

pub fn build_network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    for (x, y) in WAYPOINTS {
        b.add_waypoint(Point::new(x, y));
    }
    for (a, c) in ROADS {
        let (a, c) = (WAYPOINTS[a], WAYPOINTS[c]);
        b.add_road(a.into(), c.into());
    }
    b.build()
}

/// `(id, soc, trip distance, capacity kWh, urgency, y)`; all start at x = 100.
pub fn build_fleet() -> Vec<Vehicle> {
    [
        (1, 0.20, 120.0, 60.0, 1.0, 200.0),
        (2, 0.80,  40.0, 50.0, 0.0, 260.0),
        (3, 0.10, 150.0, 70.0, 1.0, 320.0),
        (4, 0.50,  80.0, 45.0, 0.0, 380.0),
    ]
    .into_iter()
    .map(|(id, soc, dist, cap, urg, y)| {
        Vehicle::new(VehicleId(id), soc, dist, cap, urg, Point::new(100.0, y))
    })
    .collect()
}

pub fn build_stations() -> Vec<Station> {
    vec![
        Station::new(StationId(1), 50.0, Point::new(750.0, 240.0)),
        Station::new(StationId(2), 30.0, Point::new(750.0, 360.0)),
    ]
}
