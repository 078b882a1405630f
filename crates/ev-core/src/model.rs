//! Vehicle and station records.
//!
//! Both are owned by the surrounding simulation.  The assignment engine only
//! reads them; state-of-charge and position are mutated between rounds by
//! whatever drives the vehicles.

use std::collections::{HashSet, VecDeque};

use crate::{CoreError, CoreResult, Point, StationId, VehicleId};

/// Default simulation tick length used by charge-time estimates.
pub const DEFAULT_TICK_MINUTES: u32 = 5;

/// Lower bound on station power when estimating charge time, so a
/// misconfigured zero-power charger yields a long but finite duration.
const MIN_CHARGE_POWER: f64 = 0.1;

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// An electric vehicle awaiting (or undergoing) a charge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id: VehicleId,
    /// State of charge in `[0, 1]`.
    pub soc: f64,
    /// Remaining trip distance (same unit as the priority distance scale).
    pub distance: f64,
    /// Battery capacity in energy units (kWh in the demo).
    pub capacity: f64,
    /// Caller-supplied urgency weight in `[0, 1]`.
    pub urgency: f64,
    pub position: Point,
    /// Ticks of charging still owed.  Zero until a charge starts.
    pub charging_ticks_left: u32,
}

impl Vehicle {
    pub fn new(
        id:       VehicleId,
        soc:      f64,
        distance: f64,
        capacity: f64,
        urgency:  f64,
        position: Point,
    ) -> Self {
        Self { id, soc, distance, capacity, urgency, position, charging_ticks_left: 0 }
    }

    /// Energy required to reach a full battery.
    #[inline]
    pub fn energy_needed(&self) -> f64 {
        ((1.0 - self.soc) * self.capacity).max(0.0)
    }

    /// Check the ranges the priority formula relies on.
    pub fn validate(&self) -> CoreResult<()> {
        let fail = |reason: &str| {
            Err(CoreError::InvalidVehicle { id: self.id, reason: reason.to_string() })
        };
        if !(0.0..=1.0).contains(&self.soc) {
            return fail("state of charge must lie in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.urgency) {
            return fail("urgency must lie in [0, 1]");
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return fail("trip distance must be finite and non-negative");
        }
        if !self.capacity.is_finite() || self.capacity < 0.0 {
            return fail("battery capacity must be finite and non-negative");
        }
        if !self.position.is_finite() {
            return fail("position must be finite");
        }
        Ok(())
    }
}

// ── Station ───────────────────────────────────────────────────────────────────

/// A charging station with one or more concurrent slots.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id: StationId,
    /// Charging power in energy units per hour.
    pub power: f64,
    pub position: Point,
    /// Number of vehicles that can charge at once.  Always ≥ 1.
    pub slots: u32,
    /// Vehicles waiting at the station.  FIFO, not consulted by the engine.
    #[cfg_attr(feature = "serde", serde(default))]
    queue: VecDeque<VehicleId>,
}

impl Station {
    /// Single-slot station.
    pub fn new(id: StationId, power: f64, position: Point) -> Self {
        Self::with_slots(id, power, position, 1)
    }

    pub fn with_slots(id: StationId, power: f64, position: Point, slots: u32) -> Self {
        Self { id, power, position, slots, queue: VecDeque::new() }
    }

    /// Append `vehicle` to the pending queue.
    pub fn enqueue(&mut self, vehicle: VehicleId) {
        self.queue.push_back(vehicle);
    }

    /// Remove and return the vehicle at the head of the queue.
    pub fn dequeue(&mut self) -> Option<VehicleId> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.queue.iter().copied()
    }

    /// Number of ticks needed to fill `vehicle` at this station, rounded up
    /// and never less than one.
    pub fn charge_ticks(&self, vehicle: &Vehicle, tick_minutes: u32) -> u32 {
        let ticks_per_hour = f64::from(60 / tick_minutes.clamp(1, 60));
        let hours = vehicle.energy_needed() / self.power.max(MIN_CHARGE_POWER);
        ((hours * ticks_per_hour).ceil() as u32).max(1)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let fail = |reason: &str| {
            Err(CoreError::InvalidStation { id: self.id, reason: reason.to_string() })
        };
        if !self.power.is_finite() || self.power <= 0.0 {
            return fail("charging power must be finite and positive");
        }
        if self.slots == 0 {
            return fail("a station needs at least one slot");
        }
        if !self.position.is_finite() {
            return fail("position must be finite");
        }
        Ok(())
    }
}

// ── Roster checks ─────────────────────────────────────────────────────────────

/// Validate every record and reject duplicate ids.
pub fn validate_roster(vehicles: &[Vehicle], stations: &[Station]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(vehicles.len());
    for v in vehicles {
        v.validate()?;
        if !seen.insert(v.id) {
            return Err(CoreError::DuplicateVehicle(v.id));
        }
    }

    let mut seen = HashSet::with_capacity(stations.len());
    for s in stations {
        s.validate()?;
        if !seen.insert(s.id) {
            return Err(CoreError::DuplicateStation(s.id));
        }
    }
    Ok(())
}

/// Total slot-tokens offered by `stations`.
#[inline]
pub fn total_slots(stations: &[Station]) -> usize {
    stations.iter().map(|s| s.slots as usize).sum()
}
