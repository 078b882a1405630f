//! The pheromone store: learned (vehicle, station) affinities.

use std::collections::HashMap;

use ev_core::{StationId, VehicleId};

use crate::{ColonyError, ColonyResult};

/// Affinity given to every pair by [`PheromoneStore::initialize`].
pub const INITIAL_AFFINITY: f64 = 1.0;

/// Smallest value an affinity may decay to.  Affinities are multiplicative
/// sampling weights and must never become exactly zero.
pub const MIN_AFFINITY: f64 = f64::MIN_POSITIVE;

/// Mapping `vehicle → station → affinity`.
///
/// Every registered (vehicle, station) pair has a strictly positive entry.
/// Entries live until the vehicle is [evicted](Self::evict).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PheromoneStore {
    trails: HashMap<VehicleId, HashMap<StationId, f64>>,
}

impl PheromoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with every `(vehicle, station)` pair set to [`INITIAL_AFFINITY`].
    pub fn initialize(vehicles: &[VehicleId], stations: &[StationId]) -> Self {
        Self::initialize_with(vehicles, stations, INITIAL_AFFINITY)
    }

    /// Store with every `(vehicle, station)` pair set to `initial`.
    pub fn initialize_with(vehicles: &[VehicleId], stations: &[StationId], initial: f64) -> Self {
        let mut store = Self::new();
        for &v in vehicles {
            store.register(v, stations, initial);
        }
        store
    }

    /// Add any missing `(vehicle, station)` pairs with affinity `initial`.
    ///
    /// Existing entries keep their learned value.  Returns `true` if the
    /// vehicle had no entries before.
    pub fn register(&mut self, vehicle: VehicleId, stations: &[StationId], initial: f64) -> bool {
        let is_new = !self.trails.contains_key(&vehicle);
        let row = self.trails.entry(vehicle).or_default();
        for &s in stations {
            row.entry(s).or_insert(initial.max(MIN_AFFINITY));
        }
        is_new
    }

    /// Drop every entry of `vehicle`.  Returns `true` if it was present.
    pub fn evict(&mut self, vehicle: VehicleId) -> bool {
        self.trails.remove(&vehicle).is_some()
    }

    /// Multiply every affinity by `1 - factor`.
    ///
    /// # Errors
    ///
    /// [`ColonyError::InvalidDecay`] unless `factor ∈ [0, 1)`.
    pub fn decay(&mut self, factor: f64) -> ColonyResult<()> {
        if !(0.0..1.0).contains(&factor) {
            return Err(ColonyError::InvalidDecay(factor));
        }
        let keep = 1.0 - factor;
        for value in self.trails.values_mut().flat_map(|row| row.values_mut()) {
            *value = (*value * keep).max(MIN_AFFINITY);
        }
        Ok(())
    }

    /// Add `amount` to the `(vehicle, station)` affinity.
    pub fn reinforce(&mut self, vehicle: VehicleId, station: StationId, amount: f64) -> ColonyResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ColonyError::InvalidAmount(amount));
        }
        let value = self
            .trails
            .get_mut(&vehicle)
            .and_then(|row| row.get_mut(&station))
            .ok_or(ColonyError::Uninitialized { vehicle, station })?;
        *value += amount;
        Ok(())
    }

    /// Current affinity of the pair.
    ///
    /// # Errors
    ///
    /// [`ColonyError::Uninitialized`] if the pair was never registered.
    pub fn affinity(&self, vehicle: VehicleId, station: StationId) -> ColonyResult<f64> {
        self.trails
            .get(&vehicle)
            .and_then(|row| row.get(&station))
            .copied()
            .ok_or(ColonyError::Uninitialized { vehicle, station })
    }

    pub fn contains(&self, vehicle: VehicleId, station: StationId) -> bool {
        self.trails.get(&vehicle).is_some_and(|row| row.contains_key(&station))
    }

    pub fn has_vehicle(&self, vehicle: VehicleId) -> bool {
        self.trails.contains_key(&vehicle)
    }

    /// Number of vehicles with at least one entry.
    pub fn vehicle_count(&self) -> usize {
        self.trails.len()
    }

    /// Total number of (vehicle, station) entries.
    pub fn len(&self) -> usize {
        self.trails.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, StationId, f64)> + '_ {
        self.trails
            .iter()
            .flat_map(|(&v, row)| row.iter().map(move |(&s, &a)| (v, s, a)))
    }
}
