use ev_core::{StationId, VehicleId};
use ev_spatial::SpatialError;
use rand::distributions::WeightedError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColonyError {
    #[error("no pheromone entry for ({vehicle}, {station}); register the vehicle first")]
    Uninitialized { vehicle: VehicleId, station: StationId },

    #[error("decay factor {0} outside [0, 1)")]
    InvalidDecay(f64),

    #[error("reinforcement amount {0} must be finite and non-negative")]
    InvalidAmount(f64),

    #[error("station sampling failed: {0}")]
    Sampling(#[from] WeightedError),

    #[error("road distance lookup failed: {0}")]
    Spatial(#[from] SpatialError),
}

pub type ColonyResult<T> = Result<T, ColonyError>;
