//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` via `From`
//! where they surface model or configuration problems.

use thiserror::Error;

use crate::{StationId, VehicleId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("vehicle {id} is invalid: {reason}")]
    InvalidVehicle { id: VehicleId, reason: String },

    #[error("station {id} is invalid: {reason}")]
    InvalidStation { id: StationId, reason: String },

    #[error("vehicle {0} appears more than once in the roster")]
    DuplicateVehicle(VehicleId),

    #[error("station {0} appears more than once in the station list")]
    DuplicateStation(StationId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ev-core`.
pub type CoreResult<T> = Result<T, CoreError>;
