use ev_colony::ColonyError;
use ev_core::CoreError;
use ev_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssignError {
    #[error("invalid round input: {0}")]
    Core(#[from] CoreError),

    #[error("station selection failed: {0}")]
    Colony(#[from] ColonyError),

    #[error("road network query failed: {0}")]
    Spatial(#[from] SpatialError),
}

pub type AssignResult<T> = Result<T, AssignError>;
