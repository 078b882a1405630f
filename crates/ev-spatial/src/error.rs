//! Spatial-subsystem error type.

use thiserror::Error;

use ev_core::{Point, WaypointId};

/// Errors produced by `ev-spatial`.
///
/// Both variants are contract violations.  An unreachable destination is not
/// an error.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("waypoint {0} not found in network")]
    UnknownWaypoint(WaypointId),

    #[error("no waypoint at position {0}")]
    UnknownPosition(Point),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
