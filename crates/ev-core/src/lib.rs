//! `ev-core`: foundational types for the e-hive charging assignment engine.
//!
//! This crate is a dependency of every other `ev-*` crate.  It has no `ev-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `VehicleId`, `StationId`, `WaypointId`                     |
//! | [`geo`]    | `Point`, Euclidean distance                                |
//! | [`model`]  | `Vehicle`, `Station`, roster validation, charge estimates  |
//! | [`config`] | `EngineConfig`, `ColonyConfig`, `PriorityWeights`          |
//! | [`rng`]    | `ColonyRng`                                                |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod model;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ColonyConfig, EngineConfig, PriorityWeights};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{StationId, VehicleId, WaypointId};
pub use model::{DEFAULT_TICK_MINUTES, Station, Vehicle, total_slots, validate_roster};
pub use rng::ColonyRng;
