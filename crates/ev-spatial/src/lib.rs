//! `ev-spatial`: road network, nearest-waypoint snapping, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`          |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                   |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Unreachable vs. unknown
//!
//! A query between two waypoints with no connecting roads is a normal
//! outcome: `Ok(None)` from [`Router::route`], `f64::INFINITY` from the
//! distance helpers, an empty path from [`RoadNetwork::shortest_path`].  A
//! query naming a waypoint that was never added is a caller bug and returns
//! [`SpatialError`].
//!
//! The network is read-only after [`RoadNetworkBuilder::build`] and is
//! `Send + Sync`, so several engines may share one behind an `Arc`.

pub mod error;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router};
