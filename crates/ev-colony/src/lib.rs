//! `ev-colony`: pheromone store and ant-colony station selection.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`pheromone`] | `PheromoneStore`: decaying (vehicle, station) affinities    |
//! | [`distance`]  | `DistanceTable`: per-round road/straight-line distances     |
//! | [`proposal`]  | `Proposal`: one ant's vehicle → station picks               |
//! | [`scorer`]    | `ProposalScorer` trait and the built-in scorers              |
//! | [`selector`]  | `StationSelector`, `Selection`                               |
//! | [`error`]     | `ColonyError`, `ColonyResult<T>`                             |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Builds the ants of a round on Rayon's thread pool.     |

pub mod distance;
pub mod error;
pub mod pheromone;
pub mod proposal;
pub mod scorer;
pub mod selector;


pub use distance::DistanceTable;
pub use error::{ColonyError, ColonyResult};
pub use pheromone::{INITIAL_AFFINITY, MIN_AFFINITY, PheromoneStore};
pub use proposal::Proposal;
pub use scorer::{ContentionPenalized, FirstProposal, ProposalScorer, ScoringContext, TotalRoadDistance};
pub use selector::{Selection, StationSelector};
