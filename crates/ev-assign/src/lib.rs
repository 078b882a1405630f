//! `ev-assign`: priority ranking and per-round slot assignment.
//!
//! # Round pipeline
//!
//! ```text
//! run_round(vehicles, stations, store):
//!   ① Validate  : ranges and duplicate ids (CoreError on failure)
//!   ② Rank      : priority score per vehicle, stable descending sort
//!   ③ Cut       : top Σ slots vehicles are candidates, the rest wait
//!   ④ Select    : ant-colony proposal for the candidates; store decays
//!                  and the kept proposal is reinforced
//!   ⑤ Resolve   : slot-tokens handed out in priority order:
//!                    proposed station free      → Confirmed
//!                    else nearest free station  → Reassigned
//!                    else                       → Demoted
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Builds the colony's ants on Rayon's thread pool.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ev_assign::EngineBuilder;
//! use ev_core::EngineConfig;
//!
//! let mut engine = EngineBuilder::new(EngineConfig::default())
//!     .network(network)
//!     .build()?;
//! let mut store = engine.initialize_pheromones(&vehicles, &stations);
//! let outcome = engine.run_round(&vehicles, &stations, &mut store)?;
//! for (vehicle, station) in outcome.assignment.assigned() {
//!     println!("{vehicle} → {station}");
//! }
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;
pub mod outcome;
pub mod priority;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use engine::AssignmentEngine;
pub use error::{AssignError, AssignResult};
pub use observer::{NoopObserver, RoundObserver};
pub use outcome::{Decision, RoundAssignment, RoundOutcome};
pub use priority::{PriorityRanker, Ranked};
