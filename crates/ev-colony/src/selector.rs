//! Pheromone-guided stochastic station selection.
//!
//! # One round
//!
//! ```text
//! for each candidate vehicle v and station s:
//!     heuristic(v, s)    = power(s) / (1 + road_distance(v, s))
//!     desirability(v, s) = clamp(affinity(v, s)^alpha * heuristic(v, s)^beta,
//!                                weight_floor, f64::MAX / station_count)
//!
//! repeat ant_count times:                       ← the ants
//!     for each v: draw one station ~ desirability(v, ·)
//!
//! keep the ant with the lowest scorer cost (ties → earliest ant)
//! decay every affinity, then reinforce the kept ant's pairs
//! ```
//!
//! The weights are fixed for the whole round (pheromones only change after
//! all ants have been built), so each vehicle's categorical distribution is
//! built once and shared by every ant.

use rand::distributions::{Distribution, WeightedIndex};
use tracing::{debug, trace};

use ev_core::{ColonyConfig, ColonyRng, Station, Vehicle};

use crate::{ColonyResult, DistanceTable, PheromoneStore, Proposal, ProposalScorer, ScoringContext};

/// The proposal kept for a round, with the ant that produced it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub proposal: Proposal,
    /// Scorer cost of `proposal`.
    pub cost: f64,
    /// Index of the winning ant.
    pub ant: usize,
}

/// Ant-colony station selector.  Stateless apart from its configuration;
/// all learned state lives in the [`PheromoneStore`].
pub struct StationSelector<'a> {
    config: &'a ColonyConfig,
}

impl<'a> StationSelector<'a> {
    pub fn new(config: &'a ColonyConfig) -> Self {
        Self { config }
    }

    /// Sampling weight of one (vehicle, station) pair.
    ///
    /// An unreachable station (`road_distance = ∞`) has zero heuristic and
    /// therefore falls to the weight floor.  Overflowing weights are capped at
    /// `f64::MAX`.
    pub fn desirability(&self, affinity: f64, power: f64, road_distance: f64) -> f64 {
        let heuristic = power / (1.0 + road_distance);
        let weight = affinity.powf(self.config.alpha) * heuristic.powf(self.config.beta);
        // `f64::max` discards NaN, so degenerate inputs also land on the floor.
        weight.max(self.config.weight_floor).min(f64::MAX)
    }

    /// Run one round: sample the ants, keep the cheapest proposal, and update
    /// `store`.
    ///
    /// `table` must cover every candidate and station.  Every candidate must
    /// be registered in `store` for every station.
    ///
    /// # Errors
    ///
    /// [`ColonyError::Uninitialized`][crate::ColonyError::Uninitialized] for
    /// an unregistered pair; the store is left untouched in that case.
    pub fn select<S: ProposalScorer + ?Sized>(
        &self,
        candidates: &[&Vehicle],
        stations:   &[Station],
        table:      &DistanceTable,
        store:      &mut PheromoneStore,
        scorer:     &S,
        rng:        &mut ColonyRng,
    ) -> ColonyResult<Selection> {
        let samplers = self.samplers(candidates, stations, table, store)?;

        // Child RNGs are drawn in ant order before any ant runs.
        let ant_rngs: Vec<ColonyRng> = (0..self.config.ant_count)
            .map(|i| rng.child(i as u64))
            .collect();
        let ants = construct_ants(&samplers, ant_rngs);

        let ctx = ScoringContext { distances: table, stations };
        let mut best: Option<Selection> = None;
        for (ant, columns) in ants.into_iter().enumerate() {
            let proposal = Proposal::new(
                candidates
                    .iter()
                    .zip(columns)
                    .map(|(v, col)| (v.id, stations[col].id))
                    .collect(),
            );
            let cost = scorer.cost(&proposal, &ctx);
            let cost = if cost.is_nan() { f64::INFINITY } else { cost };
            trace!(ant, cost, "ant scored");

            if best.as_ref().is_none_or(|b| cost < b.cost) {
                best = Some(Selection { proposal, cost, ant });
            }
        }
        let selection = best.unwrap_or_default();

        store.decay(self.config.decay)?;
        for (vehicle, station) in selection.proposal.iter() {
            store.reinforce(vehicle, station, self.config.boost)?;
        }

        debug!(
            scorer = scorer.name(),
            ants = self.config.ant_count,
            winner = selection.ant,
            cost = selection.cost,
            candidates = candidates.len(),
            "station selection complete"
        );
        Ok(selection)
    }

    /// One categorical distribution over `stations` per candidate.
    fn samplers(
        &self,
        candidates: &[&Vehicle],
        stations:   &[Station],
        table:      &DistanceTable,
        store:      &PheromoneStore,
    ) -> ColonyResult<Vec<WeightedIndex<f64>>> {
        if stations.is_empty() {
            return Ok(Vec::new());
        }
        // Keeps each row's total finite for `WeightedIndex`.
        let ceiling = f64::MAX / stations.len() as f64;

        candidates
            .iter()
            .map(|v| -> ColonyResult<WeightedIndex<f64>> {
                let weights = stations
                    .iter()
                    .map(|s| -> ColonyResult<f64> {
                        let affinity = store.affinity(v.id, s.id)?;
                        let road = table.road(v.id, s.id).unwrap_or(f64::INFINITY);
                        Ok(self.desirability(affinity, s.power, road).min(ceiling))
                    })
                    .collect::<ColonyResult<Vec<f64>>>()?;
                Ok(WeightedIndex::new(weights)?)
            })
            .collect()
    }
}

/// Build every ant.  Each ant owns its RNG, so the parallel and sequential
/// paths draw identical samples.
fn construct_ants(samplers: &[WeightedIndex<f64>], rngs: Vec<ColonyRng>) -> Vec<Vec<usize>> {
    let build = |mut rng: ColonyRng| -> Vec<usize> {
        samplers.iter().map(|w| w.sample(rng.inner())).collect()
    };

    #[cfg(not(feature = "parallel"))]
    {
        rngs.into_iter().map(build).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        rngs.into_par_iter().map(build).collect()
    }
}
