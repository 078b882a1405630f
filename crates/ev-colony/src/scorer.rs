//! Proposal scoring strategies.
//!
//! The selector samples `ant_count` proposals per round and keeps the one
//! with the lowest cost; ties go to the earliest ant.  Scorers are injected
//! into the engine, so the fitness rule can change without touching the
//! sampling loop.

use ev_core::Station;

use crate::{DistanceTable, Proposal};

/// Read-only inputs available to a scorer.
pub struct ScoringContext<'a> {
    pub distances: &'a DistanceTable,
    pub stations:  &'a [Station],
}

/// Cost function over proposals.  Lower is better.
pub trait ProposalScorer: Send + Sync {
    fn cost(&self, proposal: &Proposal, ctx: &ScoringContext<'_>) -> f64;

    /// Short name used in log events.
    fn name(&self) -> &'static str;
}

// ── FirstProposal ─────────────────────────────────────────────────────────────

/// Every proposal costs the same, so the first ant always wins.
///
/// Reproduces the unguided behaviour where reinforcement follows a single
/// random draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstProposal;

impl ProposalScorer for FirstProposal {
    fn cost(&self, _proposal: &Proposal, _ctx: &ScoringContext<'_>) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "first"
    }
}

// ── TotalRoadDistance ─────────────────────────────────────────────────────────

/// Sum of vehicle → station travel distances.
///
/// Legs with no road connection are counted at their straight-line length.
#[derive(Clone, Copy, Debug, Default)]
pub struct TotalRoadDistance;

impl ProposalScorer for TotalRoadDistance {
    fn cost(&self, proposal: &Proposal, ctx: &ScoringContext<'_>) -> f64 {
        proposal
            .iter()
            .map(|(v, s)| ctx.distances.travel(v, s).unwrap_or(f64::INFINITY))
            .sum()
    }

    fn name(&self) -> &'static str {
        "total-road-distance"
    }
}

// ── ContentionPenalized ───────────────────────────────────────────────────────

/// [`TotalRoadDistance`] plus `penalty` for every vehicle proposed to a
/// station beyond its slot count.
///
/// Steers the colony toward proposals that survive conflict resolution
/// without reassignment.
#[derive(Clone, Copy, Debug)]
pub struct ContentionPenalized {
    pub penalty: f64,
}

impl ContentionPenalized {
    pub fn new(penalty: f64) -> Self {
        Self { penalty }
    }
}

impl ProposalScorer for ContentionPenalized {
    fn cost(&self, proposal: &Proposal, ctx: &ScoringContext<'_>) -> f64 {
        let loads = proposal.station_loads();
        let overflow: usize = ctx
            .stations
            .iter()
            .map(|s| loads.get(&s.id).copied().unwrap_or(0).saturating_sub(s.slots as usize))
            .sum();
        TotalRoadDistance.cost(proposal, ctx) + self.penalty * overflow as f64
    }

    fn name(&self) -> &'static str {
        "contention-penalized"
    }
}
