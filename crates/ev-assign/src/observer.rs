//! Round observer trait for progress reporting and inspection.

use ev_colony::Proposal;

use crate::RoundOutcome;

/// Callbacks invoked by
/// [`AssignmentEngine::run_round_observed`][crate::AssignmentEngine::run_round_observed].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: demotion counter
///
/// ```rust,ignore
/// struct Demotions(usize);
///
/// impl RoundObserver for Demotions {
///     fn on_round_end(&mut self, _round: u64, outcome: &RoundOutcome) {
///         self.0 += outcome.assignment.iter()
///             .filter(|(_, d)| *d == Decision::Demoted)
///             .count();
///     }
/// }
/// ```
pub trait RoundObserver {
    /// Called after input validation, before any ranking.
    fn on_round_start(&mut self, _round: u64, _vehicle_count: usize) {}

    /// Called with the colony's winning proposal before conflict resolution.
    fn on_proposal(&mut self, _round: u64, _proposal: &Proposal, _cost: f64) {}

    /// Called once the final assignment is known.
    fn on_round_end(&mut self, _round: u64, _outcome: &RoundOutcome) {}
}

/// A [`RoundObserver`] that does nothing.
pub struct NoopObserver;

impl RoundObserver for NoopObserver {}
