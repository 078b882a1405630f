//! Engine configuration.
//!
//! Every tuning constant of the assignment engine lives here and is handed to
//! the engine at construction, so two engines in one process can run with
//! different settings.  Typically built with `Default` and tweaked, or loaded
//! from JSON by the driver (feature `serde`).

use crate::{CoreError, CoreResult};

// ── ColonyConfig ──────────────────────────────────────────────────────────────

/// Tuning of the pheromone-guided station selector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColonyConfig {
    /// Candidate assignments sampled per round.
    pub ant_count: usize,
    /// Exponent applied to the pheromone affinity.
    pub alpha: f64,
    /// Exponent applied to the power/distance heuristic.
    pub beta: f64,
    /// Evaporation fraction applied to every affinity once per round, in `[0, 1)`.
    pub decay: f64,
    /// Amount added to each pair of the selected proposal.
    pub boost: f64,
    /// Lower bound on any sampling weight.  Must be positive.
    pub weight_floor: f64,
    /// Affinity given to a freshly registered (vehicle, station) pair.
    pub initial_affinity: f64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            ant_count:        40,
            alpha:            1.0,
            beta:             2.0,
            decay:            0.08,
            boost:            1.0,
            weight_floor:     1e-6,
            initial_affinity: 1.0,
        }
    }
}

impl ColonyConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.ant_count == 0 {
            return config_err("ant_count must be at least 1");
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return config_err("alpha and beta must be finite");
        }
        if self.alpha < 0.0 || self.beta < 0.0 {
            return config_err("alpha and beta must be non-negative");
        }
        if !(0.0..1.0).contains(&self.decay) {
            return config_err("decay must lie in [0, 1)");
        }
        if !self.boost.is_finite() || self.boost < 0.0 {
            return config_err("boost must be finite and non-negative");
        }
        if !self.weight_floor.is_finite() || self.weight_floor <= 0.0 {
            return config_err("weight_floor must be finite and positive");
        }
        if !self.initial_affinity.is_finite() || self.initial_affinity <= 0.0 {
            return config_err("initial_affinity must be finite and positive");
        }
        Ok(())
    }
}

// ── PriorityWeights ───────────────────────────────────────────────────────────

/// Coefficients of the urgency score:
///
/// ```text
/// priority = charge_deficit * (1 - soc)
///          + trip_distance  * (distance / distance_scale)
///          + urgency        * urgency
/// ```
///
/// clamped to `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PriorityWeights {
    pub charge_deficit: f64,
    pub trip_distance:  f64,
    pub urgency:        f64,
    /// Trip distance that counts as a full unit of the distance term.
    pub distance_scale: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            charge_deficit: 0.5,
            trip_distance:  0.3,
            urgency:        0.2,
            distance_scale: 200.0,
        }
    }
}

impl PriorityWeights {
    pub fn validate(&self) -> CoreResult<()> {
        let weights = [self.charge_deficit, self.trip_distance, self.urgency];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return config_err("priority weights must be finite and non-negative");
        }
        if !self.distance_scale.is_finite() || self.distance_scale <= 0.0 {
            return config_err("distance_scale must be finite and positive");
        }
        Ok(())
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level configuration of one assignment engine instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub colony:   ColonyConfig,
    pub priority: PriorityWeights,
    /// Master RNG seed.  The same seed and inputs always produce the same rounds.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            colony:   ColonyConfig::default(),
            priority: PriorityWeights::default(),
            seed:     42,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> CoreResult<()> {
        self.colony.validate()?;
        self.priority.validate()
    }
}

fn config_err(msg: &str) -> CoreResult<()> {
    Err(CoreError::Config(msg.to_string()))
}
