//! Urgency scoring and ranking.

use ev_core::{PriorityWeights, Vehicle, VehicleId};

/// One vehicle's place in the round's priority order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ranked {
    /// Position of the vehicle in the slice passed to [`PriorityRanker::rank`].
    pub index: usize,
    pub vehicle: VehicleId,
    pub score: f64,
}

/// Pure urgency scorer.  Higher score means a more urgent need to charge.
#[derive(Clone, Copy, Debug)]
pub struct PriorityRanker<'a> {
    weights: &'a PriorityWeights,
}

impl<'a> PriorityRanker<'a> {
    pub fn new(weights: &'a PriorityWeights) -> Self {
        Self { weights }
    }

    /// Weighted sum of charge deficit, scaled trip distance and urgency,
    /// clamped to `[0, 1]`.
    pub fn score(&self, vehicle: &Vehicle) -> f64 {
        let w = self.weights;
        let raw = w.charge_deficit * (1.0 - vehicle.soc)
            + w.trip_distance * (vehicle.distance / w.distance_scale)
            + w.urgency * vehicle.urgency;
        // NaN only comes from unvalidated input; rank it last.
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
    }

    /// Score every vehicle and sort by descending score.
    ///
    /// The sort is stable, so equal scores keep their input order.
    pub fn rank(&self, vehicles: &[Vehicle]) -> Vec<Ranked> {
        let mut ranked: Vec<Ranked> = vehicles
            .iter()
            .enumerate()
            .map(|(index, v)| Ranked { index, vehicle: v.id, score: self.score(v) })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
