//! Unit tests for ev-assign.

use ev_colony::{Proposal, ProposalScorer, ScoringContext};
use ev_core::{EngineConfig, Point, Station, StationId, Vehicle, VehicleId};
use ev_spatial::{RoadNetwork, RoadNetworkBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Two horizontal roads joined by a bridge at x = 5.
fn ladder() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    b.add_road(p(0.0, 0.0), p(5.0, 0.0));
    b.add_road(p(5.0, 0.0), p(10.0, 0.0));
    b.add_road(p(0.0, 5.0), p(5.0, 5.0));
    b.add_road(p(5.0, 5.0), p(10.0, 5.0));
    b.add_road(p(5.0, 0.0), p(5.0, 5.0));
    b.build()
}

/// `(soc, distance, capacity, urgency, position)` of the four demo vehicles.
fn fleet() -> Vec<Vehicle> {
    vec![
        Vehicle::new(VehicleId(1), 0.20, 120.0, 60.0, 1.0, p(0.0, 0.0)),
        Vehicle::new(VehicleId(2), 0.80, 40.0, 50.0, 0.0, p(2.0, 0.0)),
        Vehicle::new(VehicleId(3), 0.10, 150.0, 70.0, 1.0, p(0.0, 5.0)),
        Vehicle::new(VehicleId(4), 0.50, 80.0, 45.0, 0.0, p(3.0, 5.0)),
    ]
}

fn two_stations() -> Vec<Station> {
    vec![
        Station::new(StationId(1), 50.0, p(10.0, 0.0)),
        Station::new(StationId(2), 30.0, p(10.0, 5.0)),
    ]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

/// Prefers proposals that send everyone to one station.
struct Everyone(StationId);

impl ProposalScorer for Everyone {
    fn cost(&self, proposal: &Proposal, _ctx: &ScoringContext<'_>) -> f64 {
        proposal.iter().filter(|&(_, s)| s != self.0).count() as f64
    }

    fn name(&self) -> &'static str {
        "everyone"
    }
}

// ── Priority ranking ──────────────────────────────────────────────────────────

#[cfg(test)]
mod priority {
    use super::*;
    use ev_core::PriorityWeights;
    use crate::PriorityRanker;

    #[test]
    fn demo_fleet_scores() {
        let weights = PriorityWeights::default();
        let ranker = PriorityRanker::new(&weights);
        let scores: Vec<f64> = fleet().iter().map(|v| ranker.score(v)).collect();
        assert!(close(scores[0], 0.78));
        assert!(close(scores[1], 0.16));
        assert!(close(scores[2], 0.875));
        assert!(close(scores[3], 0.37));
    }

    #[test]
    fn rank_is_descending() {
        let weights = PriorityWeights::default();
        let ranked = PriorityRanker::new(&weights).rank(&fleet());
        let order: Vec<u32> = ranked.iter().map(|r| r.vehicle.0).collect();
        assert_eq!(order, vec![3, 1, 4, 2]);
        assert_eq!(ranked[0].index, 2);
    }

    #[test]
    fn ties_keep_input_order() {
        let weights = PriorityWeights::default();
        let twins: Vec<Vehicle> = (0..5)
            .map(|i| Vehicle::new(VehicleId(10 - i), 0.5, 50.0, 40.0, 0.5, p(0.0, 0.0)))
            .collect();
        let ranked = PriorityRanker::new(&weights).rank(&twins);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn score_is_clamped() {
        let weights = PriorityWeights::default();
        let ranker = PriorityRanker::new(&weights);
        let far = Vehicle::new(VehicleId(1), 0.0, 10_000.0, 60.0, 1.0, p(0.0, 0.0));
        assert_eq!(ranker.score(&far), 1.0);
        let full = Vehicle::new(VehicleId(2), 1.0, 0.0, 60.0, 0.0, p(0.0, 0.0));
        assert_eq!(ranker.score(&full), 0.0);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use crate::{AssignError, EngineBuilder};

    #[test]
    fn defaults_build() {
        let engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        assert!(engine.network().is_empty());
        assert_eq!(engine.scorer().name(), "total-road-distance");
        assert_eq!(engine.rounds_run(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.colony.decay = 1.5;
        assert!(matches!(EngineBuilder::new(config).build(), Err(AssignError::Core(_))));
    }

    #[test]
    fn shared_network_is_not_copied() {
        let net = std::sync::Arc::new(ladder());
        let a = EngineBuilder::new(EngineConfig::default()).shared_network(net.clone()).build().unwrap();
        let b = EngineBuilder::new(EngineConfig::default()).shared_network(net.clone()).build().unwrap();
        assert!(std::sync::Arc::ptr_eq(a.network(), b.network()));
    }
}

// ── Rounds ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rounds {
    use super::*;
    use ev_colony::FirstProposal;
    use ev_core::CoreError;
    use crate::{AssignError, Decision, EngineBuilder};

    #[test]
    fn four_vehicles_two_stations() {
        let (vehicles, stations) = (fleet(), two_stations());
        let mut engine = EngineBuilder::new(EngineConfig::default()).network(ladder()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);

        let out = engine.run_round(&vehicles, &stations, &mut store).unwrap();

        assert_eq!(out.assignment.len(), 4);
        assert_eq!(out.assignment.assigned_count(), 2);
        assert_eq!(out.assignment.decision(VehicleId(2)), Some(Decision::Waiting));
        assert_eq!(out.assignment.decision(VehicleId(4)), Some(Decision::Waiting));
        // Road distance picks the short leg for both charging vehicles.
        assert_eq!(out.assignment.decision(VehicleId(1)), Some(Decision::Confirmed(StationId(1))));
        assert_eq!(out.assignment.decision(VehicleId(3)), Some(Decision::Confirmed(StationId(2))));
        assert_eq!(out.selection.cost, 20.0);
        assert_eq!(out.off_road, 0);
        assert!(close(out.priority(VehicleId(3)).unwrap(), 0.875));
        assert_eq!(out.round, 0);
        assert_eq!(engine.rounds_run(), 1);
    }

    #[test]
    fn contested_station_goes_to_higher_priority() {
        let (vehicles, stations) = (fleet(), two_stations());
        let mut engine = EngineBuilder::new(EngineConfig::default())
            .network(ladder())
            .scorer(Everyone(StationId(1)))
            .build()
            .unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);

        let out = engine.run_round(&vehicles, &stations, &mut store).unwrap();

        assert_eq!(out.selection.cost, 0.0, "an ant sending both to S1 exists");
        assert_eq!(out.assignment.decision(VehicleId(3)), Some(Decision::Confirmed(StationId(1))));
        assert_eq!(
            out.assignment.decision(VehicleId(1)),
            Some(Decision::Reassigned { proposed: StationId(1), station: StationId(2) })
        );
    }

    #[test]
    fn multi_slot_station_offers_several_tokens() {
        let vehicles = fleet();
        let stations = vec![
            Station::with_slots(StationId(1), 50.0, p(10.0, 0.0), 2),
            Station::new(StationId(2), 30.0, p(10.0, 5.0)),
        ];
        let mut config = EngineConfig::default();
        config.colony.ant_count = 200;
        let mut engine = EngineBuilder::new(config)
            .network(ladder())
            .scorer(Everyone(StationId(1)))
            .build()
            .unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);

        let out = engine.run_round(&vehicles, &stations, &mut store).unwrap();

        assert_eq!(out.assignment.assigned_count(), 3);
        assert_eq!(out.assignment.decision(VehicleId(2)), Some(Decision::Waiting));
        let loads = out.assignment.station_loads();
        assert_eq!(loads[&StationId(1)], 2);
        assert_eq!(loads[&StationId(2)], 1);
        // EV3 and EV1 outrank EV4, so EV4 is the one moved to S2.
        assert_eq!(out.assignment.station(VehicleId(3)), Some(StationId(1)));
        assert_eq!(out.assignment.station(VehicleId(1)), Some(StationId(1)));
        assert_eq!(out.assignment.station(VehicleId(4)), Some(StationId(2)));
    }

    #[test]
    fn no_network_falls_back_to_straight_line() {
        let (vehicles, stations) = (fleet(), two_stations());
        let mut config = EngineConfig::default();
        config.colony.ant_count = 200;
        let mut engine = EngineBuilder::new(config)
            .scorer(Everyone(StationId(2)))
            .build()
            .unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);

        let out = engine.run_round(&vehicles, &stations, &mut store).unwrap();

        assert_eq!(out.assignment.assigned_count(), 2);
        assert_eq!(out.assignment.station(VehicleId(3)), Some(StationId(2)));
        assert_eq!(out.assignment.station(VehicleId(1)), Some(StationId(1)));
        assert_eq!(out.off_road, 1);
    }

    #[test]
    fn equal_road_distance_keeps_station_order() {
        // S1 and S2 both snap to (10, 0); S2 is nearer in a straight line.
        let mut b = RoadNetworkBuilder::new();
        b.add_road(p(0.0, 0.0), p(10.0, 0.0));
        let stations = vec![
            Station::new(StationId(3), 50.0, p(0.0, 0.0)),
            Station::new(StationId(1), 50.0, p(10.0, 3.0)),
            Station::new(StationId(2), 50.0, p(10.0, 1.0)),
        ];
        let vehicles = vec![
            Vehicle::new(VehicleId(1), 0.1, 100.0, 60.0, 1.0, p(0.0, 0.0)),
            Vehicle::new(VehicleId(2), 0.5, 100.0, 60.0, 0.0, p(0.0, 0.0)),
        ];
        let mut config = EngineConfig::default();
        config.colony.ant_count = 200;
        let mut engine = EngineBuilder::new(config)
            .network(b.build())
            .scorer(Everyone(StationId(3)))
            .build()
            .unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);

        let out = engine.run_round(&vehicles, &stations, &mut store).unwrap();

        assert_eq!(out.assignment.decision(VehicleId(1)), Some(Decision::Confirmed(StationId(3))));
        assert_eq!(
            out.assignment.decision(VehicleId(2)),
            Some(Decision::Reassigned { proposed: StationId(3), station: StationId(1) })
        );
        assert_eq!(out.off_road, 0);
    }

    #[test]
    fn no_stations_means_everyone_waits() {
        let vehicles = fleet();
        let mut engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &[]);

        let out = engine.run_round(&vehicles, &[], &mut store).unwrap();

        assert_eq!(out.assignment.assigned_count(), 0);
        assert_eq!(out.assignment.unassigned().count(), 4);
        assert!(out.selection.proposal.is_empty());
    }

    #[test]
    fn empty_roster_is_a_valid_round() {
        let mut engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        let mut store = engine.initialize_pheromones(&[], &two_stations());
        let out = engine.run_round(&[], &two_stations(), &mut store).unwrap();
        assert!(out.assignment.is_empty());
    }

    #[test]
    fn same_seed_same_rounds() {
        let (vehicles, stations) = (fleet(), two_stations());
        let run = || {
            let mut engine = EngineBuilder::new(EngineConfig::default())
                .network(ladder())
                .scorer(FirstProposal)
                .build()
                .unwrap();
            let mut store = engine.initialize_pheromones(&vehicles, &stations);
            let outcomes: Vec<_> = (0..5)
                .map(|_| engine.run_round(&vehicles, &stations, &mut store).unwrap())
                .collect();
            (outcomes, store)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn invalid_vehicle_is_reported_before_any_work() {
        let mut vehicles = fleet();
        vehicles[1].soc = 1.5;
        let stations = two_stations();
        let mut engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);
        let before = store.clone();

        let result = engine.run_round(&vehicles, &stations, &mut store);

        assert!(matches!(
            result,
            Err(AssignError::Core(CoreError::InvalidVehicle { id: VehicleId(2), .. }))
        ));
        assert_eq!(store, before);
        assert_eq!(engine.rounds_run(), 0);
    }

    #[test]
    fn duplicate_station_is_rejected() {
        let vehicles = fleet();
        let mut stations = two_stations();
        stations[1].id = StationId(1);
        let mut engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);
        assert!(matches!(
            engine.run_round(&vehicles, &stations, &mut store),
            Err(AssignError::Core(CoreError::DuplicateStation(StationId(1))))
        ));
    }

    #[test]
    fn unregistered_candidate_is_a_contract_error() {
        let (vehicles, stations) = (fleet(), two_stations());
        let mut engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        // EV3 is the top-priority candidate but has no pheromone row.
        let known: Vec<Vehicle> = vehicles.iter().filter(|v| v.id != VehicleId(3)).cloned().collect();
        let mut store = engine.initialize_pheromones(&known, &stations);
        let before = store.clone();

        let result = engine.run_round(&vehicles, &stations, &mut store);

        assert!(matches!(result, Err(AssignError::Colony(_))));
        assert_eq!(store, before);
    }
}

// ── Pheromone lifecycle ───────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;
    use crate::EngineBuilder;

    #[test]
    fn round_decays_and_reinforces_winners() {
        let (vehicles, stations) = (fleet(), two_stations());
        let mut engine = EngineBuilder::new(EngineConfig::default()).network(ladder()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);

        let out = engine.run_round(&vehicles, &stations, &mut store).unwrap();

        let keep = 1.0 - engine.config().colony.decay;
        let boost = engine.config().colony.boost;
        for v in &vehicles {
            let proposed = out.selection.proposal.get(v.id);
            for s in &stations {
                let expected = if proposed == Some(s.id) { keep + boost } else { keep };
                assert_eq!(store.affinity(v.id, s.id).unwrap(), expected);
            }
        }
    }

    #[test]
    fn register_adds_newcomer_only() {
        let (vehicles, stations) = (fleet(), two_stations());
        let mut engine = EngineBuilder::new(EngineConfig::default()).network(ladder()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);
        engine.run_round(&vehicles, &stations, &mut store).unwrap();
        let learned = store.affinity(VehicleId(1), StationId(1)).unwrap();

        let newcomer = Vehicle::new(VehicleId(9), 0.05, 10.0, 50.0, 1.0, p(10.0, 0.0));
        assert!(engine.register(&mut store, &newcomer, &stations));
        assert!(!engine.register(&mut store, &vehicles[0], &stations));

        assert_eq!(store.affinity(VehicleId(1), StationId(1)).unwrap(), learned);
        assert_eq!(store.affinity(VehicleId(9), StationId(2)).unwrap(), 1.0);
    }

    #[test]
    fn retire_evicts_the_row() {
        let (vehicles, stations) = (fleet(), two_stations());
        let engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);

        assert!(engine.retire(&mut store, VehicleId(2)));
        assert!(!engine.retire(&mut store, VehicleId(2)));
        assert!(!store.has_vehicle(VehicleId(2)));
        assert_eq!(store.len(), 6);
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;
    use crate::{EngineBuilder, RoundObserver, RoundOutcome};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RoundObserver for Recorder {
        fn on_round_start(&mut self, round: u64, vehicle_count: usize) {
            self.events.push(format!("start {round} {vehicle_count}"));
        }

        fn on_proposal(&mut self, round: u64, proposal: &Proposal, _cost: f64) {
            self.events.push(format!("proposal {round} {}", proposal.len()));
        }

        fn on_round_end(&mut self, round: u64, outcome: &RoundOutcome) {
            self.events.push(format!("end {round} {}", outcome.assignment.assigned_count()));
        }
    }

    #[test]
    fn hooks_fire_in_order() {
        let (vehicles, stations) = (fleet(), two_stations());
        let mut engine = EngineBuilder::new(EngineConfig::default()).network(ladder()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);
        let mut rec = Recorder::default();

        engine.run_round_observed(&vehicles, &stations, &mut store, &mut rec).unwrap();
        engine.run_round_observed(&vehicles, &stations, &mut store, &mut rec).unwrap();

        assert_eq!(
            rec.events,
            vec!["start 0 4", "proposal 0 2", "end 0 2", "start 1 4", "proposal 1 2", "end 1 2"]
        );
    }

    #[test]
    fn failed_round_does_not_end() {
        let mut vehicles = fleet();
        vehicles[0].urgency = -1.0;
        let stations = two_stations();
        let mut engine = EngineBuilder::new(EngineConfig::default()).build().unwrap();
        let mut store = engine.initialize_pheromones(&vehicles, &stations);
        let mut rec = Recorder::default();

        assert!(engine.run_round_observed(&vehicles, &stations, &mut store, &mut rec).is_err());
        assert!(rec.events.is_empty());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use ev_core::{PriorityWeights, total_slots};
    use crate::{EngineBuilder, PriorityRanker};

    fn vehicle_strategy() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
        (0.0f64..=1.0, 0.0f64..400.0, 0.0f64..=1.0, 0.0f64..10.0, 0.0f64..10.0)
    }

    fn roster(specs: &[(f64, f64, f64, f64, f64)]) -> Vec<Vehicle> {
        specs
            .iter()
            .enumerate()
            .map(|(i, &(soc, dist, urg, x, y))| {
                Vehicle::new(VehicleId(i as u32), soc, dist, 60.0, urg, p(x, y))
            })
            .collect()
    }

    proptest! {
        #[test]
        fn priority_is_monotone(
            soc in 0.0f64..=1.0,
            dist in 0.0f64..400.0,
            urg in 0.0f64..=1.0,
            delta in 0.0f64..0.5,
        ) {
            let weights = PriorityWeights::default();
            let r = PriorityRanker::new(&weights);
            let base = Vehicle::new(VehicleId(0), soc, dist, 60.0, urg, p(0.0, 0.0));
            let s0 = r.score(&base);

            let lower_soc = Vehicle { soc: (soc - delta).max(0.0), ..base.clone() };
            let longer    = Vehicle { distance: dist + delta * 100.0, ..base.clone() };
            let urgent    = Vehicle { urgency: (urg + delta).min(1.0), ..base.clone() };
            prop_assert!(r.score(&lower_soc) >= s0);
            prop_assert!(r.score(&longer) >= s0);
            prop_assert!(r.score(&urgent) >= s0);
            prop_assert!((0.0..=1.0).contains(&s0));
        }

        #[test]
        fn slots_are_never_oversubscribed(
            specs in prop::collection::vec(vehicle_strategy(), 0..10),
            slots in prop::collection::vec(1u32..4, 1..4),
            use_roads in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let vehicles = roster(&specs);
            let stations: Vec<Station> = slots
                .iter()
                .enumerate()
                .map(|(j, &n)| Station::with_slots(StationId(j as u32), 20.0 + 10.0 * j as f64, p(10.0, 2.5 * j as f64), n))
                .collect();

            let mut config = EngineConfig { seed, ..EngineConfig::default() };
            config.colony.ant_count = 8;
            let mut builder = EngineBuilder::new(config);
            if use_roads {
                builder = builder.network(ladder());
            }
            let mut engine = builder.build().unwrap();
            let mut store = engine.initialize_pheromones(&vehicles, &stations);

            let out = engine.run_round(&vehicles, &stations, &mut store).unwrap();

            let loads = out.assignment.station_loads();
            for s in &stations {
                prop_assert!(loads.get(&s.id).copied().unwrap_or(0) <= s.slots as usize);
            }

            let expected = total_slots(&stations).min(vehicles.len());
            prop_assert_eq!(out.assignment.assigned_count(), expected);

            let top: HashSet<VehicleId> = out.priorities[..expected].iter().map(|r| r.vehicle).collect();
            let assigned: HashSet<VehicleId> = out.assignment.assigned().map(|(v, _)| v).collect();
            prop_assert_eq!(top, assigned);
        }
    }
}
