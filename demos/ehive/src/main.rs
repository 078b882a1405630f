//! ehive: lifecycle driver for the e-hive charging assignment engine.
//!
//! Four vehicles compete for two single-slot stations on an 8-waypoint road
//! map.  Every tick:
//!
//! 1. Charging vehicles count down; finished ones are retired from the roster
//!    and their pheromone row is evicted.
//! 2. If any slot is free, a round is run for the vehicles still waiting.
//!    Stations are passed with their *free* slot count only.
//! 3. Vehicles that received a station start charging there.
//!
//! Usage: `ehive [config.json]`.  The optional file holds an `EngineConfig`
//! in JSON; missing fields take their defaults.  Set `RUST_LOG=debug` to see
//! per-round engine events.

mod network;

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ev_assign::{Decision, EngineBuilder, RoundObserver, RoundOutcome};
use ev_colony::Proposal;
use ev_core::{DEFAULT_TICK_MINUTES, EngineConfig, Station, StationId, Vehicle, VehicleId};
use ev_spatial::{DijkstraRouter, Router};

use network::{build_fleet, build_network, build_stations};

// ── Constants ─────────────────────────────────────────────────────────────────

const MAX_TICKS: u32 = 500;

// ── Round printer ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct RoundPrinter {
    rounds:      usize,
    reassigned:  usize,
    demoted:     usize,
}

impl RoundObserver for RoundPrinter {
    fn on_proposal(&mut self, round: u64, proposal: &Proposal, cost: f64) {
        let picks: Vec<String> = proposal.iter().map(|(v, s)| format!("{v}→{s}")).collect();
        info!(round, cost, "colony proposal: {}", picks.join(" "));
    }

    fn on_round_end(&mut self, round: u64, outcome: &RoundOutcome) {
        self.rounds += 1;
        println!("── round {round} ──");
        println!("{:<6} {:>8}  {}", "EV", "priority", "decision");
        for (vehicle, decision) in outcome.assignment.iter() {
            let text = match decision {
                Decision::Confirmed(s) => format!("{s}"),
                Decision::Reassigned { proposed, station } => {
                    self.reassigned += 1;
                    format!("{station} (proposed {proposed})")
                }
                Decision::Demoted => {
                    self.demoted += 1;
                    "demoted".to_string()
                }
                Decision::Waiting => "waiting".to_string(),
            };
            let score = outcome.priority(vehicle).unwrap_or_default();
            println!("{:<6} {:>8.3}  {}", vehicle.to_string(), score, text);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<EngineConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

/// Stations with at least one free slot, each reporting only its free slots.
fn free_stations(stations: &[Station], charging: &HashMap<VehicleId, StationId>) -> Vec<Station> {
    stations
        .iter()
        .filter_map(|s| {
            let busy = charging.values().filter(|&&id| id == s.id).count() as u32;
            let free = s.slots.saturating_sub(busy);
            (free > 0).then(|| Station::with_slots(s.id, s.power, s.position, free))
        })
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let network = build_network();
    let mut stations = build_stations();
    let mut fleet: Vec<Vehicle> = build_fleet();

    println!("=== ehive: EV charging assignment ===");
    println!(
        "Road network: {} waypoints, {} directed edges | vehicles: {} | stations: {}",
        network.waypoint_count(),
        network.edge_count(),
        fleet.len(),
        stations.len()
    );
    println!(
        "Colony: {} ants, decay {}, boost {} | seed {}",
        config.colony.ant_count, config.colony.decay, config.colony.boost, config.seed
    );
    println!();

    let mut engine = EngineBuilder::new(config).network(network).build()?;
    let mut store = engine.initialize_pheromones(&fleet, &stations);
    let mut charging: HashMap<VehicleId, StationId> = HashMap::new();
    let mut printer = RoundPrinter::default();
    let mut finished: Vec<(VehicleId, u32)> = Vec::new();

    for tick in 0..MAX_TICKS {
        if fleet.is_empty() {
            break;
        }

        // ① Charge countdown and retirement.
        for v in fleet.iter_mut().filter(|v| charging.contains_key(&v.id)) {
            v.charging_ticks_left = v.charging_ticks_left.saturating_sub(1);
            if v.charging_ticks_left == 0 {
                v.soc = 1.0;
            }
        }
        let done: Vec<VehicleId> = fleet
            .iter()
            .filter(|v| charging.contains_key(&v.id) && v.charging_ticks_left == 0)
            .map(|v| v.id)
            .collect();
        for id in done {
            if let Some(sid) = charging.remove(&id) {
                if let Some(st) = stations.iter_mut().find(|s| s.id == sid) {
                    st.dequeue();
                }
            }
            engine.retire(&mut store, id);
            fleet.retain(|v| v.id != id);
            finished.push((id, tick));
            info!(vehicle = %id, tick, "charged and left");
        }

        // ② Round for the vehicles still waiting.
        let waiting: Vec<Vehicle> = fleet
            .iter()
            .filter(|v| !charging.contains_key(&v.id))
            .cloned()
            .collect();
        let open = free_stations(&stations, &charging);
        if waiting.is_empty() || open.is_empty() {
            continue;
        }
        let outcome = engine.run_round_observed(&waiting, &open, &mut store, &mut printer)?;

        // ③ Start charging at the assigned stations.
        for (id, sid) in outcome.assignment.assigned() {
            let (Some(v), Some(st)) = (
                fleet.iter_mut().find(|v| v.id == id),
                stations.iter_mut().find(|s| s.id == sid),
            ) else {
                continue;
            };
            let from = engine.network().nearest_waypoint(v.position);
            let to = engine.network().nearest_waypoint(st.position);
            let route = match (from, to) {
                (Some(a), Some(b)) => DijkstraRouter.route(engine.network(), a, b)?,
                _ => None,
            };

            v.charging_ticks_left = st.charge_ticks(v, DEFAULT_TICK_MINUTES);
            v.position = st.position;
            st.enqueue(id);
            charging.insert(id, sid);
            match route {
                Some(r) => println!(
                    "  {id} → {sid}: {:.0} units over {} road segments, {} ticks to charge",
                    r.distance,
                    r.hop_count(),
                    v.charging_ticks_left
                ),
                None => println!(
                    "  {id} → {sid}: no road connection, {} ticks to charge",
                    v.charging_ticks_left
                ),
            }
        }
        println!();
    }

    // ── Summary ───────────────────────────────────────────────────────────
    println!("=== summary ===");
    println!(
        "rounds: {} | reassigned: {} | demoted: {} | pheromone entries left: {}",
        printer.rounds,
        printer.reassigned,
        printer.demoted,
        store.len()
    );
    println!("{:<6} {:>10}", "EV", "done @ tick");
    for (id, tick) in &finished {
        println!("{:<6} {:>10}", id.to_string(), tick);
    }
    for v in &fleet {
        println!("{:<6} {:>10}", v.id.to_string(), "unfinished");
    }

    Ok(())
}
