//! Headless horde demo
//!
//! Builds a small walled level, spawns a patrol route for the player
//! and a handful of agents, then runs the simulation for a fixed span
//! and reports what the horde got up to.
//!
//! Run with: cargo run -p shamble_sim

use shamble_ai::AgentConfig;
use shamble_math::{Aabb, Vec3};
use shamble_nav::NavSurface;
use shamble_sim::{Simulation, SpawnArea};
use shamble_core::{RecordingSink, SimEvent};

const TICK: f32 = 0.05;
const RUN_SECONDS: f32 = 60.0;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let mut surface = NavSurface::create_grid(Vec3::new(-30.0, 0.0, -30.0), 60.0, 60.0, 2.0);

    // A wall through the middle with a gap on one side
    for row in 5..28 {
        surface.set_walkable(15, row, false);
    }

    let mut sim = Simulation::new(surface, Vec3::new(-10.0, 0.0, 0.0), 3.0);
    sim.add_prop(Aabb::new(
        Vec3::new(-1.0, 0.0, -20.0),
        Vec3::new(1.0, 3.0, 26.0),
    ));
    sim.player_mut().set_route(vec![
        Vec3::new(-10.0, 0.0, 0.0),
        Vec3::new(-10.0, 0.0, -25.0),
        Vec3::new(10.0, 0.0, -25.0),
        Vec3::new(10.0, 0.0, 0.0),
    ]);

    let area = SpawnArea::new(Aabb::new(
        Vec3::new(5.0, 0.0, 5.0),
        Vec3::new(25.0, 0.0, 25.0),
    ));
    let spawned = sim.spawn_horde(&area, 6, &AgentConfig::default(), 42);
    log::info!("spawned {} agents", spawned.len());

    let mut sink = RecordingSink::new();
    let ticks = (RUN_SECONDS / TICK) as usize;
    for _ in 0..ticks {
        sim.tick(TICK, &mut sink);
    }

    let sightings = sink.count_matching(|e| matches!(e, SimEvent::TargetSighted { .. }));
    let alerts = sink.count_matching(|e| matches!(e, SimEvent::AlertBroadcast { .. }));
    let scents = sink.count_matching(|e| matches!(e, SimEvent::ScentContact { .. }));
    let recoveries = sink.count_matching(|e| matches!(e, SimEvent::StuckRecovery { .. }));

    log::info!(
        "ran {:.0}s: {} sightings, {} alert broadcasts, {} scent contacts, {} stall recoveries, {} scent markers live",
        sim.time(),
        sightings,
        alerts,
        scents,
        recoveries,
        sim.scent().len(),
    );
}
