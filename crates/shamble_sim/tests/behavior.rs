//! End-to-end behavior tests over the assembled simulation

use shamble_ai::{AgentConfig, AgentState};
use shamble_core::{RecordingSink, SimEvent};
use shamble_math::{Aabb, Vec3};
use shamble_nav::NavSurface;
use shamble_sim::{Simulation, SpawnArea};

/// A single walkable cell, so agents stay put while roaming
fn pinned_surface() -> NavSurface {
    NavSurface::create_grid(Vec3::ZERO, 5.0, 5.0, 5.0)
}

fn open_surface() -> NavSurface {
    NavSurface::create_grid(Vec3::new(-50.0, 0.0, -50.0), 100.0, 100.0, 5.0)
}

fn state_of(sim: &Simulation, index: usize) -> AgentState {
    *sim.zombies()[index].controller.state()
}

#[test]
fn test_visible_player_gets_spotted() {
    let mut sim = Simulation::new(pinned_surface(), Vec3::new(2.5, 0.0, 5.5), 0.0);
    sim.spawn_zombie(Vec3::new(2.5, 0.0, 2.5), AgentConfig::default(), 1);

    let mut sink = RecordingSink::new();
    sim.tick(0.2, &mut sink);

    assert!(matches!(
        state_of(&sim, 0),
        AgentState::Chasing { direct: true, .. }
    ));
    assert_eq!(
        sink.count_matching(|e| matches!(e, SimEvent::TargetSighted { .. })),
        1
    );
}

#[test]
fn test_wall_blocks_sighting() {
    let mut sim = Simulation::new(pinned_surface(), Vec3::new(2.5, 0.0, 5.5), 0.0);
    sim.add_prop(Aabb::from_center_half_extents(
        Vec3::new(2.5, 1.0, 4.0),
        Vec3::new(3.0, 2.0, 0.2),
    ));
    sim.spawn_zombie(Vec3::new(2.5, 0.0, 2.5), AgentConfig::default(), 1);

    let mut sink = RecordingSink::new();
    for _ in 0..5 {
        sim.tick(0.2, &mut sink);
    }

    assert!(matches!(state_of(&sim, 0), AgentState::Searching));
    assert_eq!(
        sink.count_matching(|e| matches!(e, SimEvent::TargetSighted { .. })),
        0
    );
}

#[test]
fn test_alert_reaches_peers_in_range_only() {
    let mut sim = Simulation::new(open_surface(), Vec3::new(2.5, 0.0, 5.5), 0.0);
    // Spotter, a peer inside the 15 unit broadcast radius, a peer outside
    sim.spawn_zombie(Vec3::new(2.5, 0.0, 2.5), AgentConfig::default(), 1);
    sim.spawn_zombie(Vec3::new(12.5, 0.0, 2.5), AgentConfig::default(), 2);
    sim.spawn_zombie(Vec3::new(42.5, 0.0, 2.5), AgentConfig::default(), 3);

    let mut sink = RecordingSink::new();
    sim.tick(0.2, &mut sink);

    assert!(matches!(
        state_of(&sim, 0),
        AgentState::Chasing { direct: true, .. }
    ));
    assert!(matches!(
        state_of(&sim, 1),
        AgentState::Chasing { direct: false, .. }
    ));
    assert!(matches!(state_of(&sim, 2), AgentState::Searching));

    let broadcast = sink
        .events
        .iter()
        .find(|e| matches!(e, SimEvent::AlertBroadcast { .. }));
    assert!(matches!(
        broadcast,
        Some(SimEvent::AlertBroadcast { notified: 1, .. })
    ));
}

#[test]
fn test_two_direct_pursuers_do_not_ping_pong() {
    let mut sim = Simulation::new(open_surface(), Vec3::new(2.5, 0.0, 5.5), 0.0);
    // Both agents see the player on the first evaluation
    sim.spawn_zombie(Vec3::new(2.5, 0.0, 2.5), AgentConfig::default(), 1);
    sim.spawn_zombie(Vec3::new(4.5, 0.0, 2.5), AgentConfig::default(), 2);

    let mut sink = RecordingSink::new();
    sim.tick(0.2, &mut sink);

    assert!(matches!(
        state_of(&sim, 0),
        AgentState::Chasing { direct: true, .. }
    ));
    assert!(matches!(
        state_of(&sim, 1),
        AgentState::Chasing { direct: true, .. }
    ));
    // One broadcast each for the fresh sighting, and the cross-delivered
    // alerts change nothing
    assert_eq!(
        sink.count_matching(|e| matches!(e, SimEvent::AlertBroadcast { .. })),
        2
    );

    // Stationary target: no further broadcasts on later ticks
    sim.tick(0.2, &mut sink);
    sim.tick(0.2, &mut sink);
    assert_eq!(
        sink.count_matching(|e| matches!(e, SimEvent::AlertBroadcast { .. })),
        2
    );
}

#[test]
fn test_scent_marker_starts_indirect_chase() {
    // Player far away so vision never fires
    let mut sim = Simulation::new(open_surface(), Vec3::new(40.0, 0.0, 40.0), 0.0);
    sim.spawn_zombie(Vec3::new(2.5, 0.0, 2.5), AgentConfig::default(), 1);
    sim.scent_mut().add_marker(Vec3::new(7.5, 0.0, 2.5), 10.0, None);

    let mut sink = RecordingSink::new();
    sim.tick(0.05, &mut sink);

    assert!(matches!(
        state_of(&sim, 0),
        AgentState::Chasing { direct: false, .. }
    ));
    assert_eq!(
        sink.count_matching(|e| matches!(e, SimEvent::ScentContact { .. })),
        1
    );
    // Staying inside the marker does not re-trigger
    sim.tick(0.05, &mut sink);
    assert_eq!(
        sink.count_matching(|e| matches!(e, SimEvent::ScentContact { .. })),
        1
    );
}

#[test]
fn test_moving_player_leaves_scent_trail() {
    let mut sim = Simulation::new(open_surface(), Vec3::new(2.5, 0.0, 2.5), 3.0);
    sim.player_mut()
        .set_route(vec![Vec3::new(42.5, 0.0, 2.5), Vec3::new(2.5, 0.0, 2.5)]);

    let mut sink = RecordingSink::new();
    for _ in 0..40 {
        sim.tick(0.1, &mut sink);
    }

    // 4 seconds of patrol at the default 1.5s drop interval
    assert!(sim.scent().len() >= 2);
}

#[test]
fn test_invalid_config_spawns_inert_agent() {
    let mut sim = Simulation::new(open_surface(), Vec3::new(2.5, 0.0, 5.5), 0.0);
    let mut config = AgentConfig::default();
    config.search.min_wait = 9.0;
    config.search.max_wait = 1.0;
    sim.spawn_zombie(Vec3::new(2.5, 0.0, 2.5), config, 1);

    let mut sink = RecordingSink::new();
    for _ in 0..10 {
        sim.tick(0.2, &mut sink);
    }

    assert!(sim.zombies()[0].controller.is_inert());
    assert!(matches!(state_of(&sim, 0), AgentState::Searching));
    assert!(sink.events.is_empty());
}

#[test]
fn test_horde_spawns_on_walkable_surface() {
    let mut sim = Simulation::new(open_surface(), Vec3::new(40.0, 0.0, 40.0), 0.0);
    let area = SpawnArea::new(Aabb::new(
        Vec3::new(-10.0, 0.0, -10.0),
        Vec3::new(10.0, 0.0, 10.0),
    ));
    let spawned = sim.spawn_horde(&area, 8, &AgentConfig::default(), 7);

    assert_eq!(spawned.len(), 8);
    let expanded = Aabb::new(
        area.bounds.min - Vec3::splat(area.sample_radius),
        area.bounds.max + Vec3::splat(area.sample_radius),
    );
    for zombie in sim.zombies() {
        let p = zombie.nav.position();
        assert!(expanded.contains_point(Vec3::new(p.x, 0.0, p.z)));
    }
}

#[test]
fn test_long_run_is_stable() {
    let mut sim = Simulation::new(open_surface(), Vec3::new(0.0, 0.0, 0.0), 3.0);
    sim.player_mut().set_route(vec![
        Vec3::new(20.0, 0.0, 0.0),
        Vec3::new(20.0, 0.0, 20.0),
        Vec3::new(-20.0, 0.0, 20.0),
        Vec3::new(-20.0, 0.0, -20.0),
    ]);
    sim.add_prop(Aabb::from_center_half_extents(
        Vec3::new(10.0, 1.5, 10.0),
        Vec3::new(4.0, 1.5, 0.5),
    ));
    let area = SpawnArea::new(Aabb::new(
        Vec3::new(-15.0, 0.0, -15.0),
        Vec3::new(15.0, 0.0, 15.0),
    ));
    sim.spawn_horde(&area, 5, &AgentConfig::default(), 99);

    let mut sink = RecordingSink::new();
    for _ in 0..1200 {
        sim.tick(0.05, &mut sink);
    }

    assert!((sim.time() - 60.0).abs() < 0.1);
    // The patrolling player keeps laying scent the whole run
    assert!(!sim.scent().is_empty());
    // Every agent is still on (or near) the walkable surface
    for zombie in sim.zombies() {
        let p = zombie.nav.position();
        assert!(p.x.abs() <= 50.0 && p.z.abs() <= 50.0);
    }
}
