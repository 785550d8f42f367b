//! The per-tick simulation loop
//!
//! Tick order: target movement, scent trail and field, spatial rebuild,
//! per-agent sensing and behavior, alert fan-out, navigation. Alerts are
//! collected during the behavior pass and dispatched afterwards so every
//! agent decides on the same world snapshot.

use shamble_ai::{
    AgentConfig, AgentController, Alert, CommsHub, TargetObservation,
};
use shamble_core::{Category, EntityId, EventSink, IdGenerator, SimEvent};
use shamble_math::{Aabb, Vec3};
use shamble_nav::{NavAgent, NavSurface};
use shamble_world::{OcclusionMap, ScentField, SpatialIndex, Surroundings};

use crate::player::{Player, ScentTrail};
use crate::spawner::SpawnArea;

/// A horde agent: identity, behavior and locomotion
#[derive(Debug)]
pub struct Zombie {
    pub id: EntityId,
    pub controller: AgentController,
    pub nav: NavAgent,
}

/// The assembled world and its update loop
pub struct Simulation {
    surface: NavSurface,
    occlusion: OcclusionMap,
    scent: ScentField,
    spatial: SpatialIndex,
    hub: CommsHub,
    ids: IdGenerator,
    player: Player,
    trail: ScentTrail,
    zombies: Vec<Zombie>,
    time: f32,
}

impl Simulation {
    pub fn new(surface: NavSurface, player_start: Vec3, player_speed: f32) -> Self {
        let ids = IdGenerator::new();
        let player = Player::new(ids.next(), player_start, player_speed);
        Self {
            surface,
            occlusion: OcclusionMap::new(),
            scent: ScentField::new(),
            spatial: SpatialIndex::new(),
            hub: CommsHub::new(Category::Zombie),
            ids,
            player,
            trail: ScentTrail::new(),
            zombies: Vec::new(),
            time: 0.0,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn surface(&self) -> &NavSurface {
        &self.surface
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn trail_mut(&mut self) -> &mut ScentTrail {
        &mut self.trail
    }

    pub fn scent(&self) -> &ScentField {
        &self.scent
    }

    pub fn scent_mut(&mut self) -> &mut ScentField {
        &mut self.scent
    }

    pub fn zombies(&self) -> &[Zombie] {
        &self.zombies
    }

    /// Register a static vision-blocking prop
    pub fn add_prop(&mut self, bounds: Aabb) -> EntityId {
        let id = self.ids.next();
        self.occlusion.add(id, bounds);
        id
    }

    /// Spawn a single agent at a position
    ///
    /// An invalid configuration is logged and produces an inert agent
    /// rather than failing the whole world.
    pub fn spawn_zombie(&mut self, position: Vec3, config: AgentConfig, seed: u64) -> EntityId {
        let id = self.ids.next();
        let mut nav = NavAgent::new(position, config.movement.speed);
        nav.stopping_distance = config.movement.stopping_distance;

        let controller =
            match AgentController::new(id, config, Category::Player, position, seed) {
                Ok(mut controller) => {
                    controller.start(&mut nav, &self.surface);
                    controller
                }
                Err(err) => {
                    log::error!("agent {} spawned inert: {}", id, err);
                    AgentController::inert(id)
                }
            };

        self.zombies.push(Zombie {
            id,
            controller,
            nav,
        });
        id
    }

    /// Spawn up to `count` agents inside an area
    ///
    /// Candidates that miss the walkable surface are skipped. A broken
    /// configuration is reported once for the whole horde.
    pub fn spawn_horde(
        &mut self,
        area: &SpawnArea,
        count: usize,
        config: &AgentConfig,
        seed: u64,
    ) -> Vec<EntityId> {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        if let Err(err) = config.validate() {
            log::error!("horde configuration rejected, spawning inert agents: {}", err);
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut spawned = Vec::with_capacity(count);
        for i in 0..count {
            let candidate = area.random_point(&mut rng);
            let Some(position) = self.surface.sample_position(candidate, area.sample_radius)
            else {
                log::warn!("spawn candidate {:?} is off the walkable surface", candidate);
                continue;
            };
            spawned.push(self.spawn_zombie(position, config.clone(), seed.wrapping_add(i as u64)));
        }
        spawned
    }

    /// Advance the world by one tick
    pub fn tick(&mut self, dt: f32, sink: &mut dyn EventSink) {
        self.time += dt;

        self.player.update(dt);
        if let Some(drop) = self.trail.tick(dt, self.player.position()) {
            self.scent
                .add_marker(drop, self.trail.radius, self.trail.lifetime);
        }
        self.scent.update(dt);

        self.spatial.clear();
        self.spatial
            .insert(Category::Player, self.player.id(), self.player.position());
        for zombie in &self.zombies {
            self.spatial
                .insert(Category::Zombie, zombie.id, zombie.nav.position());
        }

        let observation = self.player.observation();
        let mut alerts: Vec<(Alert, Vec3)> = Vec::new();

        for i in 0..self.zombies.len() {
            let (id, position) = (self.zombies[i].id, self.zombies[i].nav.position());
            if let Some(scent_position) = self.scent.sense(id, position) {
                let zombie = &mut self.zombies[i];
                zombie.controller.on_scent_contact(
                    scent_position,
                    &mut zombie.nav,
                    &self.surface,
                    sink,
                );
            }

            let world = Surroundings::new(
                &self.occlusion,
                Some((Category::Player, observation)),
            );
            let zombie = &mut self.zombies[i];
            if let Some(alert) =
                zombie
                    .controller
                    .update(dt, &mut zombie.nav, &self.surface, &world, sink)
            {
                alerts.push((alert, zombie.nav.position()));
            }
        }

        self.dispatch_alerts(alerts, sink);

        for zombie in &mut self.zombies {
            zombie.nav.update(dt, &self.surface);
        }
    }

    fn dispatch_alerts(&mut self, alerts: Vec<(Alert, Vec3)>, sink: &mut dyn EventSink) {
        let hub = self.hub;
        let spatial = &self.spatial;
        let surface = &self.surface;
        let zombies = &mut self.zombies;

        for (alert, sender_position) in alerts {
            let range = zombies
                .iter()
                .find(|z| z.id == alert.sender)
                .map(|z| z.controller.config().comms.range)
                .unwrap_or(0.0);

            let notified = hub.publish(spatial, sender_position, range, alert, |peer, alert| {
                match zombies.iter_mut().find(|z| z.id == peer) {
                    Some(zombie) if !zombie.controller.is_inert() => {
                        zombie.controller.receive_alert(
                            alert.position,
                            &mut zombie.nav,
                            surface,
                            sink,
                        );
                        true
                    }
                    _ => false,
                }
            });

            sink.notify(SimEvent::AlertBroadcast {
                agent: alert.sender,
                position: alert.position.to_array(),
                notified,
            });
        }
    }

    /// Target snapshot as the vision pipeline sees it, mainly for tests
    pub fn player_observation(&self) -> TargetObservation {
        self.player.observation()
    }
}
