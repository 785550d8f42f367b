//! Agent behavior state machine
//!
//! Two states: `Searching` roams the surface with randomized pauses,
//! `Chasing` pursues a target position. A chase is *direct* while it is
//! fed by the agent's own vision and *indirect* when it came from a peer
//! alert or a scent contact. Only direct pursuit produces alerts, and
//! indirect information never overrides direct pursuit, so fan-out
//! converges after a single hop.

use crate::comms::Alert;
use crate::config::AgentConfig;
use crate::error::AiError;
use crate::perception::{AgentPose, VisionSensor, WorldView};
use crate::stuck::StuckMonitor;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use shamble_core::{Category, EntityId, EventSink, SimEvent};
use shamble_math::Vec3;
use shamble_nav::{NavAgent, NavSurface};

/// Velocity below which the agent keeps its previous facing
const WALK_EPSILON: f32 = 0.1;

/// Minimum target displacement before a pursuing agent re-broadcasts
const ALERT_TOLERANCE: f32 = 0.5;

/// Behavior state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentState {
    /// Roaming the surface, no target known
    Searching,
    /// Pursuing a target position
    Chasing {
        /// Last known target position
        target: Vec3,
        /// Whether the pursuit is fed by the agent's own vision
        direct: bool,
    },
}

impl AgentState {
    /// Stable state name for events and logs
    pub fn name(&self) -> &'static str {
        match self {
            AgentState::Searching => "searching",
            AgentState::Chasing { .. } => "chasing",
        }
    }
}

/// Per-agent behavior controller
///
/// The controller owns the state machine, the vision sensor and the
/// stall monitor. Navigation and world access are passed in per call so
/// the simulation keeps ownership of both.
#[derive(Debug, Clone)]
pub struct AgentController {
    id: EntityId,
    config: AgentConfig,
    state: AgentState,
    /// Horizontal facing, updated from navigation velocity
    facing: Vec3,
    vision: VisionSensor,
    stuck: StuckMonitor,
    rng: SmallRng,
    /// Seconds waited at the current roam goal
    search_wait: f32,
    /// Pause length for the current roam goal, drawn once on arrival
    wait_goal: Option<f32>,
    /// Target position of the most recent broadcast, if any
    last_alert: Option<Vec3>,
    target_category: Category,
    inert: bool,
}

impl AgentController {
    /// Create a controller, validating the configuration first
    pub fn new(
        id: EntityId,
        config: AgentConfig,
        target_category: Category,
        spawn: Vec3,
        seed: u64,
    ) -> Result<Self, AiError> {
        config.validate()?;
        Ok(Self {
            id,
            state: AgentState::Searching,
            facing: Vec3::Z,
            vision: VisionSensor::new(config.vision.clone()),
            stuck: StuckMonitor::new(config.stuck.clone(), spawn),
            rng: SmallRng::seed_from_u64(seed),
            search_wait: 0.0,
            wait_goal: None,
            last_alert: None,
            target_category,
            inert: false,
            config,
        })
    }

    /// Create a controller that ignores every input
    ///
    /// Used when a spawn fails validation: the agent stays in the world
    /// but never acts.
    pub fn inert(id: EntityId) -> Self {
        let config = AgentConfig::default();
        Self {
            id,
            state: AgentState::Searching,
            facing: Vec3::Z,
            vision: VisionSensor::new(config.vision.clone()),
            stuck: StuckMonitor::new(config.stuck.clone(), Vec3::ZERO),
            rng: SmallRng::seed_from_u64(0),
            search_wait: 0.0,
            wait_goal: None,
            last_alert: None,
            target_category: Category::Player,
            inert: true,
            config,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Pick the initial roam goal; call once after spawning
    pub fn start(&mut self, nav: &mut NavAgent, surface: &NavSurface) {
        if self.inert {
            return;
        }
        self.pick_search_destination(nav, surface);
    }

    /// Advance the controller by one tick
    ///
    /// Returns an alert when this tick produced a sighting worth
    /// broadcasting; the caller fans it out.
    pub fn update(
        &mut self,
        dt: f32,
        nav: &mut NavAgent,
        surface: &NavSurface,
        view: &dyn WorldView,
        sink: &mut dyn EventSink,
    ) -> Option<Alert> {
        if self.inert {
            return None;
        }

        let velocity = nav.velocity().horizontal();
        if velocity.length() > WALK_EPSILON {
            self.facing = velocity.normalize();
        }

        let pose = AgentPose::new(nav.position(), self.facing);
        let seen = self.vision.poll(dt, &pose, view, self.target_category);

        let mut alert = None;
        if let Some(position) = seen {
            if let AgentState::Chasing {
                target,
                direct: true,
            } = &mut self.state
            {
                // Ongoing direct pursuit: follow the target, re-broadcast
                // only once it has moved meaningfully
                *target = position;
                nav.set_destination(position);
                if self
                    .last_alert
                    .map_or(true, |p| p.distance(position) > ALERT_TOLERANCE)
                {
                    self.last_alert = Some(position);
                    alert = Some(Alert {
                        sender: self.id,
                        position,
                    });
                }
            } else {
                // Fresh sighting, from roaming or an indirect chase
                sink.notify(SimEvent::TargetSighted {
                    agent: self.id,
                    position: position.to_array(),
                });
                log::debug!("agent {} spotted the target", self.id);
                self.change_state(
                    AgentState::Chasing {
                        target: position,
                        direct: true,
                    },
                    nav,
                    surface,
                    sink,
                );
                self.last_alert = Some(position);
                alert = Some(Alert {
                    sender: self.id,
                    position,
                });
            }
        }

        let nav_active = nav.has_path() && !nav.path_pending();
        if self.stuck.tick(dt, nav.position(), nav_active) {
            self.recover(nav, surface, sink);
        }

        match self.state {
            AgentState::Searching => {
                let idle = !nav.has_path() && !nav.path_pending();
                if nav.arrived() || idle {
                    if self.wait_goal.is_none() {
                        self.wait_goal = Some(self.rng.gen_range(
                            self.config.search.min_wait..=self.config.search.max_wait,
                        ));
                    }
                    self.search_wait += dt;
                    if self.wait_goal.is_some_and(|goal| self.search_wait >= goal) {
                        self.pick_search_destination(nav, surface);
                    }
                }
            }
            AgentState::Chasing { direct, .. } => {
                // Direct pursuit ends only when sight is lost; either way
                // the agent resumes roaming once it reaches the last
                // known position. A goal the surface could not produce a
                // path for counts as reached, or the chase would hold
                // forever with no path for the stall monitor to watch.
                let lost = !direct || self.vision.last_seen().is_none();
                let unreachable = !nav.has_path() && !nav.path_pending();
                if lost && (nav.arrived() || unreachable) {
                    self.change_state(AgentState::Searching, nav, surface, sink);
                }
            }
        }

        alert
    }

    /// Handle a peer's sighting alert
    ///
    /// Ignored during direct pursuit: the agent's own eyes outrank
    /// second-hand information.
    pub fn receive_alert(
        &mut self,
        position: Vec3,
        nav: &mut NavAgent,
        surface: &NavSurface,
        sink: &mut dyn EventSink,
    ) {
        if self.inert || self.is_direct_pursuit() {
            return;
        }
        log::debug!("agent {} responding to peer alert", self.id);
        self.change_state(
            AgentState::Chasing {
                target: position,
                direct: false,
            },
            nav,
            surface,
            sink,
        );
    }

    /// Handle entering a scent volume
    pub fn on_scent_contact(
        &mut self,
        position: Vec3,
        nav: &mut NavAgent,
        surface: &NavSurface,
        sink: &mut dyn EventSink,
    ) {
        if self.inert || self.is_direct_pursuit() {
            return;
        }
        sink.notify(SimEvent::ScentContact {
            agent: self.id,
            position: position.to_array(),
        });
        log::debug!("agent {} picked up a scent", self.id);
        self.change_state(
            AgentState::Chasing {
                target: position,
                direct: false,
            },
            nav,
            surface,
            sink,
        );
    }

    fn is_direct_pursuit(&self) -> bool {
        matches!(self.state, AgentState::Chasing { direct: true, .. })
    }

    /// Transition between states, running exit then entry actions
    fn change_state(
        &mut self,
        next: AgentState,
        nav: &mut NavAgent,
        surface: &NavSurface,
        sink: &mut dyn EventSink,
    ) {
        let from = self.state.name();
        match self.state {
            AgentState::Searching => {
                self.search_wait = 0.0;
                self.wait_goal = None;
            }
            AgentState::Chasing { .. } => {
                self.last_alert = None;
            }
        }

        self.state = next;
        sink.notify(SimEvent::StateChanged {
            agent: self.id,
            from,
            to: self.state.name(),
        });

        match self.state {
            AgentState::Searching => self.pick_search_destination(nav, surface),
            AgentState::Chasing { target, .. } => nav.set_destination(target),
        }
    }

    /// Draw a roam goal around the agent and hand it to navigation
    fn pick_search_destination(&mut self, nav: &mut NavAgent, surface: &NavSurface) {
        self.search_wait = 0.0;
        self.wait_goal = None;

        let candidate =
            nav.position() + random_in_sphere(&mut self.rng) * self.config.search.radius;
        match surface.sample_position(candidate, self.config.search.radius) {
            Some(goal) => nav.set_destination(goal),
            None => log::trace!("agent {} found no walkable roam goal", self.id),
        }
    }

    /// Reroute after a detected stall
    fn recover(&mut self, nav: &mut NavAgent, surface: &NavSurface, sink: &mut dyn EventSink) {
        sink.notify(SimEvent::StuckRecovery { agent: self.id });
        log::debug!("agent {} stalled, rerouting", self.id);
        nav.reset_path();

        match self.state {
            AgentState::Searching => self.pick_search_destination(nav, surface),
            AgentState::Chasing { target, .. } => {
                // Approach the same goal from a jittered angle
                let jitter =
                    (random_in_sphere(&mut self.rng) * self.config.stuck.jitter_radius).horizontal();
                match surface.sample_position(target + jitter, self.config.stuck.sample_radius) {
                    Some(goal) => nav.set_destination(goal),
                    None => self.change_state(AgentState::Searching, nav, surface, sink),
                }
            }
        }
    }
}

/// Uniform random point in the unit sphere
fn random_in_sphere(rng: &mut SmallRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}
