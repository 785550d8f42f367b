//! The pursuit target and its scent trail

use serde::{Deserialize, Serialize};
use shamble_ai::TargetObservation;
use shamble_core::EntityId;
use shamble_math::{Aabb, Vec3};

/// Distance at which a route waypoint counts as reached
const ROUTE_THRESHOLD: f32 = 0.1;

/// Body half extents used for vision tests
const BODY_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 0.9, 0.4);

/// The player entity, driven by an optional looping route
///
/// The simulation only needs a moving target; anything fancier (input,
/// physics) lives outside and drives the position directly via [`warp`].
///
/// [`warp`]: Player::warp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: EntityId,
    position: Vec3,
    pub speed: f32,
    route: Vec<Vec3>,
    next_waypoint: usize,
}

impl Player {
    pub fn new(id: EntityId, position: Vec3, speed: f32) -> Self {
        Self {
            id,
            position,
            speed,
            route: Vec::new(),
            next_waypoint: 0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the player directly, e.g. from external input
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Install a looping patrol route
    pub fn set_route(&mut self, route: Vec<Vec3>) {
        self.route = route;
        self.next_waypoint = 0;
    }

    /// Advance along the route, if one is set
    pub fn update(&mut self, dt: f32) {
        if self.route.is_empty() {
            return;
        }
        let goal = self.route[self.next_waypoint % self.route.len()];
        let to_goal = goal - self.position;
        let distance = to_goal.length();
        if distance <= ROUTE_THRESHOLD {
            self.next_waypoint = (self.next_waypoint + 1) % self.route.len();
            return;
        }
        let step = (self.speed * dt).min(distance);
        self.position += to_goal / distance * step;
    }

    /// Snapshot handed to the vision pipeline
    pub fn observation(&self) -> TargetObservation {
        TargetObservation {
            entity: self.id,
            position: self.position,
            bounds: Aabb::from_center_half_extents(
                self.position + Vec3::new(0.0, BODY_HALF_EXTENTS.y, 0.0),
                BODY_HALF_EXTENTS,
            ),
        }
    }
}

/// Periodic scent drops behind a moving target
///
/// Every `interval` seconds, if the target moved at least `min_move`
/// since the last drop, a new scent marker is due at the current
/// position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScentTrail {
    /// Seconds between drop attempts
    pub interval: f32,
    /// Minimum movement since the last drop for a new one
    pub min_move: f32,
    /// Radius of dropped markers
    pub radius: f32,
    /// Lifetime of dropped markers, None for permanent
    pub lifetime: Option<f32>,
    since_attempt: f32,
    last_drop: Option<Vec3>,
}

impl Default for ScentTrail {
    fn default() -> Self {
        Self {
            interval: 1.5,
            min_move: 0.5,
            radius: 1.0,
            lifetime: Some(20.0),
            since_attempt: 0.0,
            last_drop: None,
        }
    }
}

impl ScentTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timer; returns the position where a marker is due
    pub fn tick(&mut self, dt: f32, position: Vec3) -> Option<Vec3> {
        self.since_attempt += dt;
        if self.since_attempt < self.interval {
            return None;
        }
        self.since_attempt = 0.0;

        let moved_enough = self
            .last_drop
            .map_or(true, |p| p.distance(position) >= self.min_move);
        if !moved_enough {
            return None;
        }
        self.last_drop = Some(position);
        Some(position)
    }
}
