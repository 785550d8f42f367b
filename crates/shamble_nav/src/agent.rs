//! Navigation agent: destination requests and movement integration

use crate::surface::{NavPath, NavSurface};
use serde::{Deserialize, Serialize};
use shamble_math::Vec3;

/// Distance at which an intermediate waypoint counts as passed
const WAYPOINT_THRESHOLD: f32 = 0.25;

/// A navigating agent
///
/// Destination requests are resolved against the surface on the next
/// update; until then the path reports as pending. Readable path state
/// mirrors what the behavior engine polls every tick: `path_pending`,
/// `remaining_distance`, `stopping_distance`, `has_path` and `velocity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavAgent {
    /// Current world position
    position: Vec3,
    /// Current velocity, updated during movement integration
    velocity: Vec3,
    /// Movement speed in units per second
    pub speed: f32,
    /// Distance from the destination at which the agent stops
    pub stopping_distance: f32,
    /// Active path, if any
    path: Option<NavPath>,
    /// Destination requested but not yet resolved into a path
    requested: Option<Vec3>,
}

impl NavAgent {
    /// Create an agent at a position
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            speed,
            stopping_distance: 0.5,
            path: None,
            requested: None,
        }
    }

    /// Current world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the agent, dropping any active path
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.reset_path();
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Request a new destination
    ///
    /// The path is computed on the next update; until then
    /// `path_pending` reports true.
    pub fn set_destination(&mut self, destination: Vec3) {
        self.requested = Some(destination);
    }

    /// Drop the active path and any pending request
    pub fn reset_path(&mut self) {
        self.path = None;
        self.requested = None;
        self.velocity = Vec3::ZERO;
    }

    /// Whether a destination request is awaiting path computation
    pub fn path_pending(&self) -> bool {
        self.requested.is_some()
    }

    /// Whether the agent has an active, unconsumed path
    pub fn has_path(&self) -> bool {
        self.path.as_ref().is_some_and(|p| !p.is_complete())
    }

    /// Path distance left to the destination
    ///
    /// Infinite while no path exists or a request is still pending, so
    /// arrival checks never pass spuriously.
    pub fn remaining_distance(&self) -> f32 {
        if self.path_pending() {
            return f32::INFINITY;
        }
        match &self.path {
            Some(path) => path.remaining_from(self.position),
            None => f32::INFINITY,
        }
    }

    /// Whether the agent has reached its destination
    pub fn arrived(&self) -> bool {
        !self.path_pending() && self.remaining_distance() <= self.stopping_distance
    }

    /// Resolve pending requests and advance along the path
    pub fn update(&mut self, dt: f32, surface: &NavSurface) {
        if let Some(destination) = self.requested.take() {
            // A failed computation leaves the previous path in place
            if let Some(path) = surface.find_path(self.position, destination) {
                self.path = Some(path);
            }
        }

        let Some(path) = &mut self.path else {
            self.velocity = Vec3::ZERO;
            return;
        };

        let Some(waypoint) = path.current_waypoint() else {
            self.velocity = Vec3::ZERO;
            return;
        };

        let to_waypoint = waypoint - self.position;
        let distance = to_waypoint.length();

        let threshold = if path.destination() == Some(waypoint) {
            self.stopping_distance.max(WAYPOINT_THRESHOLD)
        } else {
            WAYPOINT_THRESHOLD
        };

        if distance <= threshold {
            path.advance();
            if path.is_complete() {
                self.velocity = Vec3::ZERO;
            }
            return;
        }

        let step = (self.speed * dt).min(distance);
        let direction = to_waypoint / distance;
        self.velocity = direction * self.speed;
        self.position += direction * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> NavSurface {
        NavSurface::create_grid(Vec3::ZERO, 20.0, 20.0, 5.0)
    }

    #[test]
    fn test_destination_pending_until_update() {
        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 2.0);
        agent.set_destination(Vec3::new(17.5, 0.0, 2.5));
        assert!(agent.path_pending());
        assert!(!agent.has_path());
        assert_eq!(agent.remaining_distance(), f32::INFINITY);

        agent.update(0.016, &surface());
        assert!(!agent.path_pending());
        assert!(agent.has_path());
        assert!(agent.remaining_distance().is_finite());
    }

    #[test]
    fn test_agent_reaches_destination() {
        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 5.0);
        agent.set_destination(Vec3::new(12.5, 0.0, 2.5));

        let surface = surface();
        for _ in 0..500 {
            agent.update(0.05, &surface);
            if agent.arrived() {
                break;
            }
        }

        assert!(agent.arrived());
        assert!(!agent.has_path());
        assert!(agent.position().distance(Vec3::new(12.5, 0.0, 2.5)) < 1.0);
    }

    #[test]
    fn test_reset_path_stops_agent() {
        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 5.0);
        agent.set_destination(Vec3::new(17.5, 0.0, 17.5));
        agent.update(0.05, &surface());
        assert!(agent.has_path());

        agent.reset_path();
        assert!(!agent.has_path());
        assert!(!agent.path_pending());
        assert_eq!(agent.velocity(), Vec3::ZERO);
        assert_eq!(agent.remaining_distance(), f32::INFINITY);
    }

    #[test]
    fn test_velocity_while_moving() {
        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 3.0);
        agent.set_destination(Vec3::new(17.5, 0.0, 2.5));
        agent.update(0.05, &surface());
        agent.update(0.05, &surface());
        assert!((agent.velocity().length() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_failed_path_keeps_previous_goal() {
        let mut surface = NavSurface::create_grid(Vec3::ZERO, 15.0, 5.0, 5.0);
        surface.set_walkable(1, 0, false);

        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 3.0);
        agent.set_destination(Vec3::new(12.5, 0.0, 2.5));
        agent.update(0.05, &surface);

        // Unreachable goal: request consumed, no path produced
        assert!(!agent.path_pending());
        assert!(!agent.has_path());
    }
}
