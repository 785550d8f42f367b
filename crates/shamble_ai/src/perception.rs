//! Vision sensing
//!
//! Visibility is evaluated in three stages, cheapest first: range check
//! from the agent origin, frustum test against the target bounds, then a
//! line-of-sight raycast to the bounds center. The full evaluation runs
//! at most once per configured interval; in between, callers get the
//! cached result.

use crate::config::VisionConfig;
use serde::{Deserialize, Serialize};
use shamble_core::{Category, EntityId};
use shamble_math::{radians, Aabb, FrustumPlanes, Vec3};

/// Slack added past the target center so the ray cannot stop just short
const LOS_RAY_SLACK: f32 = 0.5;

/// A perceivable target as the world reports it
#[derive(Debug, Clone, Copy)]
pub struct TargetObservation {
    pub entity: EntityId,
    /// Target origin, used as the pursuit goal
    pub position: Vec3,
    /// World-space bounds, used for the frustum and line-of-sight tests
    pub bounds: Aabb,
}

/// World access the sensor needs
///
/// The simulation implements this over its spatial structures; tests
/// implement it with fixtures.
pub trait WorldView {
    /// The current target of a category, if one exists
    fn target_of(&self, category: Category) -> Option<TargetObservation>;

    /// First entity hit along a ray, within `max_distance`
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<EntityId>;
}

/// Position and facing of the sensing agent
#[derive(Debug, Clone, Copy)]
pub struct AgentPose {
    pub position: Vec3,
    /// Horizontal facing, unit length
    pub forward: Vec3,
}

impl AgentPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

/// Throttled frustum and line-of-sight vision sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionSensor {
    config: VisionConfig,
    since_check: f32,
    last_seen: Option<Vec3>,
}

impl VisionSensor {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            config,
            since_check: 0.0,
            last_seen: None,
        }
    }

    /// Advance the throttle and report the target position if visible
    ///
    /// The full visibility evaluation is paid at most once per configured
    /// interval; between evaluations the previous result is returned.
    pub fn poll(
        &mut self,
        dt: f32,
        pose: &AgentPose,
        view: &dyn WorldView,
        target: Category,
    ) -> Option<Vec3> {
        self.since_check += dt;
        if self.since_check < self.config.check_interval {
            return self.last_seen;
        }
        self.since_check = 0.0;
        self.last_seen = self.observe(pose, view, target);
        self.last_seen
    }

    /// Result of the most recent evaluation, without advancing time
    pub fn last_seen(&self) -> Option<Vec3> {
        self.last_seen
    }

    fn observe(&self, pose: &AgentPose, view: &dyn WorldView, target: Category) -> Option<Vec3> {
        if !self.config.enabled {
            return None;
        }
        let rig = self.config.rig.as_ref()?;
        let observed = view.target_of(target)?;

        if pose.position.distance(observed.position) > self.config.range {
            return None;
        }

        let right = Vec3::Y.cross(pose.forward).normalize();
        let origin = pose.position
            + right * rig.local_offset.x
            + Vec3::Y * rig.local_offset.y
            + pose.forward * rig.local_offset.z;

        let frustum = FrustumPlanes::from_perspective(
            origin,
            pose.forward,
            Vec3::Y,
            radians(rig.fov_y_deg),
            rig.aspect,
            rig.near,
            rig.far,
        );
        if !frustum.contains_aabb(&observed.bounds).is_visible() {
            return None;
        }

        let center = observed.bounds.center();
        let to_center = center - origin;
        let hit = view.raycast(origin, to_center, to_center.length() + LOS_RAY_SLACK)?;
        (hit == observed.entity).then_some(observed.position)
    }
}
