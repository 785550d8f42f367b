//! Agent behavior configuration
//!
//! Every tunable the controller and its sensors consume lives here, with
//! defaults matching the reference horde setup. Configurations are plain
//! data and serializable so scenario files can override them wholesale.

use crate::error::AiError;
use serde::{Deserialize, Serialize};
use shamble_math::Vec3;

/// Roaming behavior while no target is known
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius around the agent within which roam goals are drawn
    pub radius: f32,
    /// Shortest pause at a reached roam goal, in seconds
    pub min_wait: f32,
    /// Longest pause at a reached roam goal, in seconds
    pub max_wait: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            min_wait: 2.0,
            max_wait: 5.0,
        }
    }
}

/// Perspective parameters of the vision sensor
///
/// The sensor sits at `local_offset` from the agent origin, in the
/// agent's frame (x right, y up, z forward), and looks along the agent's
/// facing. A narrow far plane keeps the angular test consistent with the
/// range test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRig {
    /// Sensor position relative to the agent origin
    pub local_offset: Vec3,
    /// Full vertical field of view in degrees
    pub fov_y_deg: f32,
    /// Frustum aspect ratio (width over height)
    pub aspect: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

impl Default for SensorRig {
    fn default() -> Self {
        Self {
            local_offset: Vec3::new(0.0, 1.5, 0.2),
            fov_y_deg: 90.0,
            aspect: 1.0,
            near: 0.3,
            far: 10.0,
        }
    }
}

/// Vision sensing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Whether the agent senses at all; disabled agents never sight targets
    pub enabled: bool,
    /// Maximum sighting distance from the agent origin
    pub range: f32,
    /// Seconds between full visibility evaluations
    pub check_interval: f32,
    /// Frustum and placement of the sensor, required when enabled
    pub rig: Option<SensorRig>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            range: 4.0,
            check_interval: 0.2,
            rig: Some(SensorRig::default()),
        }
    }
}

/// Peer alert broadcasting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommsConfig {
    /// Broadcast radius around the sender; zero disables broadcasting
    pub range: f32,
}

impl Default for CommsConfig {
    fn default() -> Self {
        Self { range: 15.0 }
    }
}

/// Navigation stall detection and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StuckConfig {
    /// Seconds between progress measurements
    pub check_interval: f32,
    /// Movement below this distance per measurement counts as no progress
    pub distance_threshold: f32,
    /// Seconds of no progress before recovery triggers
    pub time_threshold: f32,
    /// Radius of the random offset applied to the chase goal on recovery
    pub jitter_radius: f32,
    /// Surface sampling radius for the jittered goal
    pub sample_radius: f32,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            check_interval: 1.0,
            distance_threshold: 0.5,
            time_threshold: 3.0,
            jitter_radius: 3.0,
            sample_radius: 5.0,
        }
    }
}

/// Full per-agent behavior configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    pub search: SearchConfig,
    pub vision: VisionConfig,
    pub comms: CommsConfig,
    pub stuck: StuckConfig,
    pub movement: MovementConfig,
}

/// Locomotion parameters handed to the navigation agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Movement speed in units per second
    pub speed: f32,
    /// Distance from a goal at which the agent stops
    pub stopping_distance: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 0.5,
        }
    }
}

impl AgentConfig {
    /// Check the configuration for out-of-range or inconsistent values
    pub fn validate(&self) -> Result<(), AiError> {
        if self.search.radius <= 0.0 {
            return Err(AiError::InvalidConfig(format!(
                "search radius must be positive, got {}",
                self.search.radius
            )));
        }
        if self.search.min_wait < 0.0 || self.search.max_wait < self.search.min_wait {
            return Err(AiError::InvalidConfig(format!(
                "search wait range [{}, {}] is not a valid interval",
                self.search.min_wait, self.search.max_wait
            )));
        }
        if self.vision.enabled {
            if self.vision.range <= 0.0 {
                return Err(AiError::InvalidConfig(format!(
                    "vision range must be positive, got {}",
                    self.vision.range
                )));
            }
            if self.vision.check_interval <= 0.0 {
                return Err(AiError::InvalidConfig(format!(
                    "vision check interval must be positive, got {}",
                    self.vision.check_interval
                )));
            }
            let rig = self
                .vision
                .rig
                .as_ref()
                .ok_or(AiError::MissingCollaborator("vision sensor rig"))?;
            if rig.fov_y_deg <= 0.0 || rig.fov_y_deg >= 180.0 {
                return Err(AiError::InvalidConfig(format!(
                    "vision fov must be in (0, 180) degrees, got {}",
                    rig.fov_y_deg
                )));
            }
            if rig.near <= 0.0 || rig.far <= rig.near {
                return Err(AiError::InvalidConfig(format!(
                    "vision planes must satisfy 0 < near < far, got near {} far {}",
                    rig.near, rig.far
                )));
            }
        }
        if self.comms.range < 0.0 {
            return Err(AiError::InvalidConfig(format!(
                "comms range must be non-negative, got {}",
                self.comms.range
            )));
        }
        if self.stuck.check_interval <= 0.0
            || self.stuck.time_threshold <= 0.0
            || self.stuck.distance_threshold < 0.0
        {
            return Err(AiError::InvalidConfig(
                "stuck detection thresholds must be positive".into(),
            ));
        }
        if self.movement.speed <= 0.0 {
            return Err(AiError::InvalidConfig(format!(
                "movement speed must be positive, got {}",
                self.movement.speed
            )));
        }
        Ok(())
    }
}
