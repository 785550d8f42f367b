//! # shamble_ai - Horde agent behavior engine
//!
//! Per-agent pursuit behavior built from small, separately testable
//! parts:
//!
//! - [`AgentController`]: the Searching/Chasing state machine
//! - [`VisionSensor`]: throttled range + frustum + line-of-sight vision
//! - [`CommsHub`]: one-hop alert fan-out to nearby peers
//! - [`StuckMonitor`]: navigation stall detection
//!
//! World access goes through the [`WorldView`] and [`SpatialQuery`]
//! traits so the engine never depends on a concrete world
//! representation.
//!
//! # Example
//!
//! ```ignore
//! use shamble_ai::prelude::*;
//!
//! let mut agent = AgentController::new(id, AgentConfig::default(),
//!     Category::Player, spawn, seed)?;
//! agent.start(&mut nav, &surface);
//! // every tick:
//! let alert = agent.update(dt, &mut nav, &surface, &world, &mut sink);
//! ```

pub mod comms;
pub mod config;
pub mod controller;
pub mod error;
pub mod perception;
pub mod stuck;

pub mod prelude {
    pub use crate::comms::{Alert, CommsHub, EntityRef, SpatialQuery};
    pub use crate::config::{
        AgentConfig, CommsConfig, MovementConfig, SearchConfig, SensorRig, StuckConfig,
        VisionConfig,
    };
    pub use crate::controller::{AgentController, AgentState};
    pub use crate::error::AiError;
    pub use crate::perception::{AgentPose, TargetObservation, VisionSensor, WorldView};
    pub use crate::stuck::StuckMonitor;
}

pub use prelude::*;
