//! # shamble_world - World-side collaborators for the behavior engine
//!
//! Concrete implementations of the world access the engine defines as
//! traits:
//!
//! - [`SpatialIndex`]: category-bucketed radius queries ([`shamble_ai::SpatialQuery`])
//! - [`OcclusionMap`] + [`Surroundings`]: line-of-sight raycasts and the
//!   target snapshot ([`shamble_ai::WorldView`])
//! - [`ScentField`]: edge-triggered scent volumes

pub mod occlusion;
pub mod scent;
pub mod spatial;

pub use occlusion::{Occluder, OcclusionMap, Surroundings};
pub use scent::ScentField;
pub use spatial::SpatialIndex;
