//! # shamble_math - Geometry for agent perception
//!
//! Math primitives backing the perception and navigation queries of the
//! simulation: vectors, bounding volumes, rays and view frustums.

pub mod bounds;
pub mod frustum;
pub mod ray;
pub mod vector;

pub use bounds::*;
pub use frustum::*;
pub use ray::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}
