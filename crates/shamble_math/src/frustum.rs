//! View-frustum types for the angular part of vision tests
//!
//! A sensor frustum is built directly from the sensor pose (origin,
//! forward, up) and its perspective parameters; there is no camera
//! matrix to extract planes from in this simulation.

use crate::bounds::Aabb;
use crate::vector::Vec3;

/// Plane in 3D space (ax + by + cz + d = 0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Plane normal (unit vector)
    pub normal: Vec3,
    /// Distance from origin along normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a point on the plane and its normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Get the signed distance from a point to the plane
    ///
    /// Positive = in front (same side as normal)
    /// Negative = behind (opposite side of normal)
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            distance: 0.0,
        }
    }
}

/// Result of frustum containment test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrustumTestResult {
    /// Object is completely inside the frustum
    Inside,
    /// Object is completely outside the frustum
    Outside,
    /// Object intersects the frustum boundary
    Intersecting,
}

impl FrustumTestResult {
    /// Check if the object is at least partially visible
    #[inline]
    pub fn is_visible(&self) -> bool {
        *self != FrustumTestResult::Outside
    }
}

/// View frustum for visibility tests
///
/// The six planes are: left, right, bottom, top, near, far.
/// All planes have normals pointing inward (toward the visible region).
#[derive(Clone, Debug)]
pub struct FrustumPlanes {
    /// Frustum planes (left, right, bottom, top, near, far)
    pub planes: [Plane; 6],
}

impl FrustumPlanes {
    /// Build a perspective frustum from a sensor pose
    ///
    /// `forward` and `up` must be non-parallel; both are normalized here.
    /// `fov_y` is the full vertical field of view in radians.
    pub fn from_perspective(
        origin: Vec3,
        forward: Vec3,
        up: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let f = forward.normalize();
        let r = up.cross(f).normalize();
        let u = f.cross(r);

        let tan_half = (fov_y * 0.5).tan();
        let half_w = tan_half * aspect;

        // Directions through the centers of the four side edges at unit depth
        let d_top = f + u * tan_half;
        let d_bottom = f - u * tan_half;
        let d_right = f + r * half_w;
        let d_left = f - r * half_w;

        let left = Plane::from_point_normal(origin, u.cross(d_left));
        let right = Plane::from_point_normal(origin, d_right.cross(u));
        let bottom = Plane::from_point_normal(origin, d_bottom.cross(r));
        let top = Plane::from_point_normal(origin, r.cross(d_top));
        let near = Plane::from_point_normal(origin + f * near, f);
        let far = Plane::from_point_normal(origin + f * far, -f);

        Self {
            planes: [left, right, bottom, top, near, far],
        }
    }

    /// Test if an AABB is inside, outside, or intersecting the frustum
    pub fn contains_aabb(&self, aabb: &Aabb) -> FrustumTestResult {
        let mut result = FrustumTestResult::Inside;

        for plane in &self.planes {
            // Corner most aligned with the plane normal (p-vertex)
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            // Corner least aligned with the plane normal (n-vertex)
            let n = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if plane.normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if plane.normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if plane.distance_to_point(p) < 0.0 {
                return FrustumTestResult::Outside;
            }

            if plane.distance_to_point(n) < 0.0 {
                result = FrustumTestResult::Intersecting;
            }
        }

        result
    }

    /// Test if a point is inside the frustum
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

impl Default for FrustumPlanes {
    fn default() -> Self {
        Self {
            planes: [Plane::default(); 6],
        }
    }
}
