//! Horde spawning

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shamble_math::{Aabb, Vec3};

/// Region in which horde agents are placed
///
/// Candidate points are drawn uniformly in the box, then snapped to the
/// walkable surface; candidates with no walkable cell nearby are
/// discarded, so a spawn can yield fewer agents than requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnArea {
    pub bounds: Aabb,
    /// Surface sampling radius around each candidate
    pub sample_radius: f32,
}

impl SpawnArea {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            sample_radius: 2.0,
        }
    }

    /// Draw a uniform candidate point on the floor of the box
    pub fn random_point(&self, rng: &mut SmallRng) -> Vec3 {
        Vec3::new(
            rng.gen_range(self.bounds.min.x..=self.bounds.max.x),
            self.bounds.min.y,
            rng.gen_range(self.bounds.min.z..=self.bounds.max.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_points_stay_in_bounds() {
        let area = SpawnArea::new(Aabb::new(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
        ));
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let p = area.random_point(&mut rng);
            assert!(area.bounds.contains_point(p));
        }
    }
}
