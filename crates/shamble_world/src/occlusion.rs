//! Static occluders and the line-of-sight world view
//!
//! Props register their bounds once; a raycast walks every occluder and
//! returns the nearest hit. [`Surroundings`] bundles the occluders with
//! the current target snapshot into the [`WorldView`] the behavior
//! engine consumes, so a vision ray can be blocked by a wall or land on
//! the target itself.

use shamble_ai::{TargetObservation, WorldView};
use shamble_core::{Category, EntityId};
use shamble_math::{Aabb, Ray, Vec3};

/// A static vision-blocking volume
#[derive(Debug, Clone, Copy)]
pub struct Occluder {
    pub entity: EntityId,
    pub bounds: Aabb,
}

/// All static occluders in the level
#[derive(Debug, Default)]
pub struct OcclusionMap {
    occluders: Vec<Occluder>,
}

impl OcclusionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: EntityId, bounds: Aabb) {
        self.occluders.push(Occluder { entity, bounds });
    }

    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }

    /// Nearest occluder hit along a ray, within `max_distance`
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<(EntityId, f32)> {
        let mut best: Option<(EntityId, f32)> = None;
        for occluder in &self.occluders {
            if let Some(t) = ray.intersect_aabb(&occluder.bounds) {
                if t <= max_distance && best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((occluder.entity, t));
                }
            }
        }
        best
    }
}

/// Per-tick world snapshot handed to the behavior engine
///
/// Borrowed, not owned: the simulation assembles one per tick from its
/// occlusion map and the target's current transform.
pub struct Surroundings<'a> {
    occlusion: &'a OcclusionMap,
    target: Option<(Category, TargetObservation)>,
}

impl<'a> Surroundings<'a> {
    pub fn new(
        occlusion: &'a OcclusionMap,
        target: Option<(Category, TargetObservation)>,
    ) -> Self {
        Self { occlusion, target }
    }
}

impl WorldView for Surroundings<'_> {
    fn target_of(&self, category: Category) -> Option<TargetObservation> {
        self.target
            .filter(|(cat, _)| *cat == category)
            .map(|(_, obs)| obs)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<EntityId> {
        let ray = Ray::new(origin, direction);
        if !ray.is_valid() {
            return None;
        }

        let mut best: Option<(EntityId, f32)> = self.occlusion.raycast(&ray, max_distance);

        if let Some((_, obs)) = &self.target {
            if let Some(t) = ray.intersect_aabb(&obs.bounds) {
                if t <= max_distance && best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((obs.entity, t));
                }
            }
        }

        best.map(|(entity, _)| entity)
    }
}
