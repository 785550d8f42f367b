//! Category-bucketed spatial index
//!
//! Entities are bucketed by category so a radius query only ever scans
//! entities of the requested kind. The index is rebuilt from scratch
//! each tick; at horde scale a linear scan per bucket beats maintaining
//! an incremental structure.

use shamble_ai::{EntityRef, SpatialQuery};
use shamble_core::{Category, EntityId};
use shamble_math::Vec3;
use std::collections::HashMap;

/// Flat per-category position index
#[derive(Debug, Default)]
pub struct SpatialIndex {
    buckets: HashMap<Category, Vec<EntityRef>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all entries, keeping bucket allocations
    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }

    /// Register an entity for this tick
    pub fn insert(&mut self, category: Category, entity: EntityId, position: Vec3) {
        self.buckets
            .entry(category)
            .or_default()
            .push(EntityRef { entity, position });
    }

    /// Number of indexed entities across all categories
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpatialQuery for SpatialIndex {
    fn query_by_category(&self, category: Category, center: Vec3, radius: f32) -> Vec<EntityRef> {
        let Some(bucket) = self.buckets.get(&category) else {
            return Vec::new();
        };
        let radius_sq = radius * radius;
        bucket
            .iter()
            .copied()
            .filter(|e| e.position.distance_squared(center) <= radius_sq)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_filters_by_category_and_radius() {
        let mut index = SpatialIndex::new();
        index.insert(Category::Zombie, EntityId::new(0, 0), Vec3::ZERO);
        index.insert(Category::Zombie, EntityId::new(1, 0), Vec3::new(10.0, 0.0, 0.0));
        index.insert(Category::Zombie, EntityId::new(2, 0), Vec3::new(30.0, 0.0, 0.0));
        index.insert(Category::Player, EntityId::new(3, 0), Vec3::ZERO);

        let hits = index.query_by_category(Category::Zombie, Vec3::ZERO, 15.0);
        let ids: Vec<_> = hits.iter().map(|e| e.entity.index()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_clear_empties_buckets() {
        let mut index = SpatialIndex::new();
        index.insert(Category::Prop, EntityId::new(0, 0), Vec3::ZERO);
        assert_eq!(index.len(), 1);
        index.clear();
        assert!(index.is_empty());
        assert!(index
            .query_by_category(Category::Prop, Vec3::ZERO, 100.0)
            .is_empty());
    }
}
