//! Scent volumes
//!
//! Spherical markers dropped into the world, sensed edge-triggered: an
//! agent is notified when it enters a marker, then not again until it
//! leaves and re-enters. Markers may carry a lifetime and expire on
//! update.

use shamble_core::EntityId;
use shamble_math::{Sphere, Vec3};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy)]
struct ScentMarker {
    id: u64,
    volume: Sphere,
    /// Seconds until expiry, or None for a permanent marker
    remaining: Option<f32>,
}

/// All scent markers in the world, with per-agent containment tracking
#[derive(Debug, Default)]
pub struct ScentField {
    markers: Vec<ScentMarker>,
    next_id: u64,
    /// Markers each agent is currently inside of
    inside: HashMap<EntityId, HashSet<u64>>,
}

impl ScentField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a marker; returns its handle
    pub fn add_marker(&mut self, position: Vec3, radius: f32, lifetime: Option<f32>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.markers.push(ScentMarker {
            id,
            volume: Sphere::new(position, radius),
            remaining: lifetime,
        });
        log::trace!("scent marker {} dropped at {:?}", id, position);
        id
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Age markers and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        let mut expired: Vec<u64> = Vec::new();
        self.markers.retain_mut(|marker| {
            let Some(remaining) = &mut marker.remaining else {
                return true;
            };
            *remaining -= dt;
            if *remaining <= 0.0 {
                expired.push(marker.id);
                false
            } else {
                true
            }
        });

        if !expired.is_empty() {
            for set in self.inside.values_mut() {
                for id in &expired {
                    set.remove(id);
                }
            }
        }
    }

    /// Report a newly entered marker for this agent, if any
    ///
    /// Containment is tracked per agent so a marker fires once on entry
    /// and can fire again only after the agent leaves it.
    pub fn sense(&mut self, agent: EntityId, position: Vec3) -> Option<Vec3> {
        let inside = self.inside.entry(agent).or_default();
        let mut entered = None;

        for marker in &self.markers {
            if marker.volume.contains_point(position) {
                if inside.insert(marker.id) && entered.is_none() {
                    entered = Some(marker.volume.center);
                }
            } else {
                inside.remove(&marker.id);
            }
        }

        entered
    }

    /// Forget containment state for a despawned agent
    pub fn forget(&mut self, agent: EntityId) {
        self.inside.remove(&agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: EntityId = EntityId::new(0, 0);

    #[test]
    fn test_entry_fires_once() {
        let mut field = ScentField::new();
        field.add_marker(Vec3::ZERO, 2.0, None);

        assert_eq!(field.sense(AGENT, Vec3::new(1.0, 0.0, 0.0)), Some(Vec3::ZERO));
        // Still inside: no repeat
        assert_eq!(field.sense(AGENT, Vec3::new(0.5, 0.0, 0.0)), None);
    }

    #[test]
    fn test_reentry_fires_again() {
        let mut field = ScentField::new();
        field.add_marker(Vec3::ZERO, 2.0, None);

        assert!(field.sense(AGENT, Vec3::ZERO).is_some());
        assert_eq!(field.sense(AGENT, Vec3::new(5.0, 0.0, 0.0)), None);
        assert!(field.sense(AGENT, Vec3::ZERO).is_some());
    }

    #[test]
    fn test_agents_tracked_independently() {
        let mut field = ScentField::new();
        field.add_marker(Vec3::ZERO, 2.0, None);
        let other = EntityId::new(1, 0);

        assert!(field.sense(AGENT, Vec3::ZERO).is_some());
        assert!(field.sense(other, Vec3::ZERO).is_some());
    }

    #[test]
    fn test_markers_expire() {
        let mut field = ScentField::new();
        field.add_marker(Vec3::ZERO, 2.0, Some(1.0));
        assert_eq!(field.len(), 1);

        field.update(0.5);
        assert_eq!(field.len(), 1);
        field.update(0.6);
        assert!(field.is_empty());
        assert_eq!(field.sense(AGENT, Vec3::ZERO), None);
    }

    #[test]
    fn test_expired_marker_allows_fresh_entry() {
        let mut field = ScentField::new();
        field.add_marker(Vec3::ZERO, 2.0, Some(1.0));
        assert!(field.sense(AGENT, Vec3::ZERO).is_some());

        field.update(2.0);
        // New marker at the same spot fires even though the agent never moved
        field.add_marker(Vec3::ZERO, 2.0, None);
        assert!(field.sense(AGENT, Vec3::ZERO).is_some());
    }
}
