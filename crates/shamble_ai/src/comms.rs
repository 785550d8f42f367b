//! Peer alert broadcasting
//!
//! A sighting is fanned out synchronously to peers inside the sender's
//! broadcast radius. The hub only selects recipients; actual delivery
//! goes through a caller-supplied closure so the hub never needs access
//! to peer controllers. Receivers never re-broadcast, which bounds every
//! sighting to a single fan-out.

use serde::{Deserialize, Serialize};
use shamble_core::{Category, EntityId};
use shamble_math::Vec3;

/// A broadcast target sighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Agent that made the sighting
    pub sender: EntityId,
    /// Where the target was seen
    pub position: Vec3,
}

/// An entity returned from a spatial query
#[derive(Debug, Clone, Copy)]
pub struct EntityRef {
    pub entity: EntityId,
    pub position: Vec3,
}

/// Spatial access the hub needs to select recipients
pub trait SpatialQuery {
    /// Entities of a category within `radius` of `center`
    fn query_by_category(&self, category: Category, center: Vec3, radius: f32) -> Vec<EntityRef>;
}

/// Alert fan-out over a spatial index
#[derive(Debug, Clone, Copy)]
pub struct CommsHub {
    /// Category of agents that receive alerts
    peer_category: Category,
}

impl CommsHub {
    pub fn new(peer_category: Category) -> Self {
        Self { peer_category }
    }

    /// Deliver an alert to every capable peer in range of the sender
    ///
    /// `deliver` is called once per candidate peer and returns whether
    /// the peer accepted the alert; peers without the capability simply
    /// return false and are not counted. Returns the number of peers
    /// notified.
    pub fn publish<F>(
        &self,
        spatial: &dyn SpatialQuery,
        sender_position: Vec3,
        range: f32,
        alert: Alert,
        mut deliver: F,
    ) -> usize
    where
        F: FnMut(EntityId, &Alert) -> bool,
    {
        if range <= 0.0 {
            return 0;
        }

        let mut notified = 0;
        for peer in spatial.query_by_category(self.peer_category, sender_position, range) {
            if peer.entity == alert.sender {
                continue;
            }
            if deliver(peer.entity, &alert) {
                notified += 1;
            }
        }

        if notified > 0 {
            log::debug!(
                "agent {} alerted {} peers near {:?}",
                alert.sender,
                notified,
                alert.position
            );
        }
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixtureSpatial {
        peers: Vec<EntityRef>,
    }

    impl SpatialQuery for FixtureSpatial {
        fn query_by_category(
            &self,
            _category: Category,
            center: Vec3,
            radius: f32,
        ) -> Vec<EntityRef> {
            self.peers
                .iter()
                .copied()
                .filter(|p| p.position.distance(center) <= radius)
                .collect()
        }
    }

    fn peer(index: u32, x: f32) -> EntityRef {
        EntityRef {
            entity: EntityId::new(index, 0),
            position: Vec3::new(x, 0.0, 0.0),
        }
    }

    #[test]
    fn test_publishes_to_peers_in_range() {
        let spatial = FixtureSpatial {
            peers: vec![peer(0, 0.0), peer(1, 5.0), peer(2, 40.0)],
        };
        let hub = CommsHub::new(Category::Zombie);
        let alert = Alert {
            sender: EntityId::new(0, 0),
            position: Vec3::new(1.0, 0.0, 1.0),
        };

        let mut delivered = Vec::new();
        let notified = hub.publish(&spatial, Vec3::ZERO, 15.0, alert, |id, _| {
            delivered.push(id);
            true
        });

        // Sender excluded, out-of-range peer excluded
        assert_eq!(notified, 1);
        assert_eq!(delivered, vec![EntityId::new(1, 0)]);
    }

    #[test]
    fn test_incapable_peers_not_counted() {
        let spatial = FixtureSpatial {
            peers: vec![peer(1, 2.0), peer(2, 3.0)],
        };
        let hub = CommsHub::new(Category::Zombie);
        let alert = Alert {
            sender: EntityId::new(0, 0),
            position: Vec3::ZERO,
        };

        let notified = hub.publish(&spatial, Vec3::ZERO, 15.0, alert, |id, _| {
            id == EntityId::new(2, 0)
        });
        assert_eq!(notified, 1);
    }

    #[test]
    fn test_zero_range_disables_broadcast() {
        let spatial = FixtureSpatial {
            peers: vec![peer(1, 0.0)],
        };
        let hub = CommsHub::new(Category::Zombie);
        let alert = Alert {
            sender: EntityId::new(0, 0),
            position: Vec3::ZERO,
        };
        let notified = hub.publish(&spatial, Vec3::ZERO, 0.0, alert, |_, _| true);
        assert_eq!(notified, 0);
    }
}
