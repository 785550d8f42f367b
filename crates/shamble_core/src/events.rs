//! Simulation observability events
//!
//! Events are fire-and-forget: a sink may drop, buffer, or log them, but
//! it can never fail the simulation. Positions are plain arrays so sinks
//! can be wired up without depending on the math crate.

use crate::id::EntityId;
use serde::Serialize;

/// An observable simulation event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    /// An agent changed behavior state
    StateChanged {
        agent: EntityId,
        from: &'static str,
        to: &'static str,
    },
    /// An agent sighted the target through its vision sensor
    TargetSighted {
        agent: EntityId,
        position: [f32; 3],
    },
    /// An agent entered a scent volume
    ScentContact {
        agent: EntityId,
        position: [f32; 3],
    },
    /// An agent broadcast a sighting to nearby peers
    AlertBroadcast {
        agent: EntityId,
        position: [f32; 3],
        notified: usize,
    },
    /// An agent detected a navigation stall and rerouted
    StuckRecovery { agent: EntityId },
}

/// Sink for simulation events
///
/// Implementations must be infallible; there is nothing the simulation
/// could do about a failed notification.
pub trait EventSink {
    /// Receive a single event
    fn notify(&mut self, event: SimEvent);
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _event: SimEvent) {}
}

/// Sink that records events in memory, mainly for tests and tooling
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Events in arrival order
    pub events: Vec<SimEvent>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Count events matching a predicate
    pub fn count_matching(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn notify(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

/// Sink that forwards events to the `log` crate at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&mut self, event: SimEvent) {
        match &event {
            SimEvent::StateChanged { agent, from, to } => {
                log::debug!("agent {} state {} -> {}", agent, from, to);
            }
            SimEvent::TargetSighted { agent, .. } => {
                log::debug!("agent {} sighted target", agent);
            }
            SimEvent::ScentContact { agent, .. } => {
                log::debug!("agent {} picked up scent", agent);
            }
            SimEvent::AlertBroadcast {
                agent, notified, ..
            } => {
                log::debug!("agent {} notified {} nearby peers", agent, notified);
            }
            SimEvent::StuckRecovery { agent } => {
                log::debug!("agent {} got stuck, rerouting", agent);
            }
        }
    }
}
