//! Core primitives shared across the Shamble simulation crates.
//!
//! Provides entity identifiers with generational indices, entity
//! categories used for perception and peer filtering, and the
//! fire-and-forget observability event channel.

pub mod events;
pub mod id;

pub use events::{EventSink, LogSink, NullSink, RecordingSink, SimEvent};
pub use id::{Category, EntityId, IdGenerator};
