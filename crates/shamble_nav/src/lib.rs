//! # shamble_nav - Navigation for simulation agents
//!
//! The navigation collaborator consumed by the behavior engine:
//!
//! - [`NavSurface`]: the traversable region, a walkable cell grid with
//!   point sampling and A* paths between cells
//! - [`NavAgent`]: per-agent destination requests, readable path state
//!   and per-tick movement integration

pub mod agent;
pub mod surface;

pub use agent::NavAgent;
pub use surface::{NavPath, NavSurface};
