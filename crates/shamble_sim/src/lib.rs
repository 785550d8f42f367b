//! # shamble_sim - Horde simulation assembly
//!
//! Owns the world: the walkable surface, occluders, the scent field,
//! the player and the horde. [`Simulation::tick`] advances everything
//! in a fixed order and fans sighting alerts out between agents.

pub mod player;
pub mod simulation;
pub mod spawner;

pub use player::{Player, ScentTrail};
pub use simulation::{Simulation, Zombie};
pub use spawner::SpawnArea;
