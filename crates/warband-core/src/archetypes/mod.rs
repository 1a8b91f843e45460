//! Archetypes - recipes for building entities and wiring their state machines.
//!
//! The factories construct entities with their component sets; [`brains`] builds
//! the state machines those entities carry.

pub mod brains;
mod spawn;

pub use brains::{CrafterNeeds, CrafterStations};
pub use spawn::*;
