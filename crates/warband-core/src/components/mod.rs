//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems and in the AI states.

mod actor;
mod combat;
mod common;

pub use actor::*;
pub use combat::*;
pub use common::*;
