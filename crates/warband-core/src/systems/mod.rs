//! Systems - turn resolution phases that operate on components
//!
//! Every phase reads a snapshot of what it needs, decides, and only then
//! writes. Nothing a phase writes is visible to its own decisions.

mod actions;
mod combat;
mod death;
mod healing;
mod movement;
mod needs;
mod pickups;
mod spawning;

pub use actions::*;
pub use combat::*;
pub use death::*;
pub use healing::*;
pub use movement::*;
pub use needs::*;
pub use pickups::*;
pub use spawning::*;

use hecs::Entity;

/// Damage applied to one entity by another during a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
}

/// Apply a batch of hits collected during a scan
fn apply_hits(world: &mut hecs::World, hits: &[Hit]) {
    for hit in hits {
        if let Ok(mut hp) = world.get::<&mut crate::components::Hitpoints>(hit.target) {
            hp.0 -= hit.damage;
        }
    }
}
