//! Spawning system - slimes split off small offspring

use hecs::{Entity, World};

use crate::archetypes::{spawn_slime, SlimeParams};
use crate::components::{Action, MobType, Position};

/// Phase 5: each slime with a `Spawn` action creates a small slime at (-1, -1)
/// from itself. Offspring start in their small state.
pub fn spawn_system(world: &mut World) -> Vec<Entity> {
    let origins: Vec<Position> = world
        .query::<(&MobType, &Action, &Position)>()
        .iter()
        .filter(|(_, (mob_type, action, _))| **mob_type == MobType::Slime && **action == Action::Spawn)
        .map(|(_, (_, _, pos))| *pos)
        .collect();

    let params = SlimeParams {
        small: true,
        ..SlimeParams::default()
    };

    origins
        .into_iter()
        .map(|origin| {
            let at = origin.offset(-1, -1);
            let child = spawn_slime(world, at.x, at.y, &params);
            log::info!("slime split at ({}, {}) -> {:?}", at.x, at.y, child);
            child
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::StateMachine;

    #[test]
    fn test_only_spawning_slimes_split() {
        let mut world = World::new();
        world.spawn((MobType::Slime, Action::Spawn, Position::new(2, 2)));
        world.spawn((MobType::Slime, Action::MoveLeft, Position::new(5, 5)));
        world.spawn((MobType::Human, Action::Spawn, Position::new(9, 9)));

        let spawned = spawn_system(&mut world);

        assert_eq!(spawned.len(), 1);
        let child = spawned[0];
        assert_eq!(*world.get::<&Position>(child).unwrap(), Position::new(1, 1));
        assert_eq!(*world.get::<&Action>(child).unwrap(), Action::Nop);
        let sm = world.get::<&StateMachine>(child).unwrap();
        assert_eq!(sm.active_path(), vec!["small_slime", "patrol"]);
    }
}
