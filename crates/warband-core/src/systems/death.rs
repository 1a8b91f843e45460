//! Death system - removes entities that ran out of hitpoints

use hecs::{Entity, World};

use crate::components::Hitpoints;

/// Phase 6: despawn every entity with hitpoints <= 0, whatever the cause
pub fn death_system(world: &mut World) -> Vec<Entity> {
    let dead: Vec<Entity> = world
        .query::<&Hitpoints>()
        .iter()
        .filter(|(_, hp)| hp.0 <= 0.0)
        .map(|(entity, _)| entity)
        .collect();

    for &entity in &dead {
        if world.despawn(entity).is_ok() {
            log::info!("{:?} died", entity);
        }
    }

    dead
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_non_positive_hitpoints() {
        let mut world = World::new();
        let alive = world.spawn((Hitpoints(0.5),));
        let zero = world.spawn((Hitpoints(0.0),));
        let negative = world.spawn((Hitpoints(-12.0),));
        let pickup = world.spawn((crate::components::IsPickup,));

        let dead = death_system(&mut world);

        assert_eq!(dead.len(), 2);
        assert!(world.contains(alive));
        assert!(world.contains(pickup));
        assert!(!world.contains(zero));
        assert!(!world.contains(negative));
    }
}
