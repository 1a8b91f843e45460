//! Needs system - hunger and fatigue counters

use hecs::World;

use crate::components::{Action, Fatigue, Hunger};

/// Phase 8: counters grow by one per turn.
///
/// Eating resets hunger and sleeping resets fatigue instead. Running past the
/// maximum has no gameplay effect beyond a warning and the FSM guards that
/// read these counters.
pub fn needs_system(world: &mut World) {
    for (entity, (hunger, action)) in world.query_mut::<(&mut Hunger, Option<&Action>)>() {
        if action == Some(&Action::Eat) {
            hunger.current = 0;
            continue;
        }
        hunger.current += 1;
        if hunger.exceeded() {
            log::warn!("{:?} is starving ({}/{})", entity, hunger.current, hunger.max);
        }
    }

    for (entity, (fatigue, action)) in world.query_mut::<(&mut Fatigue, Option<&Action>)>() {
        if action == Some(&Action::Sleep) {
            fatigue.current = 0;
            continue;
        }
        fatigue.current += 1;
        if fatigue.exceeded() {
            log::warn!("{:?} is exhausted ({}/{})", entity, fatigue.current, fatigue.max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_grow_each_turn() {
        let mut world = World::new();
        let e = world.spawn((Hunger::new(10), Fatigue::new(10), Action::MoveLeft));

        needs_system(&mut world);
        needs_system(&mut world);

        assert_eq!(world.get::<&Hunger>(e).unwrap().current, 2);
        assert_eq!(world.get::<&Fatigue>(e).unwrap().current, 2);
    }

    #[test]
    fn test_counters_pass_max_without_clamping() {
        let mut world = World::new();
        let e = world.spawn((Hunger { current: 10, max: 10 },));
        needs_system(&mut world);
        let hunger = *world.get::<&Hunger>(e).unwrap();
        assert_eq!(hunger.current, 11);
        assert!(hunger.exceeded());
    }

    #[test]
    fn test_eat_and_sleep_reset() {
        let mut world = World::new();
        let eater = world.spawn((Hunger { current: 50, max: 100 }, Fatigue { current: 7, max: 100 }, Action::Eat));
        let sleeper = world.spawn((Hunger { current: 5, max: 100 }, Fatigue { current: 90, max: 100 }, Action::Sleep));

        needs_system(&mut world);

        assert_eq!(world.get::<&Hunger>(eater).unwrap().current, 0);
        assert_eq!(world.get::<&Fatigue>(eater).unwrap().current, 8);
        assert_eq!(world.get::<&Hunger>(sleeper).unwrap().current, 6);
        assert_eq!(world.get::<&Fatigue>(sleeper).unwrap().current, 0);
    }
}
