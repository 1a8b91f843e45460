//! Combat system - ranged area attacks

use hecs::{Entity, World};

use super::{apply_hits, Hit};
use crate::components::{Action, Hitpoints, Position, RangedAttackRange, RangedDamage, Team};

/// Phase 4: every ranged attacker with an `Attack` action damages all
/// enemies within range.
pub fn ranged_attack_system(world: &mut World) -> Vec<Hit> {
    let targets: Vec<(Entity, Position, Team)> = world
        .query::<(&Position, &Team, &Hitpoints)>()
        .iter()
        .map(|(entity, (pos, team, _))| (entity, *pos, *team))
        .collect();

    let mut hits = Vec::new();
    for (attacker, (dmg, range, action, team, pos)) in world
        .query::<(&RangedDamage, &RangedAttackRange, &Action, &Team, &Position)>()
        .iter()
    {
        if *action != Action::Attack {
            continue;
        }

        for (target, target_pos, target_team) in &targets {
            if target_team == team {
                continue; // ally
            }
            if target_pos.distance(pos) > range.0 {
                continue; // out of range
            }
            hits.push(Hit {
                attacker,
                target: *target,
                damage: dmg.0,
            });
        }
    }

    apply_hits(world, &hits);
    if !hits.is_empty() {
        log::debug!("ranged attacks: {} hits", hits.len());
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archer(world: &mut World, action: Action) -> Entity {
        world.spawn((
            Position::new(0, 0),
            Team(1),
            Hitpoints(100.0),
            action,
            RangedDamage(10.0),
            RangedAttackRange(5.0),
        ))
    }

    #[test]
    fn test_area_damage_to_all_enemies_in_range() {
        let mut world = World::new();
        archer(&mut world, Action::Attack);
        let near = world.spawn((Position::new(3, 4), Team(0), Hitpoints(50.0)));
        let also_near = world.spawn((Position::new(-1, 0), Team(2), Hitpoints(50.0)));
        let far = world.spawn((Position::new(4, 4), Team(0), Hitpoints(50.0)));
        let ally = world.spawn((Position::new(1, 0), Team(1), Hitpoints(50.0)));

        let hits = ranged_attack_system(&mut world);

        assert_eq!(hits.len(), 2);
        assert_eq!(world.get::<&Hitpoints>(near).unwrap().0, 40.0);
        assert_eq!(world.get::<&Hitpoints>(also_near).unwrap().0, 40.0);
        assert_eq!(world.get::<&Hitpoints>(far).unwrap().0, 50.0);
        assert_eq!(world.get::<&Hitpoints>(ally).unwrap().0, 50.0);
    }

    #[test]
    fn test_no_attack_action_no_damage() {
        let mut world = World::new();
        archer(&mut world, Action::MoveLeft);
        let near = world.spawn((Position::new(1, 0), Team(0), Hitpoints(50.0)));

        assert!(ranged_attack_system(&mut world).is_empty());
        assert_eq!(world.get::<&Hitpoints>(near).unwrap().0, 50.0);
    }
}
