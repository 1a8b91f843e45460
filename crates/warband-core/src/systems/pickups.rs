//! Pickup system - the player collects items on its cell

use hecs::{Entity, World};

use crate::components::{
    HealAmount, Hitpoints, IsPickup, IsPlayer, MeleeDamage, Position, PowerupAmount,
};

/// What a consumed pickup granted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupEffect {
    Heal(f32),
    Powerup(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub player: Entity,
    pub pickup: Entity,
    pub effect: PickupEffect,
}

/// Phase 7: heal and powerup pickups under the player are applied and removed
pub fn pickup_system(world: &mut World) -> Vec<Pickup> {
    let players: Vec<(Entity, Position)> = world
        .query::<(&IsPlayer, &Position)>()
        .iter()
        .map(|(entity, (_, pos))| (entity, *pos))
        .collect();

    let mut taken = Vec::new();
    for (player, player_pos) in players {
        for (pickup, (_, pos, amount)) in world.query::<(&IsPickup, &Position, &HealAmount)>().iter() {
            if *pos == player_pos && !taken.iter().any(|t: &Pickup| t.pickup == pickup) {
                taken.push(Pickup {
                    player,
                    pickup,
                    effect: PickupEffect::Heal(amount.0),
                });
            }
        }
        for (pickup, (_, pos, amount)) in
            world.query::<(&IsPickup, &Position, &PowerupAmount)>().iter()
        {
            if *pos == player_pos && !taken.iter().any(|t: &Pickup| t.pickup == pickup) {
                taken.push(Pickup {
                    player,
                    pickup,
                    effect: PickupEffect::Powerup(amount.0),
                });
            }
        }
    }

    for item in &taken {
        match item.effect {
            PickupEffect::Heal(amount) => {
                if let Ok(mut hp) = world.get::<&mut Hitpoints>(item.player) {
                    hp.0 += amount;
                }
            }
            PickupEffect::Powerup(amount) => {
                if let Ok(mut dmg) = world.get::<&mut MeleeDamage>(item.player) {
                    dmg.0 += amount;
                }
            }
        }
        if world.despawn(item.pickup).is_ok() {
            log::info!("player picked up {:?}", item.effect);
        }
    }

    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(world: &mut World, x: i32, y: i32) -> Entity {
        world.spawn((IsPlayer, Position::new(x, y), Hitpoints(80.0), MeleeDamage(50.0)))
    }

    #[test]
    fn test_heal_pickup_consumed() {
        let mut world = World::new();
        let p = player(&mut world, 5, 5);
        let heal = world.spawn((IsPickup, Position::new(5, 5), HealAmount(20.0)));

        let taken = pickup_system(&mut world);

        assert_eq!(taken.len(), 1);
        assert_eq!(world.get::<&Hitpoints>(p).unwrap().0, 100.0);
        assert!(!world.contains(heal));
    }

    #[test]
    fn test_powerup_pickup_raises_melee() {
        let mut world = World::new();
        let p = player(&mut world, 7, 7);
        let power = world.spawn((IsPickup, Position::new(7, 7), PowerupAmount(10.0)));

        pickup_system(&mut world);

        assert_eq!(world.get::<&MeleeDamage>(p).unwrap().0, 60.0);
        assert!(!world.contains(power));
    }

    #[test]
    fn test_pickups_elsewhere_and_healers_untouched() {
        let mut world = World::new();
        let p = player(&mut world, 0, 0);
        let elsewhere = world.spawn((IsPickup, Position::new(1, 0), HealAmount(20.0)));
        // a healer standing on the same cell is not a pickup
        let healer = world.spawn((Position::new(0, 0), HealAmount(15.0)));

        assert!(pickup_system(&mut world).is_empty());
        assert_eq!(world.get::<&Hitpoints>(p).unwrap().0, 80.0);
        assert!(world.contains(elsewhere));
        assert!(world.contains(healer));
    }

    #[test]
    fn test_pickup_consumed_once() {
        let mut world = World::new();
        let p = player(&mut world, 2, 2);
        let combo = world.spawn((IsPickup, Position::new(2, 2), HealAmount(5.0), PowerupAmount(5.0)));

        let taken = pickup_system(&mut world);

        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].pickup, combo);
        assert_eq!(world.get::<&Hitpoints>(p).unwrap().0, 85.0);
        assert_eq!(world.get::<&MeleeDamage>(p).unwrap().0, 50.0);
        assert!(!world.contains(combo));
        assert!(pickup_system(&mut world).is_empty());
    }
}
