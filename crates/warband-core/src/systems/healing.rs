//! Healing system - healers restore hitpoints of nearby allies

use hecs::{Entity, World};

use crate::components::{
    Action, HealAmount, HealCooldown, HealRange, Hitpoints, Position, Team,
};

/// One heal application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heal {
    pub healer: Entity,
    pub target: Entity,
    pub amount: f32,
}

/// Phase 3: tick cooldowns and resolve heal actions.
///
/// Every healer's cooldown drops by one each turn. A ready healer whose action
/// is `Heal` heals every same-team entity in range, itself included, and each
/// heal resets the cooldown.
pub fn healing_system(world: &mut World) -> Vec<Heal> {
    let allies: Vec<(Entity, Position, Team)> = world
        .query::<(&Position, &Team, &Hitpoints)>()
        .iter()
        .map(|(entity, (pos, team, _))| (entity, *pos, *team))
        .collect();

    let mut heals = Vec::new();
    for (healer, (team, action, amount, range, cooldown, pos)) in world.query_mut::<(
        &Team,
        &Action,
        &HealAmount,
        &HealRange,
        &mut HealCooldown,
        &Position,
    )>() {
        cooldown.current -= 1;
        if !cooldown.ready() || *action != Action::Heal {
            continue;
        }

        for (target, target_pos, target_team) in &allies {
            if target_team != team || target_pos.distance(pos) > range.0 {
                continue;
            }
            heals.push(Heal {
                healer,
                target: *target,
                amount: amount.0,
            });
            cooldown.reset();
        }
    }

    for heal in &heals {
        if let Ok(mut hp) = world.get::<&mut Hitpoints>(heal.target) {
            hp.0 += heal.amount;
        }
    }

    for heal in &heals {
        log::debug!("{:?} heals {:?} for {}", heal.healer, heal.target, heal.amount);
    }

    heals
}
