//! Combat-related components: hitpoints, teams, damage and healing stats.

use serde::{Deserialize, Serialize};

/// Remaining health - the entity is destroyed at the end of a turn once this is <= 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitpoints(pub f32);

/// Faction id. Entities on different teams are enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team(pub i32);

impl Team {
    pub const PLAYER: Team = Team(0);
    pub const HOSTILE: Team = Team(1);
    pub const NEUTRAL: Team = Team(2);
}

/// Damage dealt when bumping into an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeleeDamage(pub f32);

/// Damage dealt to every enemy in range by an attack action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedDamage(pub f32);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedAttackRange(pub f32);

/// Hitpoints restored by a heal action, or by stepping onto a heal pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealAmount(pub f32);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealRange(pub f32);

/// Ticks left before the healer may heal again
///
/// `current` counts down every turn, heal or not, and may go negative while
/// the healer is busy doing something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealCooldown {
    pub current: i32,
    pub cooldown: i32,
}

impl HealCooldown {
    pub fn new(current: i32, cooldown: i32) -> Self {
        Self { current, cooldown }
    }

    pub fn ready(&self) -> bool {
        self.current <= 0
    }

    pub fn reset(&mut self) {
        self.current = self.cooldown;
    }
}

/// Melee damage granted by a powerup pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerupAmount(pub f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heal_cooldown() {
        let mut cd = HealCooldown::new(1, 5);
        assert!(!cd.ready());
        cd.current -= 1;
        assert!(cd.ready());
        cd.reset();
        assert_eq!(cd.current, 5);
    }
}
