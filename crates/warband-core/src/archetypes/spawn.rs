//! Entity factories for every archetype.

use hecs::{Entity, EntityBuilder, World};
use serde::{Deserialize, Serialize};

use super::brains::{self, CrafterNeeds, CrafterStations};
use crate::ai::StateMachine;
use crate::components::*;
use crate::error::AssemblyError;

/// Which prebuilt machine a plain monster gets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterBrain {
    #[default]
    PatrolAttackFlee,
    PatrolFlee,
    Attack,
}

impl MonsterBrain {
    pub fn build(self) -> StateMachine {
        match self {
            MonsterBrain::PatrolAttackFlee => brains::patrol_attack_flee(),
            MonsterBrain::PatrolFlee => brains::patrol_flee(),
            MonsterBrain::Attack => brains::attack(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerParams {
    pub hitpoints: f32,
    pub melee_damage: f32,
    /// World ticks per full turn
    pub actions_per_turn: u32,
    pub color: Appearance,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            hitpoints: 100.0,
            melee_damage: 50.0,
            actions_per_turn: 2,
            color: Appearance::from_hex(0xeeeeeeff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterParams {
    pub hitpoints: f32,
    pub melee_damage: f32,
    pub team: i32,
    pub brain: MonsterBrain,
    pub color: Appearance,
}

impl Default for MonsterParams {
    fn default() -> Self {
        Self {
            hitpoints: 100.0,
            melee_damage: 20.0,
            team: Team::HOSTILE.0,
            brain: MonsterBrain::default(),
            color: Appearance::from_hex(0xee00eeff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlimeParams {
    pub hitpoints: f32,
    pub melee_damage: f32,
    pub team: i32,
    /// Start already split, so it never spawns offspring
    pub small: bool,
    pub color: Appearance,
}

impl Default for SlimeParams {
    fn default() -> Self {
        Self {
            hitpoints: 80.0,
            melee_damage: 10.0,
            team: Team::HOSTILE.0,
            small: false,
            color: Appearance::from_hex(0x0000eeff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcherParams {
    pub hitpoints: f32,
    pub ranged_damage: f32,
    pub range: f32,
    pub team: i32,
    pub color: Appearance,
}

impl Default for ArcherParams {
    fn default() -> Self {
        Self {
            hitpoints: 100.0,
            ranged_damage: 10.0,
            range: 5.0,
            team: Team::HOSTILE.0,
            color: Appearance::from_hex(0xee00eeff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealerParams {
    pub hitpoints: f32,
    pub melee_damage: f32,
    pub heal_amount: f32,
    pub heal_range: f32,
    pub cooldown: i32,
    pub team: i32,
    pub color: Appearance,
}

impl Default for HealerParams {
    fn default() -> Self {
        Self {
            hitpoints: 100.0,
            melee_damage: 20.0,
            heal_amount: 15.0,
            heal_range: 1.0,
            cooldown: 5,
            team: Team::PLAYER.0,
            color: Appearance::from_hex(0x00ee00ff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrafterParams {
    pub hitpoints: f32,
    pub team: i32,
    pub hunger_max: i32,
    pub fatigue_max: i32,
    pub needs: CrafterNeeds,
    pub stations: CrafterStations,
    pub color: Appearance,
}

impl Default for CrafterParams {
    fn default() -> Self {
        Self {
            hitpoints: 100.0,
            team: Team::NEUTRAL.0,
            hunger_max: 100,
            fatigue_max: 200,
            needs: CrafterNeeds::default(),
            stations: CrafterStations::default(),
            color: Appearance::from_hex(0xcc8833ff),
        }
    }
}

/// Components every AI mob shares
fn mob_base(
    pos: Position,
    hitpoints: f32,
    melee_damage: f32,
    team: i32,
    mob_type: MobType,
    color: Appearance,
) -> EntityBuilder {
    let mut builder = EntityBuilder::new();
    builder
        .add(pos)
        .add(MovePos(pos))
        .add(PatrolPos(pos))
        .add(Hitpoints(hitpoints))
        .add(Action::Nop)
        .add(color)
        .add(Team(team))
        .add(NumActions::new(1))
        .add(MeleeDamage(melee_damage))
        .add(IsMob)
        .add(mob_type);
    builder
}

/// Attach (or replace) the state machine driving an entity
pub fn attach_machine(
    world: &mut World,
    entity: Entity,
    machine: StateMachine,
) -> Result<(), AssemblyError> {
    world
        .insert_one(entity, machine)
        .map_err(|_| AssemblyError::NoSuchEntity(entity))
}

pub fn spawn_player(world: &mut World, x: i32, y: i32, params: &PlayerParams) -> Entity {
    let pos = Position::new(x, y);
    let entity = world.spawn((
        pos,
        MovePos(pos),
        Hitpoints(params.hitpoints),
        params.color,
        Action::Nop,
        IsPlayer,
        Team::PLAYER,
        NumActions::new(params.actions_per_turn),
        MeleeDamage(params.melee_damage),
        IsMob,
    ));
    log::debug!("spawned player {:?} at ({}, {})", entity, x, y);
    entity
}

/// Plain monster with the brain named in `params`
pub fn spawn_monster(world: &mut World, x: i32, y: i32, params: &MonsterParams) -> Entity {
    let mut builder = mob_base(
        Position::new(x, y),
        params.hitpoints,
        params.melee_damage,
        params.team,
        MobType::Human,
        params.color,
    );
    builder.add(params.brain.build());
    world.spawn(builder.build())
}

pub fn spawn_slime(world: &mut World, x: i32, y: i32, params: &SlimeParams) -> Entity {
    let mut builder = mob_base(
        Position::new(x, y),
        params.hitpoints,
        params.melee_damage,
        params.team,
        MobType::Slime,
        params.color,
    );
    builder.add(brains::slime(params.small));
    world.spawn(builder.build())
}

pub fn spawn_archer(world: &mut World, x: i32, y: i32, params: &ArcherParams) -> Entity {
    let mut builder = mob_base(
        Position::new(x, y),
        params.hitpoints,
        0.0,
        params.team,
        MobType::Archer,
        params.color,
    );
    builder
        .add(RangedDamage(params.ranged_damage))
        .add(RangedAttackRange(params.range))
        .add(brains::archer());
    world.spawn(builder.build())
}

pub fn spawn_healer(world: &mut World, x: i32, y: i32, params: &HealerParams) -> Entity {
    let mut builder = mob_base(
        Position::new(x, y),
        params.hitpoints,
        params.melee_damage,
        params.team,
        MobType::Healer,
        params.color,
    );
    builder
        .add(HealAmount(params.heal_amount))
        .add(HealRange(params.heal_range))
        .add(HealCooldown::new(params.cooldown, params.cooldown))
        .add(brains::healer());
    world.spawn(builder.build())
}

pub fn spawn_crafter(world: &mut World, x: i32, y: i32, params: &CrafterParams) -> Entity {
    let mut builder = mob_base(
        Position::new(x, y),
        params.hitpoints,
        0.0,
        params.team,
        MobType::Crafter,
        params.color,
    );
    builder
        .add(Hunger::new(params.hunger_max))
        .add(Fatigue::new(params.fatigue_max))
        .add(brains::crafter(&params.stations, params.needs));
    world.spawn(builder.build())
}

pub fn spawn_heal_pickup(world: &mut World, x: i32, y: i32, amount: f32) -> Entity {
    world.spawn((
        Position::new(x, y),
        HealAmount(amount),
        Appearance::from_hex(0x44ff44ff),
        IsPickup,
    ))
}

pub fn spawn_powerup_pickup(world: &mut World, x: i32, y: i32, amount: f32) -> Entity {
    world.spawn((
        Position::new(x, y),
        PowerupAmount(amount),
        Appearance::from_hex(0xffff00ff),
        IsPickup,
    ))
}
