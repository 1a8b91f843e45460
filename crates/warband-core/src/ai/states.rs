//! Behaviour states - each `act` writes only the entity's pending action.

use hecs::{Entity, World};
use rand::RngCore;

use super::machine::StateMachine;
use crate::components::{Action, IsPlayer, PatrolPos, Position, Team};
use crate::geometry::{inverse_move, move_towards};

/// One behaviour unit of a [`StateMachine`]
///
/// `enter` and `exit` are called whenever an edge fires. `act` may only touch
/// the `action` it is handed; the world is read-only.
pub trait State: Send + Sync {
    /// Short label used in logs and debug views
    fn name(&self) -> &'static str;

    fn enter(&mut self) {}

    fn exit(&mut self) {}

    fn act(
        &mut self,
        dt: f32,
        world: &World,
        entity: Entity,
        rng: &mut dyn RngCore,
        action: &mut Action,
    );

    /// The wrapped machine, for states that nest one
    fn as_machine(&self) -> Option<&StateMachine> {
        None
    }
}

/// Position of the nearest entity on another team.
///
/// Ties go to the first one the query yields. `None` when the subject has no
/// position/team or there are no enemies at all.
pub fn closest_enemy(world: &World, entity: Entity) -> Option<(Position, Position)> {
    let (pos, team) = match (world.get::<&Position>(entity), world.get::<&Team>(entity)) {
        (Ok(pos), Ok(team)) => (*pos, *team),
        _ => return None,
    };

    let mut closest: Option<(f32, Position)> = None;
    for (_, (enemy_pos, enemy_team)) in world.query::<(&Position, &Team)>().iter() {
        if *enemy_team == team {
            continue;
        }
        let dist = enemy_pos.distance(&pos);
        if closest.map_or(true, |(best, _)| dist < best) {
            closest = Some((dist, *enemy_pos));
        }
    }

    closest.map(|(_, enemy_pos)| (pos, enemy_pos))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AttackEnemy;

impl State for AttackEnemy {
    fn name(&self) -> &'static str {
        "attack_enemy"
    }

    fn act(&mut self, _: f32, _: &World, _: Entity, _: &mut dyn RngCore, action: &mut Action) {
        *action = Action::Attack;
    }
}

/// Step towards the nearest enemy; leaves the action alone when there is none
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveToEnemy;

impl State for MoveToEnemy {
    fn name(&self) -> &'static str {
        "move_to_enemy"
    }

    fn act(&mut self, _: f32, world: &World, entity: Entity, _: &mut dyn RngCore, action: &mut Action) {
        if let Some((pos, enemy_pos)) = closest_enemy(world, entity) {
            *action = move_towards(&pos, &enemy_pos);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveToPlayer;

impl State for MoveToPlayer {
    fn name(&self) -> &'static str {
        "move_to_player"
    }

    fn act(&mut self, _: f32, world: &World, entity: Entity, _: &mut dyn RngCore, action: &mut Action) {
        let Ok(pos) = world.get::<&Position>(entity).map(|p| *p) else {
            return;
        };
        if let Some((_, (_, player_pos))) = world.query::<(&IsPlayer, &Position)>().iter().next() {
            *action = move_towards(&pos, player_pos);
        }
    }
}

/// Step directly away from the nearest enemy
#[derive(Debug, Clone, Copy, Default)]
pub struct FleeFromEnemy;

impl State for FleeFromEnemy {
    fn name(&self) -> &'static str {
        "flee_from_enemy"
    }

    fn act(&mut self, _: f32, world: &World, entity: Entity, _: &mut dyn RngCore, action: &mut Action) {
        if let Some((pos, enemy_pos)) = closest_enemy(world, entity) {
            *action = inverse_move(move_towards(&pos, &enemy_pos));
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Healing;

impl State for Healing {
    fn name(&self) -> &'static str {
        "healing"
    }

    fn act(&mut self, _: f32, _: &World, _: Entity, _: &mut dyn RngCore, action: &mut Action) {
        *action = Action::Heal;
    }
}

/// Random walk around the patrol anchor, walking back once too far away
#[derive(Debug, Clone, Copy)]
pub struct Patrol {
    pub patrol_dist: f32,
}

impl Patrol {
    pub fn new(patrol_dist: f32) -> Self {
        Self { patrol_dist }
    }
}

impl State for Patrol {
    fn name(&self) -> &'static str {
        "patrol"
    }

    fn act(&mut self, _: f32, world: &World, entity: Entity, rng: &mut dyn RngCore, action: &mut Action) {
        let (pos, anchor) = match (world.get::<&Position>(entity), world.get::<&PatrolPos>(entity)) {
            (Ok(pos), Ok(anchor)) => (*pos, anchor.0),
            _ => return,
        };

        *action = if pos.distance(&anchor) > self.patrol_dist {
            move_towards(&pos, &anchor)
        } else {
            Action::random_move(rng)
        };
    }
}

/// Waits in place. Never writes an action.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nop;

impl State for Nop {
    fn name(&self) -> &'static str {
        "nop"
    }

    fn act(&mut self, _: f32, _: &World, _: Entity, _: &mut dyn RngCore, _: &mut Action) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnSlime;

impl State for SpawnSlime {
    fn name(&self) -> &'static str {
        "spawn_slime"
    }

    fn act(&mut self, _: f32, _: &World, _: Entity, _: &mut dyn RngCore, action: &mut Action) {
        *action = Action::Spawn;
    }
}

/// Walk to a fixed cell. Once standing on it the action is left untouched.
#[derive(Debug, Clone, Copy)]
pub struct GoTo {
    pub target: Position,
}

impl GoTo {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            target: Position::new(x, y),
        }
    }
}

impl State for GoTo {
    fn name(&self) -> &'static str {
        "go_to"
    }

    fn act(&mut self, _: f32, world: &World, entity: Entity, _: &mut dyn RngCore, action: &mut Action) {
        let Ok(pos) = world.get::<&Position>(entity).map(|p| *p) else {
            return;
        };
        if pos != self.target {
            *action = move_towards(&pos, &self.target);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Eat;

impl State for Eat {
    fn name(&self) -> &'static str {
        "eat"
    }

    fn act(&mut self, _: f32, _: &World, _: Entity, _: &mut dyn RngCore, action: &mut Action) {
        *action = Action::Eat;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sleep;

impl State for Sleep {
    fn name(&self) -> &'static str {
        "sleep"
    }

    fn act(&mut self, _: f32, _: &World, _: Entity, _: &mut dyn RngCore, action: &mut Action) {
        *action = Action::Sleep;
    }
}

/// A whole sub-machine acting as a single state of its parent.
///
/// The sub-machine keeps its own active state across visits and has no way to
/// hand control back; the parent leaves only through its own edges.
pub struct NestedMachine {
    label: &'static str,
    machine: StateMachine,
}

impl NestedMachine {
    pub fn new(machine: StateMachine) -> Self {
        Self::named("nested", machine)
    }

    pub fn named(label: &'static str, machine: StateMachine) -> Self {
        Self { label, machine }
    }
}

impl State for NestedMachine {
    fn name(&self) -> &'static str {
        self.label
    }

    fn act(
        &mut self,
        dt: f32,
        world: &World,
        entity: Entity,
        rng: &mut dyn RngCore,
        action: &mut Action,
    ) {
        self.machine.act(dt, world, entity, rng, action);
    }

    fn as_machine(&self) -> Option<&StateMachine> {
        Some(&self.machine)
    }
}
