//! Prebuilt state machines for every AI archetype.

use serde::{Deserialize, Serialize};

use crate::ai::states::{
    AttackEnemy, Eat, FleeFromEnemy, GoTo, Healing, MoveToEnemy, MoveToPlayer, NestedMachine, Nop,
    Patrol, Sleep, SpawnSlime,
};
use crate::ai::transitions::{
    AllyAvailable, Always, DistanceToPosition, EnemyAvailable, FatigueMoreThan, HitpointsLessThan,
    HungerMoreThan, PlayerHitpointsLessThan,
};
use crate::ai::{StateId, StateMachine, TransitionExt};
use crate::components::Position;

/// Hitpoints below which patrolling mobs run away
const FLEE_HITPOINTS: f32 = 60.0;
/// Hitpoints below which a big slime splits
const SLIME_SPLIT_HITPOINTS: f32 = 50.0;
/// Arrival tolerance for crafter errands
const ARRIVAL_EPSILON: f32 = 0.1;

/// Patrol, chase an enemy that comes close, flee when hurt
pub fn patrol_attack_flee() -> StateMachine {
    let mut sm = StateMachine::new();

    let patrol = sm.add_state(Patrol::new(3.0));
    let move_to_enemy = sm.add_state(MoveToEnemy);
    let flee_from_enemy = sm.add_state(FleeFromEnemy);

    sm.add_transition(EnemyAvailable::new(3.0), patrol, move_to_enemy);
    sm.add_transition(EnemyAvailable::new(5.0).negate(), move_to_enemy, patrol);

    sm.add_transition(
        HitpointsLessThan::new(FLEE_HITPOINTS).and(EnemyAvailable::new(5.0)),
        move_to_enemy,
        flee_from_enemy,
    );
    sm.add_transition(
        HitpointsLessThan::new(FLEE_HITPOINTS).and(EnemyAvailable::new(3.0)),
        patrol,
        flee_from_enemy,
    );

    sm.add_transition(EnemyAvailable::new(7.0).negate(), flee_from_enemy, patrol);

    sm
}

/// Patrol and run from anything hostile
pub fn patrol_flee() -> StateMachine {
    let mut sm = StateMachine::new();

    let patrol = sm.add_state(Patrol::new(3.0));
    let flee_from_enemy = sm.add_state(FleeFromEnemy);

    sm.add_transition(EnemyAvailable::new(3.0), patrol, flee_from_enemy);
    sm.add_transition(EnemyAvailable::new(5.0).negate(), flee_from_enemy, patrol);

    sm
}

/// Always walk at the nearest enemy
pub fn attack() -> StateMachine {
    let mut sm = StateMachine::new();
    sm.add_state(MoveToEnemy);
    sm
}

/// Slime: behaves like a patrol/attack/flee mob, splits once when hurt.
///
/// Offspring start directly in the small state and never split again.
pub fn slime(is_small: bool) -> StateMachine {
    let mut sm = StateMachine::new();

    let big = sm.add_state(NestedMachine::named("big_slime", patrol_attack_flee()));
    let small = sm.add_state(NestedMachine::named("small_slime", patrol_attack_flee()));
    let spawn = sm.add_state(SpawnSlime);

    sm.add_transition(HitpointsLessThan::new(SLIME_SPLIT_HITPOINTS), big, spawn);
    sm.add_transition(Always, spawn, small);

    if is_small {
        sm.switch_state(small);
    }

    sm
}

/// Archer: close in, shoot from range, back off when crowded
pub fn archer() -> StateMachine {
    let mut sm = StateMachine::new();

    let move_to_enemy = sm.add_state(MoveToEnemy);
    let shoot_enemy = sm.add_state(AttackEnemy);
    let flee_from_enemy = sm.add_state(FleeFromEnemy);

    sm.add_transition(EnemyAvailable::new(5.0), move_to_enemy, shoot_enemy);
    sm.add_transition(EnemyAvailable::new(5.0).negate(), shoot_enemy, move_to_enemy);
    sm.add_transition(EnemyAvailable::new(3.0), shoot_enemy, flee_from_enemy);
    sm.add_transition(EnemyAvailable::new(7.0).negate(), flee_from_enemy, move_to_enemy);

    sm
}

/// Healer: follow the player, fight nearby enemies, heal a wounded player
pub fn healer() -> StateMachine {
    let mut sm = StateMachine::new();

    let move_to_player = sm.add_state(MoveToPlayer);
    let move_to_enemy = sm.add_state(MoveToEnemy);
    let heal = sm.add_state(Healing);

    sm.add_transition(EnemyAvailable::new(3.0), move_to_player, move_to_enemy);
    sm.add_transition(EnemyAvailable::new(3.0).negate(), move_to_enemy, move_to_player);

    sm.add_transition(
        AllyAvailable::new(1.0).and(PlayerHitpointsLessThan::new(50.0)),
        move_to_player,
        heal,
    );
    sm.add_transition(
        AllyAvailable::new(1.0)
            .and(PlayerHitpointsLessThan::new(50.0))
            .negate(),
        heal,
        move_to_player,
    );

    sm
}

/// Fixed cells a crafter walks between
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrafterStations {
    pub buy: Position,
    pub craft: Position,
    pub sell: Position,
    pub eat: Position,
    pub sleep: Position,
}

impl Default for CrafterStations {
    fn default() -> Self {
        Self {
            buy: Position::new(8, -6),
            craft: Position::new(12, -6),
            sell: Position::new(12, -2),
            eat: Position::new(8, -2),
            sleep: Position::new(10, -9),
        }
    }
}

/// Thresholds that pull a crafter away from work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrafterNeeds {
    pub hunger: i32,
    pub fatigue: i32,
}

impl Default for CrafterNeeds {
    fn default() -> Self {
        Self {
            hunger: 40,
            fatigue: 80,
        }
    }
}

fn go_to(sm: &mut StateMachine, at: Position) -> StateId {
    sm.add_state(GoTo::new(at.x, at.y))
}

fn arrived(at: Position) -> DistanceToPosition {
    DistanceToPosition::new(ARRIVAL_EPSILON, at.x, at.y)
}

/// Buy materials, craft, sell, repeat
fn crafter_work(stations: &CrafterStations) -> StateMachine {
    let mut sm = StateMachine::new();

    let go_buy = go_to(&mut sm, stations.buy);
    let buy = sm.add_state(Nop);
    let go_craft = go_to(&mut sm, stations.craft);
    let craft = sm.add_state(Nop);
    let go_sell = go_to(&mut sm, stations.sell);
    let sell = sm.add_state(Nop);

    sm.add_transition(arrived(stations.buy), go_buy, buy);
    sm.add_transition(Always, buy, go_craft);
    sm.add_transition(arrived(stations.craft), go_craft, craft);
    sm.add_transition(Always, craft, go_sell);
    sm.add_transition(arrived(stations.sell), go_sell, sell);
    sm.add_transition(Always, sell, go_buy);

    sm
}

/// Walk to `at`, do `finish` once, then wait there. Leaving the cell
/// rearms the walk, so the next visit starts from the walk again.
fn crafter_errand(at: Position, finish: impl crate::ai::State + 'static) -> StateMachine {
    let mut sm = StateMachine::new();
    let walk = go_to(&mut sm, at);
    let done = sm.add_state(finish);
    let rest = sm.add_state(Nop);
    sm.add_transition(arrived(at), walk, done);
    sm.add_transition(Always, done, rest);
    sm.add_transition(arrived(at).negate(), rest, walk);
    sm
}

/// Crafter: a work cycle interrupted by eating and sleeping
pub fn crafter(stations: &CrafterStations, needs: CrafterNeeds) -> StateMachine {
    let mut sm = StateMachine::new();

    let work = sm.add_state(NestedMachine::named("work", crafter_work(stations)));
    let eat = sm.add_state(NestedMachine::named("eat", crafter_errand(stations.eat, Eat)));
    let sleep = sm.add_state(NestedMachine::named("sleep", crafter_errand(stations.sleep, Sleep)));

    sm.add_transition(HungerMoreThan::new(needs.hunger), work, eat);
    sm.add_transition(FatigueMoreThan::new(needs.fatigue), work, sleep);
    sm.add_transition(HungerMoreThan::new(needs.hunger).negate(), eat, work);
    sm.add_transition(FatigueMoreThan::new(needs.fatigue).negate(), sleep, work);

    sm
}
