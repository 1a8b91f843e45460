//! Action systems - player gating, quota bookkeeping, NPC planning, reset

use hecs::{Entity, PreparedQuery, World};
use rand::RngCore;

use crate::ai::StateMachine;
use crate::components::{Action, IsPlayer, NumActions};

/// Cached query over every entity that carries a brain.
///
/// Built once by the engine and reused on every full turn.
pub type PlannerQuery = PreparedQuery<(&'static mut StateMachine, &'static Action)>;

/// The player's pending action, or `None` when there is no player
pub fn player_action(world: &World) -> Option<Action> {
    world
        .query::<(&IsPlayer, &Action)>()
        .iter()
        .next()
        .map(|(_, (_, action))| *action)
}

/// Advance the player's quota counter; true when this tick completes a full turn.
///
/// A player without a quota never completes one, so NPCs stay frozen.
pub fn advance_player_quota(world: &mut World) -> bool {
    world
        .query_mut::<(&IsPlayer, &mut NumActions)>()
        .into_iter()
        .next()
        .map_or(false, |(_, (_, quota))| quota.advance())
}

/// Step every state machine once, producing fresh pending actions.
///
/// Machines read the world as it stood before planning started; the new
/// actions are written only after every machine has run.
pub fn plan_npc_actions(
    world: &mut World,
    query: &mut PlannerQuery,
    dt: f32,
    rng: &mut dyn RngCore,
) -> usize {
    let mut planned: Vec<(Entity, Action)> = Vec::new();
    {
        let world: &World = world;
        let mut borrow = query.query(world);
        for (entity, (machine, action)) in borrow.iter() {
            let mut next = *action;
            machine.act(dt, world, entity, rng, &mut next);
            planned.push((entity, next));
        }
    }

    for &(entity, next) in &planned {
        if let Ok(mut action) = world.get::<&mut Action>(entity) {
            *action = next;
        }
    }

    log::debug!("planned {} npc actions", planned.len());
    planned.len()
}

/// Phase 9: every pending action goes back to `Nop`
pub fn reset_actions(world: &mut World) {
    for (_, action) in world.query_mut::<&mut Action>() {
        *action = Action::Nop;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::states::{AttackEnemy, Nop};
    use crate::ai::transitions::Always;
    use crate::components::Position;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_player_action_lookup() {
        let mut world = World::new();
        assert_eq!(player_action(&world), None);

        world.spawn((IsPlayer, Action::MoveLeft));
        assert_eq!(player_action(&world), Some(Action::MoveLeft));
    }

    #[test]
    fn test_quota_two_alternates() {
        let mut world = World::new();
        world.spawn((IsPlayer, NumActions::new(2)));

        assert!(!advance_player_quota(&mut world));
        assert!(advance_player_quota(&mut world));
        assert!(!advance_player_quota(&mut world));
        assert!(advance_player_quota(&mut world));
    }

    #[test]
    fn test_player_without_quota_never_completes() {
        let mut world = World::new();
        world.spawn((IsPlayer, Action::MoveUp));
        assert!(!advance_player_quota(&mut world));
    }

    #[test]
    fn test_plan_writes_machine_output() {
        let mut world = World::new();
        let mut sm = StateMachine::new();
        let attack = sm.add_state(AttackEnemy);
        let idle = sm.add_state(Nop);
        sm.add_transition(Always, attack, idle);
        let npc = world.spawn((sm, Action::Nop, Position::new(0, 0)));
        let bystander = world.spawn((Action::MoveLeft,));

        let mut query = PlannerQuery::new();
        let mut rng = StdRng::seed_from_u64(7);
        let planned = plan_npc_actions(&mut world, &mut query, 0.0, &mut rng);

        assert_eq!(planned, 1);
        assert_eq!(*world.get::<&Action>(npc).unwrap(), Action::Attack);
        assert_eq!(*world.get::<&Action>(bystander).unwrap(), Action::MoveLeft);

        // second plan runs the idle state, which leaves the action alone
        plan_npc_actions(&mut world, &mut query, 0.0, &mut rng);
        assert_eq!(*world.get::<&Action>(npc).unwrap(), Action::Attack);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut world = World::new();
        let a = world.spawn((Action::Heal,));
        let b = world.spawn((Action::MoveDown, IsPlayer));

        reset_actions(&mut world);

        assert_eq!(*world.get::<&Action>(a).unwrap(), Action::Nop);
        assert_eq!(*world.get::<&Action>(b).unwrap(), Action::Nop);
    }
}
