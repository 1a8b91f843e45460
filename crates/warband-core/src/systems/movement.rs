//! Movement system - greedy one-cell moves, bump attacks, position commit

use std::collections::HashMap;

use hecs::{Entity, World};

use super::{apply_hits, Hit};
use crate::components::{Action, Hitpoints, MeleeDamage, MovePos, Position, Team};
use crate::geometry::step;

/// What the movement phase decided
#[derive(Debug, Clone, Default)]
pub struct MovementOutcome {
    /// Movers whose staged position was written
    pub staged: Vec<Entity>,
    /// Movers whose action was downgraded to `Nop`
    pub blocked: Vec<Entity>,
    /// Bump attacks against enemies occupying the target cell
    pub melee_hits: Vec<Hit>,
}

struct Mover {
    entity: Entity,
    target: Position,
    team: Team,
    damage: f32,
}

/// Phase 1: stage moves, block on occupied or contested cells, apply melee.
///
/// A mover is blocked when its target cell holds another occupant (anything
/// with hitpoints and a team) at its pre-phase position, or when another mover
/// targets the same cell. Blockers on other teams take the mover's melee damage.
pub fn movement_system(world: &mut World) -> MovementOutcome {
    let occupants: Vec<(Entity, Position, Team)> = world
        .query::<(&Position, &Hitpoints, &Team)>()
        .iter()
        .map(|(entity, (pos, _, team))| (entity, *pos, *team))
        .collect();

    let movers: Vec<Mover> = world
        .query::<(&Action, &Position, &MovePos, &MeleeDamage, &Team)>()
        .iter()
        .filter(|(_, (action, ..))| action.is_move())
        .map(|(entity, (action, pos, _, dmg, team))| Mover {
            entity,
            target: step(*pos, *action),
            team: *team,
            damage: dmg.0,
        })
        .collect();

    let mut claims: HashMap<Position, usize> = HashMap::with_capacity(movers.len());
    for mover in &movers {
        *claims.entry(mover.target).or_default() += 1;
    }

    let mut outcome = MovementOutcome::default();
    for mover in &movers {
        let mut blocked = false;
        for (other, other_pos, other_team) in &occupants {
            if *other == mover.entity || *other_pos != mover.target {
                continue;
            }
            blocked = true;
            if *other_team != mover.team {
                outcome.melee_hits.push(Hit {
                    attacker: mover.entity,
                    target: *other,
                    damage: mover.damage,
                });
            }
        }
        if claims.get(&mover.target).copied().unwrap_or(0) > 1 {
            blocked = true;
        }

        if blocked {
            outcome.blocked.push(mover.entity);
        } else {
            outcome.staged.push(mover.entity);
        }
    }

    // Apply decisions
    apply_hits(world, &outcome.melee_hits);
    for &entity in &outcome.blocked {
        if let Ok(mut action) = world.get::<&mut Action>(entity) {
            *action = Action::Nop;
        }
    }
    for mover in movers.iter().filter(|m| outcome.staged.contains(&m.entity)) {
        if let Ok(mut staged) = world.get::<&mut MovePos>(mover.entity) {
            staged.0 = mover.target;
        }
    }

    if !outcome.blocked.is_empty() || !outcome.melee_hits.is_empty() {
        log::debug!(
            "movement: {} staged, {} blocked, {} melee hits",
            outcome.staged.len(),
            outcome.blocked.len(),
            outcome.melee_hits.len()
        );
    }

    outcome
}

/// Phase 2: copy every staged position into the current position.
///
/// Returns how many entities changed cell.
pub fn position_commit_system(world: &mut World) -> usize {
    let mut moved = 0;
    for (_, (pos, staged)) in world.query_mut::<(&mut Position, &MovePos)>() {
        if *pos != staged.0 {
            *pos = staged.0;
            moved += 1;
        }
    }
    moved
}
