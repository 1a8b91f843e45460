//! Transition predicates - read-only boolean checks over world state.
//!
//! Leaf predicates look at distances, thresholds and counters. [`Negate`] and
//! [`And`] own their operands, so a composed predicate is a tree that is
//! dropped as a unit together with the edge that holds it.

use hecs::{Entity, World};

use crate::components::{Fatigue, Hitpoints, Hunger, IsPlayer, Position, Team};

/// A guard on a state machine edge
///
/// Implementations must not mutate the world. An entity that no longer
/// exists, or lacks the components a check needs, evaluates to `false`.
pub trait Transition: Send + Sync {
    fn is_available(&self, world: &World, entity: Entity) -> bool;
}

impl<T: Transition + ?Sized> Transition for Box<T> {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        (**self).is_available(world, entity)
    }
}

/// Combinators for building predicate trees
pub trait TransitionExt: Transition + Sized + 'static {
    fn negate(self) -> Negate {
        Negate::new(self)
    }

    fn and<R: Transition + 'static>(self, rhs: R) -> And {
        And::new(self, rhs)
    }
}

impl<T: Transition + 'static> TransitionExt for T {}

/// Is any entity matching `filter` within `range` of the subject?
fn any_within(
    world: &World,
    entity: Entity,
    range: f32,
    filter: impl Fn(Entity, Team, Team) -> bool,
) -> bool {
    let (pos, team) = match (world.get::<&Position>(entity), world.get::<&Team>(entity)) {
        (Ok(pos), Ok(team)) => (*pos, *team),
        _ => return false,
    };

    world
        .query::<(&Position, &Team)>()
        .iter()
        .any(|(other, (other_pos, other_team))| {
            filter(other, team, *other_team) && other_pos.distance(&pos) <= range
        })
}

/// True if an entity of another team is within `range`
#[derive(Debug, Clone, Copy)]
pub struct EnemyAvailable {
    pub range: f32,
}

impl EnemyAvailable {
    pub fn new(range: f32) -> Self {
        Self { range }
    }
}

impl Transition for EnemyAvailable {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        any_within(world, entity, self.range, |_, team, other| team != other)
    }
}

/// True if another entity of the same team is within `range`
#[derive(Debug, Clone, Copy)]
pub struct AllyAvailable {
    pub range: f32,
}

impl AllyAvailable {
    pub fn new(range: f32) -> Self {
        Self { range }
    }
}

impl Transition for AllyAvailable {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        any_within(world, entity, self.range, |other, team, other_team| {
            other != entity && team == other_team
        })
    }
}

/// True if the subject's own hitpoints are below the threshold
#[derive(Debug, Clone, Copy)]
pub struct HitpointsLessThan {
    pub threshold: f32,
}

impl HitpointsLessThan {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Transition for HitpointsLessThan {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Hitpoints>(entity)
            .map(|hp| hp.0 < self.threshold)
            .unwrap_or(false)
    }
}

/// True if the player's hitpoints are below the threshold, whoever asks
#[derive(Debug, Clone, Copy)]
pub struct PlayerHitpointsLessThan {
    pub threshold: f32,
}

impl PlayerHitpointsLessThan {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Transition for PlayerHitpointsLessThan {
    fn is_available(&self, world: &World, _entity: Entity) -> bool {
        world
            .query::<(&IsPlayer, &Hitpoints)>()
            .iter()
            .any(|(_, (_, hp))| hp.0 < self.threshold)
    }
}

/// True once the subject is within `epsilon` of a fixed cell
#[derive(Debug, Clone, Copy)]
pub struct DistanceToPosition {
    pub epsilon: f32,
    pub target: Position,
}

impl DistanceToPosition {
    pub fn new(epsilon: f32, x: i32, y: i32) -> Self {
        Self {
            epsilon,
            target: Position::new(x, y),
        }
    }
}

impl Transition for DistanceToPosition {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Position>(entity)
            .map(|pos| pos.distance(&self.target) <= self.epsilon)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HungerMoreThan {
    pub threshold: i32,
}

impl HungerMoreThan {
    pub fn new(threshold: i32) -> Self {
        Self { threshold }
    }
}

impl Transition for HungerMoreThan {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Hunger>(entity)
            .map(|hunger| hunger.current > self.threshold)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FatigueMoreThan {
    pub threshold: i32,
}

impl FatigueMoreThan {
    pub fn new(threshold: i32) -> Self {
        Self { threshold }
    }
}

impl Transition for FatigueMoreThan {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Fatigue>(entity)
            .map(|fatigue| fatigue.current > self.threshold)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Transition for Always {
    fn is_available(&self, _world: &World, _entity: Entity) -> bool {
        true
    }
}

/// Reserved: reachability is not modelled, so this never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyReachable;

impl Transition for EnemyReachable {
    fn is_available(&self, _world: &World, _entity: Entity) -> bool {
        false
    }
}

/// Logical negation of the owned predicate
pub struct Negate {
    inner: Box<dyn Transition>,
}

impl Negate {
    pub fn new(inner: impl Transition + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Transition for Negate {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        !self.inner.is_available(world, entity)
    }
}

/// Conjunction of two owned predicates. Both sides are always evaluated.
pub struct And {
    lhs: Box<dyn Transition>,
    rhs: Box<dyn Transition>,
}

impl And {
    pub fn new(lhs: impl Transition + 'static, rhs: impl Transition + 'static) -> Self {
        Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl Transition for And {
    fn is_available(&self, world: &World, entity: Entity) -> bool {
        let lhs = self.lhs.is_available(world, entity);
        let rhs = self.rhs.is_available(world, entity);
        lhs && rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::IsPlayer;

    fn mob(world: &mut World, x: i32, y: i32, team: i32, hp: f32) -> Entity {
        world.spawn((Position::new(x, y), Team(team), Hitpoints(hp)))
    }

    #[test]
    fn test_enemy_available_range() {
        let mut world = World::new();
        let subject = mob(&mut world, 0, 0, 1, 100.0);
        mob(&mut world, 3, 0, 0, 100.0);
        mob(&mut world, 1, 0, 1, 100.0); // ally closer, ignored

        assert!(EnemyAvailable::new(3.0).is_available(&world, subject));
        assert!(!EnemyAvailable::new(2.9).is_available(&world, subject));
    }

    #[test]
    fn test_ally_available_excludes_self() {
        let mut world = World::new();
        let subject = mob(&mut world, 0, 0, 0, 100.0);
        assert!(!AllyAvailable::new(5.0).is_available(&world, subject));

        mob(&mut world, 0, 1, 0, 100.0);
        assert!(AllyAvailable::new(1.0).is_available(&world, subject));
        assert!(!AllyAvailable::new(0.5).is_available(&world, subject));
    }

    #[test]
    fn test_hitpoint_thresholds() {
        let mut world = World::new();
        let subject = mob(&mut world, 0, 0, 1, 40.0);
        assert!(HitpointsLessThan::new(50.0).is_available(&world, subject));
        assert!(!HitpointsLessThan::new(40.0).is_available(&world, subject));

        // no player yet
        assert!(!PlayerHitpointsLessThan::new(50.0).is_available(&world, subject));
        world.spawn((IsPlayer, Position::new(9, 9), Team(0), Hitpoints(30.0)));
        assert!(PlayerHitpointsLessThan::new(50.0).is_available(&world, subject));
        assert!(!PlayerHitpointsLessThan::new(30.0).is_available(&world, subject));
    }

    #[test]
    fn test_distance_to_position() {
        let mut world = World::new();
        let subject = mob(&mut world, 2, 3, 2, 100.0);
        assert!(DistanceToPosition::new(0.1, 2, 3).is_available(&world, subject));
        assert!(!DistanceToPosition::new(0.1, 2, 4).is_available(&world, subject));
        assert!(DistanceToPosition::new(1.0, 2, 4).is_available(&world, subject));
    }

    #[test]
    fn test_needs_counters() {
        let mut world = World::new();
        let subject = world.spawn((
            Hunger { current: 11, max: 100 },
            Fatigue { current: 4, max: 100 },
        ));
        assert!(HungerMoreThan::new(10).is_available(&world, subject));
        assert!(!HungerMoreThan::new(11).is_available(&world, subject));
        assert!(FatigueMoreThan::new(3).is_available(&world, subject));
        assert!(!FatigueMoreThan::new(4).is_available(&world, subject));
    }

    #[test]
    fn test_constants_and_combinators() {
        let mut world = World::new();
        let subject = mob(&mut world, 0, 0, 1, 10.0);

        assert!(Always.is_available(&world, subject));
        assert!(!EnemyReachable.is_available(&world, subject));
        assert!(!Always.negate().is_available(&world, subject));
        assert!(EnemyReachable.negate().is_available(&world, subject));
        assert!(Always.and(HitpointsLessThan::new(20.0)).is_available(&world, subject));
        assert!(!Always.and(EnemyReachable).is_available(&world, subject));
        assert!(Always.and(EnemyReachable).negate().is_available(&world, subject));
    }

    #[test]
    fn test_despawned_subject_is_unavailable() {
        let mut world = World::new();
        let subject = mob(&mut world, 0, 0, 1, 10.0);
        mob(&mut world, 1, 0, 0, 10.0);
        world.despawn(subject).unwrap();

        assert!(!EnemyAvailable::new(5.0).is_available(&world, subject));
        assert!(!HitpointsLessThan::new(50.0).is_available(&world, subject));
        assert!(!DistanceToPosition::new(1.0, 0, 0).is_available(&world, subject));
    }
}
