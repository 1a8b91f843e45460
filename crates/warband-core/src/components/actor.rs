//! Actor components: pending actions, action quotas, mob kinds and needs counters.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// The single action an entity will attempt in the current resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Nop,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Attack,
    Heal,
    Spawn,
    Eat,
    Sleep,
}

impl Action {
    /// The four grid moves, in left/right/up/down order
    pub const MOVES: [Action; 4] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
    ];

    pub fn is_move(self) -> bool {
        Self::MOVES.contains(&self)
    }

    /// Cell delta for a move action, `(0, 0)` for anything else.
    /// "Up" is towards negative y.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::MoveLeft => (-1, 0),
            Action::MoveRight => (1, 0),
            Action::MoveUp => (0, -1),
            Action::MoveDown => (0, 1),
            _ => (0, 0),
        }
    }

    /// Pick one of the four moves uniformly
    pub fn random_move(rng: &mut dyn RngCore) -> Action {
        *Self::MOVES.choose(rng).unwrap_or(&Action::MoveDown)
    }
}

/// How many world ticks make up one turn for this entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumActions {
    pub quota: u32,
    pub progress: u32,
}

impl NumActions {
    pub fn new(quota: u32) -> Self {
        Self { quota, progress: 0 }
    }

    /// Advance progress modulo the quota; returns true when it wraps to zero
    pub fn advance(&mut self) -> bool {
        self.progress = (self.progress + 1) % self.quota.max(1);
        self.progress == 0
    }
}

/// Creature kind, used by the spawn phase to find slimes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobType {
    Human,
    Slime,
    Archer,
    Healer,
    Crafter,
}

/// Hunger counter, grows by one every turn until the entity eats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunger {
    pub current: i32,
    pub max: i32,
}

/// Fatigue counter, grows by one every turn until the entity sleeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fatigue {
    pub current: i32,
    pub max: i32,
}

impl Hunger {
    pub fn new(max: i32) -> Self {
        Self { current: 0, max }
    }

    pub fn exceeded(&self) -> bool {
        self.current > self.max
    }
}

impl Fatigue {
    pub fn new(max: i32) -> Self {
        Self { current: 0, max }
    }

    pub fn exceeded(&self) -> bool {
        self.current > self.max
    }
}
