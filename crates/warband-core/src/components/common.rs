//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

/// Integer grid cell - the current position of an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = (i64::from(self.x) - i64::from(other.x)) as f32;
        let dy = (i64::from(self.y) - i64::from(other.y)) as f32;
        dx * dx + dy * dy
    }

    /// Euclidean distance between two cells
    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

/// Staged next cell, written by the movement phase and copied into `Position` on commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePos(pub Position);

/// Anchor cell that patrolling mobs wander around
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolPos(pub Position);

/// RGBA colour the renderer draws the entity's cell with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Appearance {
    /// Build from a packed `0xRRGGBBAA` value
    pub const fn from_hex(rgba: u32) -> Self {
        Self {
            r: (rgba >> 24) as u8,
            g: (rgba >> 16) as u8,
            b: (rgba >> 8) as u8,
            a: rgba as u8,
        }
    }
}

/// Marker component identifying the player-controlled entity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IsPlayer;

/// Marker component for any creature that takes part in combat
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IsMob;

/// Marker component for single-use pickups lying on the grid
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IsPickup;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(a.distance_squared(&b), 25.0);
        assert!((a.distance(&b) - 5.0).abs() < 0.001);
        assert_eq!(a.offset(-1, -1), Position::new(-1, -1));
    }

    #[test]
    fn test_appearance_from_hex() {
        let c = Appearance::from_hex(0x44ff44ff);
        assert_eq!(c, Appearance { r: 0x44, g: 0xff, b: 0x44, a: 0xff });
    }
}
