//! Scenario configuration - engine settings and the initial entity layout
//!
//! Scenarios are JSON documents:
//!
//! ```json
//! {
//!   "engine": { "seed": 7 },
//!   "entities": [
//!     { "kind": "player", "x": 0, "y": 0 },
//!     { "kind": "monster", "x": 4, "y": 0, "brain": "attack", "hitpoints": 40 },
//!     { "kind": "heal_pickup", "x": -2, "y": 3, "amount": 25 }
//!   ]
//! }
//! ```
//!
//! Omitted archetype parameters fall back to the archetype defaults.

use std::collections::HashMap;
use std::path::Path;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::archetypes::*;
use crate::components::Position;
use crate::error::{Result, ScenarioError};

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine's RNG (patrol wandering)
    pub seed: u64,
    /// Step length handed to every state; the shipped behaviours ignore it
    pub delta_time: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            delta_time: 0.0,
        }
    }
}

/// Parameters for either pickup kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupParams {
    pub amount: f32,
}

/// Archetype recipe for one scenario entry, tagged by `kind`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Archetype {
    Player(PlayerParams),
    Monster(MonsterParams),
    Slime(SlimeParams),
    Archer(ArcherParams),
    Healer(HealerParams),
    Crafter(CrafterParams),
    HealPickup(PickupParams),
    PowerupPickup(PickupParams),
}

impl Archetype {
    /// Whether entities of this kind take up their cell
    pub fn occupies_cell(&self) -> bool {
        !matches!(self, Archetype::HealPickup(_) | Archetype::PowerupPickup(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub x: i32,
    pub y: i32,
    #[serde(flatten)]
    pub archetype: Archetype,
}

impl SpawnEntry {
    pub fn new(x: i32, y: i32, archetype: Archetype) -> Self {
        Self { x, y, archetype }
    }

    /// Construct the entity and attach its machine
    pub fn spawn(&self, world: &mut World) -> Entity {
        let (x, y) = (self.x, self.y);
        match &self.archetype {
            Archetype::Player(p) => spawn_player(world, x, y, p),
            Archetype::Monster(p) => spawn_monster(world, x, y, p),
            Archetype::Slime(p) => spawn_slime(world, x, y, p),
            Archetype::Archer(p) => spawn_archer(world, x, y, p),
            Archetype::Healer(p) => spawn_healer(world, x, y, p),
            Archetype::Crafter(p) => spawn_crafter(world, x, y, p),
            Archetype::HealPickup(p) => spawn_heal_pickup(world, x, y, p.amount),
            Archetype::PowerupPickup(p) => spawn_powerup_pickup(world, x, y, p.amount),
        }
    }
}

/// Initial world layout plus engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub engine: EngineConfig,
    pub entities: Vec<SpawnEntry>,
}

impl Scenario {
    /// The stock layout: one of each fighting archetype around the player
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            engine: EngineConfig::default(),
            entities: vec![
                SpawnEntry::new(-5, -10, Archetype::Archer(ArcherParams::default())),
                SpawnEntry::new(3, 3, Archetype::Healer(HealerParams::default())),
                SpawnEntry::new(-3, -3, Archetype::Slime(SlimeParams::default())),
                SpawnEntry::new(0, 0, Archetype::Player(PlayerParams::default())),
                SpawnEntry::new(7, 7, Archetype::PowerupPickup(PickupParams { amount: 10.0 })),
                SpawnEntry::new(-5, 5, Archetype::HealPickup(PickupParams { amount: 50.0 })),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check for exactly one player with a usable quota, and no two
    /// cell-occupying entities sharing a starting cell.
    pub fn validate(&self) -> Result<()> {
        let players: Vec<&PlayerParams> = self
            .entities
            .iter()
            .filter_map(|entry| match &entry.archetype {
                Archetype::Player(p) => Some(p),
                _ => None,
            })
            .collect();

        match players.as_slice() {
            [] => return Err(ScenarioError::NoPlayer),
            [player] if player.actions_per_turn == 0 => {
                return Err(ScenarioError::InvalidQuota(player.actions_per_turn))
            }
            [_] => {}
            many => return Err(ScenarioError::MultiplePlayers(many.len())),
        }

        let mut cells: HashMap<Position, usize> = HashMap::new();
        for entry in self.entities.iter().filter(|e| e.archetype.occupies_cell()) {
            let count = cells.entry(Position::new(entry.x, entry.y)).or_default();
            *count += 1;
            if *count > 1 {
                return Err(ScenarioError::Occupied {
                    x: entry.x,
                    y: entry.y,
                });
            }
        }

        Ok(())
    }

    /// Validate, then populate `world` in entry order
    pub fn build(&self, world: &mut World) -> Result<Vec<Entity>> {
        self.validate()?;
        let entities: Vec<Entity> = self.entities.iter().map(|entry| entry.spawn(world)).collect();
        log::info!(
            "scenario '{}' built with {} entities",
            self.name,
            entities.len()
        );
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Hitpoints, IsPlayer, MeleeDamage, NumActions};

    #[test]
    fn test_classic_is_valid() {
        let scenario = Scenario::classic();
        assert!(scenario.validate().is_ok());

        let mut world = World::new();
        let entities = scenario.build(&mut world).unwrap();
        assert_eq!(entities.len(), 6);
        assert_eq!(world.len(), 6);
    }

    #[test]
    fn test_parse_with_defaults() {
        let json = r#"{
            "engine": { "seed": 7 },
            "entities": [
                { "kind": "player", "x": 0, "y": 0, "actions_per_turn": 1 },
                { "kind": "monster", "x": 4, "y": 0, "brain": "attack", "hitpoints": 40 },
                { "kind": "heal_pickup", "x": -2, "y": 3, "amount": 25 }
            ]
        }"#;
        let scenario = Scenario::from_json(json).unwrap();

        assert_eq!(scenario.engine.seed, 7);
        assert_eq!(scenario.engine.delta_time, 0.0);
        match &scenario.entities[1].archetype {
            Archetype::Monster(m) => {
                assert_eq!(m.brain, MonsterBrain::Attack);
                assert_eq!(m.hitpoints, 40.0);
                assert_eq!(m.melee_damage, 20.0);
            }
            other => panic!("expected monster, got {:?}", other),
        }

        let mut world = World::new();
        let entities = scenario.build(&mut world).unwrap();
        let player = entities[0];
        assert!(world.get::<&IsPlayer>(player).is_ok());
        assert_eq!(world.get::<&NumActions>(player).unwrap().quota, 1);
        assert_eq!(world.get::<&Hitpoints>(player).unwrap().0, 100.0);
        assert_eq!(world.get::<&MeleeDamage>(player).unwrap().0, 50.0);
    }

    #[test]
    fn test_json_roundtrip_keeps_layout() {
        let scenario = Scenario::classic();
        let json = scenario.to_json().unwrap();
        assert_eq!(Scenario::from_json(&json).unwrap(), scenario);
    }

    #[test]
    fn test_validation_errors() {
        let no_player = Scenario {
            entities: vec![SpawnEntry::new(0, 0, Archetype::Slime(SlimeParams::default()))],
            ..Scenario::default()
        };
        assert!(matches!(no_player.validate(), Err(ScenarioError::NoPlayer)));

        let player = Archetype::Player(PlayerParams::default());
        let two_players = Scenario {
            entities: vec![SpawnEntry::new(0, 0, player), SpawnEntry::new(1, 0, player)],
            ..Scenario::default()
        };
        assert!(matches!(
            two_players.validate(),
            Err(ScenarioError::MultiplePlayers(2))
        ));

        let stacked = Scenario {
            entities: vec![
                SpawnEntry::new(0, 0, player),
                SpawnEntry::new(2, 2, Archetype::Archer(ArcherParams::default())),
                SpawnEntry::new(2, 2, Archetype::Healer(HealerParams::default())),
            ],
            ..Scenario::default()
        };
        assert!(matches!(
            stacked.validate(),
            Err(ScenarioError::Occupied { x: 2, y: 2 })
        ));

        let zero_quota = Scenario {
            entities: vec![SpawnEntry::new(
                0,
                0,
                Archetype::Player(PlayerParams {
                    actions_per_turn: 0,
                    ..PlayerParams::default()
                }),
            )],
            ..Scenario::default()
        };
        assert!(matches!(
            zero_quota.validate(),
            Err(ScenarioError::InvalidQuota(0))
        ));
    }

    #[test]
    fn test_pickup_under_player_is_allowed() {
        let scenario = Scenario {
            entities: vec![
                SpawnEntry::new(0, 0, Archetype::Player(PlayerParams::default())),
                SpawnEntry::new(0, 0, Archetype::HealPickup(PickupParams { amount: 5.0 })),
            ],
            ..Scenario::default()
        };
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Scenario::from_path("/definitely/not/here.json").unwrap_err();
        match err {
            ScenarioError::Io { path, .. } => {
                assert_eq!(path, std::path::PathBuf::from("/definitely/not/here.json"))
            }
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            Scenario::from_json("{ not json"),
            Err(ScenarioError::Parse(_))
        ));
    }
}
