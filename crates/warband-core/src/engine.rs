//! Turn engine - the per-tick entry point driving every resolution phase

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::config::{EngineConfig, Scenario};
use crate::error::Result;
use crate::systems::*;

/// Everything one call to [`TurnEngine::process_turn`] did
#[derive(Debug, Clone, Default)]
pub struct TurnReport {
    /// No player input this tick (or no player at all); nothing resolved
    pub gated: bool,
    /// The player's quota wrapped and every machine was stepped
    pub full_turn: bool,
    /// Machines stepped this tick
    pub planned: usize,
    /// Entities whose cell changed in the commit phase
    pub moved: usize,
    pub blocked: Vec<Entity>,
    pub melee_hits: Vec<Hit>,
    pub heals: Vec<Heal>,
    pub ranged_hits: Vec<Hit>,
    pub spawned: Vec<Entity>,
    pub died: Vec<Entity>,
    pub pickups: Vec<Pickup>,
}

/// The two-integer stats readout shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub hitpoints: i32,
    pub power: i32,
}

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCell {
    pub entity: Entity,
    pub position: Position,
    pub appearance: Appearance,
    /// `None` for pickups and other things that cannot be hurt
    pub hitpoints: Option<f32>,
}

/// Owns the world and resolves one tick at a time
pub struct TurnEngine {
    /// ECS world containing all entities
    pub world: World,
    config: EngineConfig,
    rng: StdRng,
    planner: PlannerQuery,
    /// Ticks that got past the input gate
    ticks: u64,
    /// Full turns, i.e. ticks on which NPCs were re-planned
    turns: u64,
}

impl TurnEngine {
    /// Create an engine over an empty world
    pub fn new(config: EngineConfig) -> Self {
        Self {
            world: World::new(),
            config,
            rng: StdRng::seed_from_u64(config.seed),
            planner: PlannerQuery::new(),
            ticks: 0,
            turns: 0,
        }
    }

    /// Validate and build a scenario into a fresh engine
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let mut engine = Self::new(scenario.engine);
        scenario.build(&mut engine.world)?;
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// The player entity, if one is alive
    pub fn player(&self) -> Option<Entity> {
        self.world
            .query::<&IsPlayer>()
            .iter()
            .next()
            .map(|(entity, _)| entity)
    }

    /// Write the player's pending action; false when there is no player
    pub fn set_player_action(&mut self, action: Action) -> bool {
        let Some(player) = self.player() else {
            return false;
        };
        match self.world.get::<&mut Action>(player) {
            Ok(mut pending) => {
                *pending = action;
                true
            }
            Err(_) => false,
        }
    }

    /// Resolve one tick.
    ///
    /// Gated out unless the player has a pending action. On a full turn every
    /// machine is stepped first; then the phases run in order: movement,
    /// position commit, healing, ranged attacks, spawning, death, pickups,
    /// needs and finally the action reset.
    pub fn process_turn(&mut self) -> TurnReport {
        let mut report = TurnReport::default();

        match player_action(&self.world) {
            None => {
                log::warn!("turn requested with no player in the world");
                report.gated = true;
                return report;
            }
            Some(Action::Nop) => {
                report.gated = true;
                return report;
            }
            Some(_) => {}
        }
        self.ticks += 1;

        report.full_turn = advance_player_quota(&mut self.world);
        if report.full_turn {
            self.turns += 1;
            report.planned = plan_npc_actions(
                &mut self.world,
                &mut self.planner,
                self.config.delta_time,
                &mut self.rng,
            );
        }

        let movement = movement_system(&mut self.world);
        report.blocked = movement.blocked;
        report.melee_hits = movement.melee_hits;
        report.moved = position_commit_system(&mut self.world);
        report.heals = healing_system(&mut self.world);
        report.ranged_hits = ranged_attack_system(&mut self.world);
        report.spawned = spawn_system(&mut self.world);
        report.died = death_system(&mut self.world);
        report.pickups = pickup_system(&mut self.world);
        needs_system(&mut self.world);
        reset_actions(&mut self.world);

        log::debug!(
            "tick {} (turn {}): moved {}, blocked {}, died {}",
            self.ticks,
            self.turns,
            report.moved,
            report.blocked.len(),
            report.died.len()
        );

        report
    }

    /// Current hitpoints and melee damage of the player, truncated
    pub fn player_stats(&self) -> Option<PlayerStats> {
        self.world
            .query::<(&IsPlayer, &Hitpoints, &MeleeDamage)>()
            .iter()
            .next()
            .map(|(_, (_, hp, dmg))| PlayerStats {
                hitpoints: hp.0 as i32,
                power: dmg.0 as i32,
            })
    }

    /// Everything with a position and colour; things without hitpoints first
    /// so creatures draw on top of pickups.
    pub fn render_cells(&self) -> Vec<RenderCell> {
        let mut cells: Vec<RenderCell> = self
            .world
            .query::<(&Position, &Appearance, Option<&Hitpoints>)>()
            .iter()
            .map(|(entity, (pos, appearance, hp))| RenderCell {
                entity,
                position: *pos,
                appearance: *appearance,
                hitpoints: hp.map(|hp| hp.0),
            })
            .collect();
        cells.sort_by_key(|cell| cell.hitpoints.is_some());
        cells
    }

    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
