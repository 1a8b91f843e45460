//! Warband Headless Turn Harness
//!
//! Drives the simulation core with a scripted or seeded-random player input
//! stream in place of keyboard sampling. Runs entirely in-process with no
//! rendering beyond an ASCII snapshot.
//!
//! Usage:
//!   cargo run -p warband-simtest
//!   cargo run -p warband-simtest -- --scenario arena.json --turns 100 --verbose
//!   cargo run -p warband-simtest -- --script "rrdd.uull"

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use warband_core::ai::states::{FleeFromEnemy, MoveToEnemy, Patrol};
use warband_core::ai::State;
use warband_core::archetypes::*;
use warband_core::prelude::*;
use warband_core::systems::{healing_system, pickup_system, spawn_system};

/// Headless turn harness for Warband
#[derive(Parser, Debug)]
#[command(name = "warband-simtest")]
#[command(about = "Run a scenario headless and check the turn rules", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario JSON file (defaults to the built-in classic layout)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of input ticks to feed the engine
    #[arg(short, long, default_value_t = 40)]
    turns: usize,

    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Player inputs, one per tick: l r u d, '.' for no input. Repeats when
    /// shorter than --turns. Random moves when omitted.
    #[arg(long)]
    script: Option<String>,

    /// Print every tick's report and map
    #[arg(short, long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "warband=debug" } else { "warband=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    println!("=== Warband Turn Harness ===\n");

    let mut results = Vec::new();

    // 1. Step rules of the movement states
    results.extend(validate_step_rules());

    // 2. Single-phase scenarios
    results.extend(validate_phases());

    // 3. Scripted run of the chosen scenario
    results.extend(run_scenario(&cli));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || cli.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Step rules ───────────────────────────────────────────────────────

fn act_once(state: &mut dyn State, world: &World, entity: Entity) -> Action {
    let mut rng = StdRng::seed_from_u64(0);
    let mut action = Action::Nop;
    state.act(0.0, world, entity, &mut rng, &mut action);
    action
}

fn duel(enemy_at: Position) -> (World, Entity) {
    let mut world = World::new();
    let subject = world.spawn((Position::new(0, 0), Team(1)));
    world.spawn((enemy_at, Team(0)));
    (world, subject)
}

fn validate_step_rules() -> Vec<TestResult> {
    println!("--- Step Rules ---");
    let mut results = Vec::new();

    let (world, subject) = duel(Position::new(3, 1));
    let step = act_once(&mut MoveToEnemy, &world, subject);
    results.push(TestResult {
        name: "chase_horizontal".into(),
        passed: step == Action::MoveRight,
        detail: format!("enemy at (3, 1) -> {:?}", step),
    });

    let (world, subject) = duel(Position::new(1, 3));
    let step = act_once(&mut MoveToEnemy, &world, subject);
    results.push(TestResult {
        name: "chase_vertical".into(),
        passed: step == Action::MoveDown,
        detail: format!("enemy at (1, 3) -> {:?}", step),
    });

    let mut mismatches = 0;
    for x in -4..=4 {
        for y in -4..=4 {
            if x == 0 && y == 0 {
                continue;
            }
            let (world, subject) = duel(Position::new(x, y));
            let chase = act_once(&mut MoveToEnemy, &world, subject);
            let flee = act_once(&mut FleeFromEnemy, &world, subject);
            if warband_core::geometry::inverse_move(chase) != flee {
                mismatches += 1;
            }
        }
    }
    results.push(TestResult {
        name: "flee_inverts_chase".into(),
        passed: mismatches == 0,
        detail: format!("{} mismatches over a 9x9 neighbourhood", mismatches),
    });

    let mut world = World::new();
    let wanderer = world.spawn((Position::new(6, 0), PatrolPos(Position::new(0, 0)), Team(1)));
    let step = act_once(&mut Patrol::new(3.0), &world, wanderer);
    results.push(TestResult {
        name: "patrol_returns_home".into(),
        passed: step == Action::MoveLeft,
        detail: format!("6 cells from anchor -> {:?}", step),
    });

    let mut rng = StdRng::seed_from_u64(3);
    let mut patrol = Patrol::new(3.0);
    let mut world = World::new();
    let idler = world.spawn((Position::new(1, 1), PatrolPos(Position::new(0, 0)), Team(1)));
    let all_moves = (0..100).all(|_| {
        let mut action = Action::Nop;
        patrol.act(0.0, &world, idler, &mut rng, &mut action);
        action.is_move()
    });
    results.push(TestResult {
        name: "patrol_wanders".into(),
        passed: all_moves,
        detail: "100 in-range steps are all grid moves".into(),
    });

    results
}

// ── 2. Phases ───────────────────────────────────────────────────────────

fn validate_phases() -> Vec<TestResult> {
    println!("--- Phases ---");
    let mut results = Vec::new();

    // Healing
    let mut world = World::new();
    let healer = spawn_healer(&mut world, 0, 0, &HealerParams::default());
    if let Ok(mut cooldown) = world.get::<&mut HealCooldown>(healer) {
        *cooldown = HealCooldown::new(0, 5);
    }
    let ally = world.spawn((Position::new(1, 0), Team(0), Hitpoints(50.0)));
    set_action(&mut world, healer, Action::Heal);
    healing_system(&mut world);
    let ally_hp = hitpoints(&world, ally);
    let cooldown = world.get::<&HealCooldown>(healer).map(|cd| cd.current).unwrap_or(-1);
    results.push(TestResult {
        name: "heal_adjacent_ally".into(),
        passed: ally_hp == Some(65.0) && cooldown == 5,
        detail: format!("ally hp {:?}, healer cooldown {}", ally_hp, cooldown),
    });

    // Spawning
    let mut world = World::new();
    let slime = spawn_slime(&mut world, 2, 2, &SlimeParams::default());
    set_action(&mut world, slime, Action::Spawn);
    let spawned = spawn_system(&mut world);
    let child_pos = spawned
        .first()
        .and_then(|&child| world.get::<&Position>(child).ok().map(|p| *p));
    results.push(TestResult {
        name: "slime_split".into(),
        passed: spawned.len() == 1 && child_pos == Some(Position::new(1, 1)),
        detail: format!("{} offspring at {:?}", spawned.len(), child_pos),
    });

    // Pickups
    let mut world = World::new();
    let player = spawn_player(
        &mut world,
        5,
        5,
        &PlayerParams {
            hitpoints: 80.0,
            ..PlayerParams::default()
        },
    );
    let pickup = spawn_heal_pickup(&mut world, 5, 5, 20.0);
    pickup_system(&mut world);
    let player_hp = hitpoints(&world, player);
    results.push(TestResult {
        name: "heal_pickup".into(),
        passed: player_hp == Some(100.0) && !world.contains(pickup),
        detail: format!("player hp {:?}, pickup left: {}", player_hp, world.contains(pickup)),
    });

    results
}

fn set_action(world: &mut World, entity: Entity, action: Action) {
    if let Ok(mut pending) = world.get::<&mut Action>(entity) {
        *pending = action;
    }
}

fn hitpoints(world: &World, entity: Entity) -> Option<f32> {
    world.get::<&Hitpoints>(entity).ok().map(|hp| hp.0)
}

// ── 3. Scenario run ─────────────────────────────────────────────────────

enum Input {
    Scripted(Vec<Action>),
    Random(StdRng),
}

impl Input {
    fn from_cli(cli: &Cli, seed: u64) -> Self {
        match &cli.script {
            Some(script) => Input::Scripted(
                script
                    .chars()
                    .filter_map(|c| match c {
                        'l' => Some(Action::MoveLeft),
                        'r' => Some(Action::MoveRight),
                        'u' => Some(Action::MoveUp),
                        'd' => Some(Action::MoveDown),
                        '.' => Some(Action::Nop),
                        _ => None,
                    })
                    .collect(),
            ),
            None => Input::Random(StdRng::seed_from_u64(seed ^ 0x9e37_79b9)),
        }
    }

    fn next(&mut self, tick: usize) -> Action {
        match self {
            Input::Scripted(actions) if actions.is_empty() => Action::Nop,
            Input::Scripted(actions) => actions[tick % actions.len()],
            Input::Random(rng) => Action::MOVES[rng.gen_range(0..Action::MOVES.len())],
        }
    }
}

fn run_scenario(cli: &Cli) -> Vec<TestResult> {
    println!("--- Scenario Run ---");
    let mut results = Vec::new();

    let mut scenario = match &cli.scenario {
        Some(path) => match Scenario::from_path(path) {
            Ok(s) => s,
            Err(e) => {
                results.push(TestResult {
                    name: "scenario_load".into(),
                    passed: false,
                    detail: e.to_string(),
                });
                return results;
            }
        },
        None => Scenario::classic(),
    };
    if let Some(seed) = cli.seed {
        scenario.engine.seed = seed;
    }

    let mut engine = match TurnEngine::from_scenario(&scenario) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "scenario_build".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    results.push(TestResult {
        name: "scenario_build".into(),
        passed: true,
        detail: format!("'{}' with {} entities", scenario.name, engine.entity_count()),
    });

    let quota = engine
        .player()
        .and_then(|p| engine.world.get::<&NumActions>(p).ok().map(|q| q.quota))
        .unwrap_or(1)
        .max(1) as u64;

    let mut input = Input::from_cli(cli, scenario.engine.seed);
    let mut gate_violations = 0;
    let mut cadence_violations = 0;
    let mut corpses = 0;
    let mut totals = HashMap::new();

    for tick in 0..cli.turns {
        if engine.player().is_none() {
            println!("  player died after {} ticks", tick);
            break;
        }

        let action = input.next(tick);
        engine.set_player_action(action);
        let report = engine.process_turn();

        if report.gated != (action == Action::Nop) {
            gate_violations += 1;
        }
        if !report.gated && report.full_turn != (engine.ticks() % quota == 0) {
            cadence_violations += 1;
        }
        corpses += engine
            .render_cells()
            .iter()
            .filter(|c| c.hitpoints.map_or(false, |hp| hp <= 0.0))
            .count();

        *totals.entry("moved").or_insert(0) += report.moved;
        *totals.entry("melee").or_insert(0) += report.melee_hits.len();
        *totals.entry("ranged").or_insert(0) += report.ranged_hits.len();
        *totals.entry("heals").or_insert(0) += report.heals.len();
        *totals.entry("spawned").or_insert(0) += report.spawned.len();
        *totals.entry("died").or_insert(0) += report.died.len();
        *totals.entry("pickups").or_insert(0) += report.pickups.len();

        if cli.verbose {
            println!(
                "  tick {:3} {:?}: full={} moved={} blocked={} hits={}/{} died={}",
                tick,
                action,
                report.full_turn,
                report.moved,
                report.blocked.len(),
                report.melee_hits.len(),
                report.ranged_hits.len(),
                report.died.len()
            );
            print_map(&engine);
        }
    }

    results.push(TestResult {
        name: "input_gate".into(),
        passed: gate_violations == 0,
        detail: format!("{} ticks resolved without input or skipped with it", gate_violations),
    });
    results.push(TestResult {
        name: "quota_cadence".into(),
        passed: cadence_violations == 0,
        detail: format!("full turn every {} ticks, {} off-cadence", quota, cadence_violations),
    });
    results.push(TestResult {
        name: "no_corpses".into(),
        passed: corpses == 0,
        detail: format!("{} entities left standing at 0 hp", corpses),
    });

    let mut keys: Vec<_> = totals.iter().collect();
    keys.sort();
    println!(
        "  {} ticks, {} full turns | {}",
        engine.ticks(),
        engine.turns(),
        keys.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    );
    match engine.player_stats() {
        Some(stats) => println!("  HP: {}  POWER: {}", stats.hitpoints, stats.power),
        None => println!("  HP: -  POWER: -"),
    }
    print_map(&engine);

    results
}

// ── ASCII snapshot ──────────────────────────────────────────────────────

fn glyph(world: &World, entity: Entity) -> char {
    if world.get::<&IsPlayer>(entity).is_ok() {
        return '@';
    }
    if let Ok(mob) = world.get::<&MobType>(entity) {
        return match *mob {
            MobType::Human => 'm',
            MobType::Slime => 's',
            MobType::Archer => 'a',
            MobType::Healer => 'h',
            MobType::Crafter => 'c',
        };
    }
    if world.get::<&HealAmount>(entity).is_ok() {
        '+'
    } else if world.get::<&PowerupAmount>(entity).is_ok() {
        '!'
    } else {
        '?'
    }
}

fn print_map(engine: &TurnEngine) {
    let cells = engine.render_cells();
    if cells.is_empty() {
        return;
    }
    let min_x = cells.iter().map(|c| c.position.x).min().unwrap_or(0) - 1;
    let max_x = cells.iter().map(|c| c.position.x).max().unwrap_or(0) + 1;
    let min_y = cells.iter().map(|c| c.position.y).min().unwrap_or(0) - 1;
    let max_y = cells.iter().map(|c| c.position.y).max().unwrap_or(0) + 1;

    let width = (max_x - min_x + 1) as usize;
    let height = (max_y - min_y + 1) as usize;
    let mut grid = vec![vec!['.'; width]; height];
    // later cells draw over earlier ones
    for cell in &cells {
        let col = (cell.position.x - min_x) as usize;
        let row = (cell.position.y - min_y) as usize;
        grid[row][col] = glyph(&engine.world, cell.entity);
    }

    for row in grid {
        println!("    {}", row.into_iter().collect::<String>());
    }
}
