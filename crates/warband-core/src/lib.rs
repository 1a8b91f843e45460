//! Warband Core - turn-based tactical roguelike simulation
//!
//! NPCs on a 2D grid decide what to do through hierarchical finite state
//! machines, then a fixed sequence of resolution phases plays out every
//! entity's pending action at once.
//!
//! # Architecture
//!
//! The world is an Entity Component System via `hecs`:
//! - **Components**: pure data (Position, Hitpoints, Team, Action, ...)
//! - **AI**: states, transition predicates and the machines that own them
//! - **Archetypes**: factories that assemble entities and wire their machines
//! - **Systems**: one function per resolution phase, each snapshot-then-apply
//!
//! # Example
//!
//! ```rust,no_run
//! use warband_core::prelude::*;
//!
//! let mut engine = TurnEngine::from_scenario(&Scenario::classic()).unwrap();
//!
//! loop {
//!     // the input collaborator writes the player's action, then ticks
//!     engine.set_player_action(Action::MoveRight);
//!     let report = engine.process_turn();
//!     if !report.died.is_empty() {
//!         println!("{:?}", engine.player_stats());
//!     }
//! }
//! ```

pub mod ai;
pub mod archetypes;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{EngineConfig, Scenario};
    pub use crate::engine::{PlayerStats, RenderCell, TurnEngine, TurnReport};
    pub use crate::error::{Result, ScenarioError};
}
