// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Frontier: the deterministic simulation core of a turn-based hex colony
//! game.
//!
//! A board is generated from a seed, mutated by validated player actions,
//! and advanced one turn at a time. Every stochastic choice draws from an
//! RNG derived from the board seed, so a seed and a sequence of actions
//! always reproduce the same board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   GameService  (load, op, save)     │
//! ├─────────────────────────────────────┤
//! │   Turn engine, actions, hostile AI  │
//! ├─────────────────────────────────────┤
//! │   Visibility, combat, economy       │
//! ├─────────────────────────────────────┤
//! │   World generation, hex geometry    │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod hex;
pub mod render;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod worldgen;

pub use config::{ConfigError, GameConfig, RulesConfig, WorldConfig};
pub use error::{ActionError, ActionResult, GenError};
pub use hex::Coord;
pub use service::{GameService, ServiceError};
pub use snapshot::{BoardDocument, SnapshotError};
pub use store::{BoardStore, JsonFileStore, MemoryStore, StoreError, StoredGame};

// Re-export key game types at crate root for convenience
pub use game::{Action, ActionOutcome, Board, PlayerHandle, Tile, TurnReport, Unit};
