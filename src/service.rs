//! Game service: load, mutate, save.
//!
//! Each operation loads the board, applies one mutation, and saves the
//! result. A rejected action or a failed save leaves the stored board as it
//! was.

use thiserror::Error;

use crate::config::GameConfig;
use crate::error::{ActionError, GenError};
use crate::game::{self, Action, ActionOutcome, Board, PlayerHandle, TurnReport};
use crate::store::{BoardStore, StoreError};
use crate::worldgen;

/// Failure of a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Action rejected by the rules.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// Generation failed.
    #[error(transparent)]
    Generation(#[from] GenError),
    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sequences board operations against a store.
#[derive(Debug)]
pub struct GameService<S> {
    store: S,
    config: GameConfig,
}

impl<S: BoardStore> GameService<S> {
    /// Create a service over a store.
    #[must_use]
    pub fn new(store: S, config: GameConfig) -> Self {
        Self { store, config }
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate a new board and store it under `game_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if generation or saving fails.
    pub fn create(
        &mut self,
        game_id: &str,
        owner: &PlayerHandle,
        seed: u64,
    ) -> Result<Board, ServiceError> {
        let board = worldgen::generate(&self.config.world, &self.config.rules, seed)?;
        self.store.save(game_id, owner, &board)?;
        tracing::info!(game_id, %owner, seed, "game created");
        Ok(board)
    }

    /// Load a stored board.
    ///
    /// # Errors
    ///
    /// Returns an error if the game cannot be loaded.
    pub fn board(&self, game_id: &str) -> Result<Board, ServiceError> {
        Ok(self.store.load(game_id)?.board)
    }

    /// Apply a player action and save the result.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the action is rejected, or saving
    /// fails.
    pub fn act(
        &mut self,
        game_id: &str,
        player: &PlayerHandle,
        action: Action,
    ) -> Result<ActionOutcome, ServiceError> {
        let stored = self.store.load(game_id)?;
        let mut board = stored.board;
        let outcome = game::apply(&mut board, &self.config.rules, player, action)?;
        self.store.save(game_id, &stored.owner, &board)?;
        Ok(outcome)
    }

    /// Advance a stored board by one turn and save it.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    pub fn end_turn(
        &mut self,
        game_id: &str,
        player: &PlayerHandle,
    ) -> Result<(Board, TurnReport), ServiceError> {
        let stored = self.store.load(game_id)?;
        let mut board = stored.board;
        let report = game::end_turn(&mut board, &self.config.rules, player);
        self.store.save(game_id, &stored.owner, &board)?;
        Ok((board, report))
    }
}
