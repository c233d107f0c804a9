//! Board storage collaborators.
//!
//! A store loads and saves complete boards by game id. The file store keeps
//! one JSON document per game; the memory store backs tests and the soak
//! runner.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{Board, PlayerHandle};
use crate::snapshot::{BoardDocument, SnapshotError};

/// A board and the player it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredGame {
    /// Owning player.
    pub owner: PlayerHandle,
    /// Board state.
    pub board: Board,
}

/// Storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No game with this id.
    #[error("game {0:?} not found")]
    NotFound(String),
    /// Id cannot name a stored game.
    #[error("invalid game id {0:?}")]
    InvalidId(String),
    /// Filesystem failure.
    #[error("store file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Stored JSON is malformed.
    #[error("stored game is malformed: {0}")]
    Json(#[from] serde_json::Error),
    /// Stored document is not a valid board.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Load and save boards by game id.
pub trait BoardStore {
    /// Load a game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids, or an error if the
    /// stored board cannot be read.
    fn load(&self, game_id: &str) -> Result<StoredGame, StoreError>;

    /// Save a game, replacing any previous state.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be written.
    fn save(
        &mut self,
        game_id: &str,
        owner: &PlayerHandle,
        board: &Board,
    ) -> Result<(), StoreError>;
}

/// Game ids are used as file names: ASCII letters, digits, `-` and `_`.
fn validate_id(game_id: &str) -> Result<(), StoreError> {
    let valid = !game_id.is_empty()
        && game_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(game_id.to_string()))
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: HashMap<String, StoredGame>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl BoardStore for MemoryStore {
    fn load(&self, game_id: &str) -> Result<StoredGame, StoreError> {
        self.games
            .get(game_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(game_id.to_string()))
    }

    fn save(
        &mut self,
        game_id: &str,
        owner: &PlayerHandle,
        board: &Board,
    ) -> Result<(), StoreError> {
        validate_id(game_id)?;
        self.games.insert(
            game_id.to_string(),
            StoredGame {
                owner: owner.clone(),
                board: board.clone(),
            },
        );
        Ok(())
    }
}

/// On-disk record: owner plus board document.
#[derive(Debug, Serialize, Deserialize)]
struct GameRecord {
    owner: String,
    board: BoardDocument,
}

/// One JSON file per game in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the game files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, game_id: &str) -> Result<PathBuf, StoreError> {
        validate_id(game_id)?;
        Ok(self.dir.join(format!("{game_id}.json")))
    }
}

impl BoardStore for JsonFileStore {
    fn load(&self, game_id: &str) -> Result<StoredGame, StoreError> {
        let path = self.path_for(game_id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(game_id.to_string()));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let record: GameRecord = serde_json::from_str(&json)?;
        let board = Board::try_from(record.board)?;
        Ok(StoredGame {
            owner: PlayerHandle::new(record.owner),
            board,
        })
    }

    fn save(
        &mut self,
        game_id: &str,
        owner: &PlayerHandle,
        board: &Board,
    ) -> Result<(), StoreError> {
        let path = self.path_for(game_id)?;
        let record = GameRecord {
            owner: owner.as_str().to_string(),
            board: BoardDocument::from(board),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json).map_err(|source| StoreError::Io { path, source })?;
        tracing::debug!(game_id, "board saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Map;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let board = Board::new(Map::new(4, 4).unwrap(), 1);
        let owner = PlayerHandle::new("ada");
        store.save("g1", &owner, &board).unwrap();
        let loaded = store.load("g1").unwrap();
        assert_eq!(loaded.owner, owner);
        assert_eq!(loaded.board, board);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_game() {
        let store = MemoryStore::new();
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_ids_that_escape_directory_rejected() {
        assert!(validate_id("../etc").is_err());
        assert!(validate_id("").is_err());
        assert!(validate_id("game_01-b").is_ok());
    }
}
