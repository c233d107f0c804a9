//! Persisted board document.
//!
//! The document is the camelCase JSON shape exchanged with storage and
//! rendering collaborators. Saving never fails on a valid board; loading
//! validates the grid and the units before building a [`Board`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{
    Board, DEFAULT_SPACING, InvariantViolation, Map, Resources, Tile, Unit, UnitId, check_structure,
};
use crate::hex::Coord;

const fn default_spacing() -> f64 {
    DEFAULT_SPACING
}

/// Serialized form of a [`Board`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    /// Current turn.
    pub turn: u32,
    /// Grid width.
    pub cols: u16,
    /// Grid height.
    pub rows: u16,
    /// Rendered hex size.
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Board seed.
    #[serde(default)]
    pub seed: u64,
    /// Every tile of the grid, in any order.
    pub tiles: Vec<Tile>,
    /// River courses, source first.
    #[serde(default)]
    pub river_paths: Vec<Vec<Coord>>,
    /// Friendly units.
    #[serde(default)]
    pub pieces: Vec<Unit>,
    /// Neutral units.
    #[serde(default)]
    pub neutral_pieces: Vec<Unit>,
    /// Hostile units.
    #[serde(default)]
    pub hostile_pieces: Vec<Unit>,
    /// Stockpile as `[rations, material, weapons]`.
    pub resources: Resources,
}

/// A document that cannot become a board.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Malformed JSON or a field of the wrong shape.
    #[error("malformed board document: {0}")]
    Json(#[from] serde_json::Error),
    /// The file could not be read or written.
    #[error("board file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Turns start at 1.
    #[error("turn must be at least 1")]
    ZeroTurn,
    /// Tiles do not cover the grid exactly once.
    #[error("{found} tiles do not form a complete {cols}x{rows} grid")]
    BadGrid {
        /// Declared width.
        cols: u16,
        /// Declared height.
        rows: u16,
        /// Tiles present.
        found: usize,
    },
    /// A unit stands outside the grid.
    #[error("unit {id} stands off the board at {at}")]
    UnitOffBoard {
        /// Unit id.
        id: UnitId,
        /// Position.
        at: Coord,
    },
    /// Two units share an id.
    #[error("unit id {0} is used more than once")]
    DuplicateUnitId(UnitId),
    /// The board breaks a rule no turn could have produced, such as two
    /// units on one tile or a building without stats.
    #[error("board document is inconsistent: {}", .0.message)]
    Invariant(InvariantViolation),
}

impl From<&Board> for BoardDocument {
    fn from(board: &Board) -> Self {
        Self {
            turn: board.turn,
            cols: board.map.cols(),
            rows: board.map.rows(),
            spacing: board.spacing,
            seed: board.seed,
            tiles: board.map.tiles().to_vec(),
            river_paths: board.river_paths.clone(),
            pieces: board.pieces.clone(),
            neutral_pieces: board.neutral_pieces.clone(),
            hostile_pieces: board.hostile_pieces.clone(),
            resources: board.resources,
        }
    }
}

impl TryFrom<BoardDocument> for Board {
    type Error = SnapshotError;

    fn try_from(doc: BoardDocument) -> Result<Self, Self::Error> {
        if doc.turn == 0 {
            return Err(SnapshotError::ZeroTurn);
        }
        let (cols, rows) = (doc.cols, doc.rows);
        let map = Map::from_tiles(cols, rows, doc.tiles).map_err(|tiles| SnapshotError::BadGrid {
            cols,
            rows,
            found: tiles.len(),
        })?;

        let mut ids = HashSet::new();
        for unit in doc
            .pieces
            .iter()
            .chain(&doc.neutral_pieces)
            .chain(&doc.hostile_pieces)
        {
            if !map.in_bounds(unit.position()) {
                return Err(SnapshotError::UnitOffBoard {
                    id: unit.id,
                    at: unit.position(),
                });
            }
            if !ids.insert(unit.id) {
                return Err(SnapshotError::DuplicateUnitId(unit.id));
            }
        }

        let board = Self {
            map,
            spacing: doc.spacing,
            seed: doc.seed,
            turn: doc.turn,
            resources: doc.resources,
            river_paths: doc.river_paths,
            pieces: doc.pieces,
            hostile_pieces: doc.hostile_pieces,
            neutral_pieces: doc.neutral_pieces,
        };
        match check_structure(&board).into_iter().next() {
            Some(violation) => Err(SnapshotError::Invariant(violation)),
            None => Ok(board),
        }
    }
}

/// Serialize a board to pretty JSON.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn to_json(board: &Board) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(&BoardDocument::from(board))?)
}

/// Parse and validate a board from JSON.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the document is invalid.
pub fn from_json(json: &str) -> Result<Board, SnapshotError> {
    let doc: BoardDocument = serde_json::from_str(json)?;
    Board::try_from(doc)
}

/// Write a board document to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_to_path(board: &Board, path: &Path) -> Result<(), SnapshotError> {
    let json = to_json(board)?;
    fs::write(path, json).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a board document from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds an invalid document.
pub fn load_from_path(path: &Path) -> Result<Board, SnapshotError> {
    let json = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RulesConfig, WorldConfig};
    use crate::worldgen;

    fn sample_board() -> Board {
        let world = WorldConfig {
            cols: 12,
            rows: 10,
            ..WorldConfig::default()
        };
        worldgen::generate(&world, &RulesConfig::default(), 2024).unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let board = sample_board();
        let json = to_json(&board).unwrap();
        assert_eq!(from_json(&json).unwrap(), board);
    }

    #[test]
    fn test_document_field_names() {
        let board = sample_board();
        let value = serde_json::to_value(BoardDocument::from(&board)).unwrap();
        for key in [
            "turn",
            "cols",
            "rows",
            "spacing",
            "seed",
            "tiles",
            "riverPaths",
            "pieces",
            "neutralPieces",
            "hostilePieces",
            "resources",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["resources"].is_array());
        assert!(value["tiles"][0].get("type").is_some());
    }

    #[test]
    fn test_missing_tile_rejected() {
        let board = sample_board();
        let mut doc = BoardDocument::from(&board);
        doc.tiles.pop();
        assert!(matches!(
            Board::try_from(doc),
            Err(SnapshotError::BadGrid { found: 119, .. })
        ));
    }

    #[test]
    fn test_unit_off_board_rejected() {
        let board = sample_board();
        let mut doc = BoardDocument::from(&board);
        doc.pieces[0].place(Coord::new(40, 40));
        assert!(matches!(
            Board::try_from(doc),
            Err(SnapshotError::UnitOffBoard { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let board = sample_board();
        let mut doc = BoardDocument::from(&board);
        let copy = doc.pieces[0].clone();
        doc.neutral_pieces.push(copy);
        assert!(matches!(
            Board::try_from(doc),
            Err(SnapshotError::DuplicateUnitId(_))
        ));
    }

    fn reload(doc: &BoardDocument) -> Result<Board, SnapshotError> {
        from_json(&serde_json::to_string(doc).unwrap())
    }

    #[test]
    fn test_stacked_units_rejected() {
        let board = sample_board();
        let mut doc = BoardDocument::from(&board);
        let at = doc.pieces[0].position();
        doc.pieces[1].place(at);
        let err = reload(&doc).unwrap_err();
        assert!(matches!(err, SnapshotError::Invariant(_)));
        assert!(err.to_string().contains("share tile"));
    }

    #[test]
    fn test_impossible_values_rejected() {
        let board = sample_board();

        let mut doc = BoardDocument::from(&board);
        doc.tiles[0].height = 0;
        assert!(matches!(reload(&doc), Err(SnapshotError::Invariant(_))));

        let mut doc = BoardDocument::from(&board);
        doc.pieces[0].moves_left = 99;
        assert!(matches!(reload(&doc), Err(SnapshotError::Invariant(_))));
    }

    #[test]
    fn test_stale_fog_flags_accepted() {
        let board = sample_board();
        let mut doc = BoardDocument::from(&board);
        for tile in &mut doc.tiles {
            tile.visible = true;
            tile.discovered = false;
        }
        assert!(reload(&doc).is_ok());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            from_json("{\"turn\": 1"),
            Err(SnapshotError::Json(_))
        ));
        assert!(matches!(
            from_json("{\"turn\": 1, \"cols\": 1, \"rows\": 1, \"tiles\": [{\"q\":0,\"r\":0,\"type\":\"lava\",\"height\":1}], \"resources\": [0,0,0]}"),
            Err(SnapshotError::Json(_))
        ));
    }
}
