//! File store and game service integration tests.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;

use frontier::game::{Action, PlayerHandle};
use frontier::{
    BoardStore, GameConfig, GameService, JsonFileStore, ServiceError, StoreError, WorldConfig,
    snapshot,
};
use tempfile::TempDir;

fn small_config() -> GameConfig {
    GameConfig {
        world: WorldConfig {
            cols: 14,
            rows: 12,
            ..WorldConfig::default()
        },
        ..GameConfig::default()
    }
}

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut service = GameService::new(JsonFileStore::open(dir.path()).unwrap(), small_config());
    let owner = PlayerHandle::new("ada");
    let created = service.create("alpha", &owner, 31).unwrap();

    assert!(dir.path().join("alpha.json").exists());
    let stored = service.store().load("alpha").unwrap();
    assert_eq!(stored.owner, owner);
    assert_eq!(stored.board, created);
}

#[test]
fn test_turns_persist_between_services() {
    let dir = TempDir::new().unwrap();
    let player = PlayerHandle::new("ada");
    {
        let mut service =
            GameService::new(JsonFileStore::open(dir.path()).unwrap(), small_config());
        service.create("beta", &player, 8).unwrap();
        service.end_turn("beta", &player).unwrap();
        service.end_turn("beta", &player).unwrap();
    }
    let service = GameService::new(JsonFileStore::open(dir.path()).unwrap(), small_config());
    assert_eq!(service.board("beta").unwrap().turn, 3);
}

#[test]
fn test_rejected_move_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let player = PlayerHandle::new("ada");
    let mut service = GameService::new(JsonFileStore::open(dir.path()).unwrap(), small_config());
    let board = service.create("gamma", &player, 4).unwrap();
    let path = dir.path().join("gamma.json");
    let before = fs::read_to_string(&path).unwrap();

    let unit = board.pieces[0].id;
    let far = frontier::Coord::new(-5, -5);
    let err = service
        .act("gamma", &player, Action::Move { unit, to: far })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Action(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_corrupt_file_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let store = JsonFileStore::open(dir.path()).unwrap();
    assert!(matches!(store.load("broken"), Err(StoreError::Json(_))));
    assert!(matches!(store.load("missing"), Err(StoreError::NotFound(_))));
}

#[test]
fn test_snapshot_file_helpers() {
    let dir = TempDir::new().unwrap();
    let mut service = GameService::new(frontier::MemoryStore::new(), small_config());
    let board = service.create("delta", &PlayerHandle::new("ada"), 12).unwrap();
    let path = dir.path().join("board.json");
    snapshot::save_to_path(&board, &path).unwrap();
    assert_eq!(snapshot::load_from_path(&path).unwrap(), board);
}
