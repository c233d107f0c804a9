//! Advance command implementation.

use super::output::{JsonTurnReport, format_turn_text};
use super::{CliError, OutputFormat};
use frontier::{GameConfig, GameService, JsonFileStore, PlayerHandle};
use std::path::Path;

/// Execute the advance command.
///
/// Each turn is loaded, advanced, and saved on its own, so an interrupted
/// run leaves the last completed turn on disk.
///
/// # Errors
///
/// Returns an error if the game cannot be loaded or saved.
pub(crate) fn execute(
    config: GameConfig,
    store_dir: &Path,
    game: &str,
    player: &str,
    turns: u32,
    format: OutputFormat,
) -> Result<(), CliError> {
    let store = JsonFileStore::open(store_dir)?;
    let mut service = GameService::new(store, config);
    let player = PlayerHandle::new(player);

    let mut reports = Vec::new();
    for _ in 0..turns {
        let (board, report) = service.end_turn(game, &player)?;
        if format == OutputFormat::Text {
            print!("{}", format_turn_text(&report));
        }
        reports.push(JsonTurnReport::from_report(&report));
        if board.pieces.is_empty() {
            if format == OutputFormat::Text {
                println!("The colony has no units left.");
            }
            break;
        }
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}
