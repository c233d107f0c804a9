//! Show command implementation.

use super::CliError;
use super::output::{JsonBoardSummary, format_summary_text};
use frontier::render::{self, View};
use frontier::{GameConfig, GameService, JsonFileStore};
use std::path::Path;

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the game cannot be loaded.
pub(crate) fn execute(
    config: GameConfig,
    store_dir: &Path,
    game: &str,
    fog: bool,
    roster: bool,
) -> Result<(), CliError> {
    let store = JsonFileStore::open(store_dir)?;
    let service = GameService::new(store, config);
    let board = service.board(game)?;

    print!("{}", format_summary_text(&JsonBoardSummary::from_board(game, &board)));
    println!();
    let view = if fog { View::Colony } else { View::Omniscient };
    print!("{}", render::render_ascii(&board, view));
    println!();
    println!("{}", render::LEGEND);
    if roster {
        println!();
        print!("{}", render::render_roster(&board));
    }
    Ok(())
}
