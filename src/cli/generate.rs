//! Generate command implementation.

use super::output::{JsonBoardSummary, format_summary_text};
use super::{CliError, OutputFormat, seed_or_clock};
use frontier::render::{self, View};
use frontier::{GameConfig, GameService, JsonFileStore, PlayerHandle};
use std::path::Path;

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if generation or saving fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    mut config: GameConfig,
    store_dir: &Path,
    game: &str,
    owner: &str,
    seed: Option<u64>,
    cols: Option<u16>,
    rows: Option<u16>,
    format: OutputFormat,
) -> Result<(), CliError> {
    if let Some(cols) = cols {
        config.world.cols = cols;
    }
    if let Some(rows) = rows {
        config.world.rows = rows;
    }
    let seed = seed_or_clock(seed);

    let store = JsonFileStore::open(store_dir)?;
    let mut service = GameService::new(store, config);
    let board = service.create(game, &PlayerHandle::new(owner), seed)?;
    let summary = JsonBoardSummary::from_board(game, &board);

    match format {
        OutputFormat::Text => {
            print!("{}", format_summary_text(&summary));
            println!();
            print!("{}", render::render_ascii(&board, View::Colony));
            println!();
            println!("Saved to: {}", service.store().dir().join(format!("{game}.json")).display());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
