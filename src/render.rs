//! ASCII board dump for terminals and logs.
//!
//! Odd rows are indented by one column so the odd-r layout reads as a hex
//! grid:
//!
//! ```text
//! Turn 3  (20 rations / 30 material / 5 weapons)
//!  . , f ^ ~ ~
//!   . E @ S ~ ~
//!  , R . f o ~
//! ```

use std::fmt::Write as _;

use crate::game::{Board, BuildingKind, Tile, UnitKind};
use crate::hex::Coord;

/// Legend printed under the map.
pub const LEGEND: &str = "~ sea  o lake  . plains  , grassland  f forest  ^ mountain  A impassable  = river\n\
@ shelter  $ extractor  * sensor  & fortress\n\
E engineer  S scout  R ranger  H hovercraft  D drone  x raider  n drifter";

/// Which tiles the dump reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Everything, fog ignored.
    #[default]
    Omniscient,
    /// What the colony knows: undiscovered tiles are blank and hostiles
    /// only show on visible tiles.
    Colony,
}

const fn unit_glyph(kind: UnitKind) -> char {
    match kind {
        UnitKind::Engineer => 'E',
        UnitKind::Scout => 'S',
        UnitKind::Ranger => 'R',
        UnitKind::Hovercraft => 'H',
        UnitKind::Drone => 'D',
        UnitKind::Raider => 'x',
        UnitKind::Drifter => 'n',
    }
}

const fn building_glyph(kind: BuildingKind) -> char {
    match kind {
        BuildingKind::Shelter => '@',
        BuildingKind::Extractor => '$',
        BuildingKind::Sensor => '*',
        BuildingKind::Fortress => '&',
    }
}

fn tile_glyph(board: &Board, tile: &Tile, view: View) -> char {
    if view == View::Colony && !tile.discovered {
        return ' ';
    }
    let at = tile.coord();
    let friendly = board
        .pieces
        .iter()
        .chain(&board.neutral_pieces)
        .find(|u| u.position() == at);
    if let Some(unit) = friendly {
        return unit_glyph(unit.kind);
    }
    if (view == View::Omniscient || tile.visible)
        && let Some(raider) = board.hostile_pieces.iter().find(|u| u.position() == at)
    {
        return unit_glyph(raider.kind);
    }
    if let Some(kind) = tile.building {
        return building_glyph(kind);
    }
    if tile.river_present && !tile.terrain.is_water() {
        return '=';
    }
    tile.terrain.glyph()
}

/// Render the board as a hex-staggered character grid with a header.
#[must_use]
pub fn render_ascii(board: &Board, view: View) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Turn {}  ({})", board.turn, board.resources);

    for r in 0..i32::from(board.map.rows()) {
        if r & 1 == 1 {
            output.push(' ');
        }
        for q in 0..i32::from(board.map.cols()) {
            let glyph = board
                .map
                .get(Coord::new(q, r))
                .map_or(' ', |tile| tile_glyph(board, tile, view));
            output.push(' ');
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}

/// One line per unit: faction, id, kind, position, health.
#[must_use]
pub fn render_roster(board: &Board) -> String {
    let mut output = String::new();
    let groups = [
        ("colony", &board.pieces),
        ("hostile", &board.hostile_pieces),
        ("neutral", &board.neutral_pieces),
    ];
    for (label, units) in groups {
        for unit in units {
            let _ = writeln!(
                output,
                "{label:<8} #{:<4} {:<10} at {}  hp {}/{}  moves {}",
                unit.id,
                unit.kind,
                unit.position(),
                unit.stats.current_health,
                unit.stats.health,
                unit.moves_left,
            );
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Map, Terrain, Unit};

    fn small_board() -> Board {
        let mut board = Board::new(Map::new(3, 2).unwrap(), 0);
        board.map.get_mut(Coord::new(2, 0)).unwrap().terrain = Terrain::Water;
        board
            .map
            .get_mut(Coord::new(1, 1))
            .unwrap()
            .place_building(BuildingKind::Shelter);
        board
            .pieces
            .push(Unit::new(1, UnitKind::Engineer, Coord::new(0, 0)));
        board.hostile_pieces.push(Unit::raider(2, Coord::new(0, 1), None));
        board
    }

    #[test]
    fn test_omniscient_dump() {
        let text = render_ascii(&small_board(), View::Omniscient);
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows, vec![" E . ~", "  x @ ."]);
    }

    #[test]
    fn test_colony_view_hides_fog() {
        let mut board = small_board();
        for tile in board.map.tiles_mut() {
            tile.discovered = true;
        }
        board.map.get_mut(Coord::new(2, 1)).unwrap().discovered = false;
        let text = render_ascii(&board, View::Colony);
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows, vec![" E . ~", "  . @  "]);
    }

    #[test]
    fn test_roster_lists_every_unit() {
        let roster = render_roster(&small_board());
        assert_eq!(roster.lines().count(), 2);
        assert!(roster.contains("hostile"));
    }
}
