//! Hex grid geometry for the odd-r offset layout.
//!
//! Tiles are addressed by `(q, r)` where `r` is the row and `q` the column.
//! Odd rows are shifted half a cell to the right, so the neighbor table
//! depends on row parity. Distance and line tracing go through cube
//! coordinates.

// Line interpolation rounds through f64 and back.
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Neighbor offsets `(dq, dr)` for tiles on an even row.
const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)];

/// Neighbor offsets `(dq, dr)` for tiles on an odd row.
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (0, 1), (1, 1)];

/// Offset coordinate of a tile on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    /// Column.
    pub q: i32,
    /// Row.
    pub r: i32,
}

/// Cube coordinate with the `x + y + z == 0` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    /// X axis.
    pub x: i32,
    /// Y axis.
    pub y: i32,
    /// Z axis (equal to the offset row).
    pub z: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The six neighbors of this tile, in a fixed order starting east and
    /// turning counter-clockwise.
    ///
    /// Coordinates outside the board are included; callers filter by bounds.
    #[must_use]
    pub fn neighbors(self) -> [Coord; 6] {
        let table = if self.r & 1 == 0 {
            &EVEN_ROW_OFFSETS
        } else {
            &ODD_ROW_OFFSETS
        };
        table.map(|(dq, dr)| Coord::new(self.q + dq, self.r + dr))
    }

    /// Check whether `other` is one of the six neighbors.
    #[must_use]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.distance(other) == 1
    }

    /// Convert to cube coordinates.
    #[must_use]
    pub const fn to_cube(self) -> Cube {
        let x = self.q - (self.r - (self.r & 1)) / 2;
        let z = self.r;
        Cube { x, y: -x - z, z }
    }

    /// Hex distance between two tiles.
    #[must_use]
    pub const fn distance(self, other: Coord) -> u32 {
        let a = self.to_cube();
        let b = other.to_cube();
        (a.x.abs_diff(b.x) + a.y.abs_diff(b.y) + a.z.abs_diff(b.z)) / 2
    }

    /// Rendered center of the tile for a pointy-top layout with the given
    /// hex size.
    #[must_use]
    pub fn pixel(self, spacing: f64) -> (f64, f64) {
        let shift = if self.r & 1 == 0 { 0.0 } else { 0.5 };
        let x = spacing * 3f64.sqrt() * (f64::from(self.q) + shift);
        let y = spacing * 1.5 * f64::from(self.r);
        (x, y)
    }

    /// Squared Euclidean distance between the rendered centers of two tiles.
    #[must_use]
    pub fn pixel_distance_sq(self, other: Coord, spacing: f64) -> f64 {
        let (ax, ay) = self.pixel(spacing);
        let (bx, by) = other.pixel(spacing);
        (ax - bx).powi(2) + (ay - by).powi(2)
    }

    /// All coordinates within `radius` of this tile (inclusive), row by row.
    ///
    /// Like [`Coord::neighbors`], this ignores board bounds.
    #[must_use]
    pub fn within(self, radius: u32) -> Vec<Coord> {
        let reach = i32::try_from(radius).unwrap_or(i32::MAX / 4);
        let mut out = Vec::new();
        for r in (self.r - reach)..=(self.r + reach) {
            for q in (self.q - reach - 1)..=(self.q + reach + 1) {
                let coord = Coord::new(q, r);
                if self.distance(coord) <= radius {
                    out.push(coord);
                }
            }
        }
        out
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl Cube {
    /// Convert back to offset coordinates.
    #[must_use]
    pub const fn to_coord(self) -> Coord {
        Coord::new(self.x + (self.z - (self.z & 1)) / 2, self.z)
    }

    /// Round a fractional cube position to the nearest valid hex.
    ///
    /// The axis with the largest rounding error is recomputed from the other
    /// two so the result keeps `x + y + z == 0`.
    #[must_use]
    pub fn round(x: f64, y: f64, z: f64) -> Self {
        let mut rx = x.round();
        let mut ry = y.round();
        let mut rz = z.round();

        let dx = (rx - x).abs();
        let dy = (ry - y).abs();
        let dz = (rz - z).abs();

        if dx > dy && dx > dz {
            rx = -ry - rz;
        } else if dy > dz {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        Self {
            x: rx as i32,
            y: ry as i32,
            z: rz as i32,
        }
    }
}

/// Trace the tiles on the straight line from `a` to `b`, both inclusive.
///
/// The result always has `a.distance(b) + 1` entries.
#[must_use]
pub fn line(a: Coord, b: Coord) -> Vec<Coord> {
    let steps = a.distance(b);
    if steps == 0 {
        return vec![a];
    }

    let ca = a.to_cube();
    let cb = b.to_cube();
    let lerp = |from: i32, to: i32, t: f64| f64::from(from) + f64::from(to - from) * t;

    (0..=steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            Cube::round(lerp(ca.x, cb.x, t), lerp(ca.y, cb.y, t), lerp(ca.z, cb.z, t)).to_coord()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_even_row() {
        let n = Coord::new(3, 2).neighbors();
        assert_eq!(
            n,
            [
                Coord::new(4, 2),
                Coord::new(3, 1),
                Coord::new(2, 1),
                Coord::new(2, 2),
                Coord::new(2, 3),
                Coord::new(3, 3),
            ]
        );
    }

    #[test]
    fn test_neighbors_odd_row() {
        let n = Coord::new(3, 3).neighbors();
        assert_eq!(
            n,
            [
                Coord::new(4, 3),
                Coord::new(4, 2),
                Coord::new(3, 2),
                Coord::new(2, 3),
                Coord::new(3, 4),
                Coord::new(4, 4),
            ]
        );
    }

    #[test]
    fn test_neighbors_are_distance_one() {
        for center in [Coord::new(0, 0), Coord::new(5, 5), Coord::new(2, 7)] {
            for n in center.neighbors() {
                assert_eq!(center.distance(n), 1, "{center} -> {n}");
            }
        }
    }

    #[test]
    fn test_cube_round_trip() {
        for r in -3..6 {
            for q in -3..6 {
                let c = Coord::new(q, r);
                assert_eq!(c.to_cube().to_coord(), c);
            }
        }
    }

    #[test]
    fn test_distance() {
        assert_eq!(Coord::new(0, 0).distance(Coord::new(0, 0)), 0);
        assert_eq!(Coord::new(0, 0).distance(Coord::new(3, 0)), 3);
        assert_eq!(Coord::new(0, 0).distance(Coord::new(0, 4)), 4);
        assert_eq!(Coord::new(1, 1).distance(Coord::new(4, 5)), 5);
    }

    #[test]
    fn test_line_endpoints_and_length() {
        let a = Coord::new(1, 1);
        let b = Coord::new(6, 4);
        let path = line(a, b);
        assert_eq!(path.len() as u32, a.distance(b) + 1);
        assert_eq!(path[0], a);
        assert_eq!(*path.last().unwrap(), b);
    }

    #[test]
    fn test_line_single_tile() {
        let a = Coord::new(4, 4);
        assert_eq!(line(a, a), vec![a]);
    }

    #[test]
    fn test_line_steps_are_adjacent_on_straight_row() {
        let path = line(Coord::new(0, 2), Coord::new(5, 2));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn test_within_counts() {
        let center = Coord::new(10, 10);
        assert_eq!(center.within(0).len(), 1);
        assert_eq!(center.within(1).len(), 7);
        assert_eq!(center.within(2).len(), 19);
    }

    #[test]
    fn test_pixel_odd_row_shift() {
        let (x0, _) = Coord::new(0, 0).pixel(1.0);
        let (x1, y1) = Coord::new(0, 1).pixel(1.0);
        assert!(x1 > x0);
        assert!((y1 - 1.5).abs() < 1e-9);
    }
}
