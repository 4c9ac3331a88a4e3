use crate::puzzle::cube::{Color, Coord, Direction, Face};
use crate::puzzle::notation::Twist;
use cgmath::Vector3;
use enum_map::EnumMap;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::zip;

/// Rows top to bottom, columns left to right, as seen looking at the face
/// from outside. U is seen with B along its top edge, D with F along its
/// top edge, and the four side faces with U along their top edge.
pub type Grid = [[Color; 3]; 3];

/// Three cells of one face, listed in the order they travel in.
type Strip = (Face, [(usize, usize); 3]);

/// The four strips bordering `face`, in the order a clockwise quarter turn
/// carries them: strip k moves onto strip k + 1, cell by cell.
/// Follows standard notation, so "R" carries F's right column up onto U.
#[rustfmt::skip]
fn ring(face: Face) -> [Strip; 4] {
    use Face::*;

    match face {
        R => [
            (F, [(0, 2), (1, 2), (2, 2)]),
            (U, [(0, 2), (1, 2), (2, 2)]),
            (B, [(2, 0), (1, 0), (0, 0)]),
            (D, [(0, 2), (1, 2), (2, 2)]),
        ],
        L => [
            (U, [(0, 0), (1, 0), (2, 0)]),
            (F, [(0, 0), (1, 0), (2, 0)]),
            (D, [(0, 0), (1, 0), (2, 0)]),
            (B, [(2, 2), (1, 2), (0, 2)]),
        ],
        U => [
            (F, [(0, 0), (0, 1), (0, 2)]),
            (L, [(0, 0), (0, 1), (0, 2)]),
            (B, [(0, 0), (0, 1), (0, 2)]),
            (R, [(0, 0), (0, 1), (0, 2)]),
        ],
        D => [
            (F, [(2, 0), (2, 1), (2, 2)]),
            (R, [(2, 0), (2, 1), (2, 2)]),
            (B, [(2, 0), (2, 1), (2, 2)]),
            (L, [(2, 0), (2, 1), (2, 2)]),
        ],
        F => [
            (U, [(2, 0), (2, 1), (2, 2)]),
            (R, [(0, 0), (1, 0), (2, 0)]),
            (D, [(0, 2), (0, 1), (0, 0)]),
            (L, [(2, 2), (1, 2), (0, 2)]),
        ],
        B => [
            (U, [(0, 0), (0, 1), (0, 2)]),
            (L, [(2, 0), (1, 0), (0, 0)]),
            (D, [(2, 2), (2, 1), (2, 0)]),
            (R, [(0, 2), (1, 2), (2, 2)]),
        ],
    }
}

fn index(v: i8) -> usize {
    (v + 1) as usize
}

fn coordinate(i: usize) -> i8 {
    i as i8 - 1
}

/// The grid cell on `face` holding the sticker of the piece at `position`.
/// `position` must lie in `face`'s layer.
pub fn cell_of(face: Face, position: Coord) -> (usize, usize) {
    let Vector3 { x, y, z } = position;
    match face {
        Face::U => (index(z), index(x)),
        Face::D => (index(-z), index(x)),
        Face::F => (index(-y), index(x)),
        Face::B => (index(-y), index(-x)),
        Face::R => (index(-y), index(-z)),
        Face::L => (index(-y), index(z)),
    }
}

/// Position of the piece carrying the sticker at `(row, col)` of `face`.
pub fn position_of(face: Face, row: usize, col: usize) -> Coord {
    let (r, c) = (coordinate(row), coordinate(col));
    match face {
        Face::U => Vector3::new(c, 1, r),
        Face::D => Vector3::new(c, -1, -r),
        Face::F => Vector3::new(c, -r, 1),
        Face::B => Vector3::new(-c, -r, -1),
        Face::R => Vector3::new(1, -r, -c),
        Face::L => Vector3::new(-1, -r, c),
    }
}

/// Whether the initial state was taken as given or replaced by the solved
/// state because it was empty or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialState {
    Supplied,
    Substituted,
}

/// A facelet state as handed over by a collaborator: face letter to rows of
/// colour names, where any cell may be missing.
pub type RawFaceletState = BTreeMap<String, Vec<Vec<Option<String>>>>;

/// Colours of all 54 stickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceletState {
    faces: EnumMap<Face, Grid>,
}

impl Default for FaceletState {
    fn default() -> Self {
        Self::solved()
    }
}

impl FaceletState {
    pub fn solved() -> Self {
        Self {
            faces: EnumMap::from_fn(|face: Face| [[face.solved_color(); 3]; 3]),
        }
    }

    pub fn from_faces(faces: EnumMap<Face, Grid>) -> Self {
        Self { faces }
    }

    /// Takes an externally supplied state. Anything empty or malformed is
    /// replaced by the solved state rather than rejected.
    pub fn ingest(raw: Option<&RawFaceletState>) -> (Self, InitialState) {
        let Some(raw) = raw else {
            warn!("no initial state supplied, starting from solved");
            return (Self::solved(), InitialState::Substituted);
        };

        let blank = raw
            .values()
            .flatten()
            .flatten()
            .all(|cell| cell.as_deref().map_or(true, |name| name.trim().is_empty()));
        if blank {
            warn!("initial state is empty, starting from solved");
            return (Self::solved(), InitialState::Substituted);
        }

        match Self::parse_raw(raw) {
            Ok(state) => (state, InitialState::Supplied),
            Err(reason) => {
                warn!("initial state is malformed ({reason}), starting from solved");
                (Self::solved(), InitialState::Substituted)
            }
        }
    }

    fn parse_raw(raw: &RawFaceletState) -> Result<Self, String> {
        let mut faces = Self::solved().faces;
        for face in Face::ALL {
            let rows = raw
                .get(&face.letter().to_string())
                .ok_or_else(|| format!("face {face} is missing"))?;
            if rows.len() != 3 {
                return Err(format!("face {face} has {} rows", rows.len()));
            }
            for (r, row) in rows.iter().enumerate() {
                if row.len() != 3 {
                    return Err(format!("row {r} of face {face} has {} cells", row.len()));
                }
                for (c, cell) in row.iter().enumerate() {
                    let name = cell
                        .as_deref()
                        .ok_or_else(|| format!("cell ({r}, {c}) of face {face} is empty"))?;
                    faces[face][r][c] = name
                        .parse()
                        .map_err(|()| format!("{name:?} on face {face} is not a colour"))?;
                }
            }
        }
        Ok(Self { faces })
    }

    pub fn face(&self, face: Face) -> &Grid {
        &self.faces[face]
    }

    pub fn get(&self, face: Face, row: usize, col: usize) -> Color {
        self.faces[face][row][col]
    }

    /// Colour of the sticker facing `face` on the piece at `position`.
    pub fn sticker_at(&self, face: Face, position: Coord) -> Color {
        let (row, col) = cell_of(face, position);
        self.faces[face][row][col]
    }

    /// One quarter turn of `face`, leaving `self` untouched.
    pub fn rotate_face(&self, face: Face, direction: Direction) -> Self {
        let mut next = self.clone();

        let grid = &self.faces[face];
        for (i, row) in grid.iter().enumerate() {
            for (j, &color) in row.iter().enumerate() {
                let (ti, tj) = match direction {
                    Direction::Clockwise => (j, 2 - i),
                    Direction::CounterClockwise => (2 - j, i),
                };
                next.faces[face][ti][tj] = color;
            }
        }

        let ring = ring(face);
        for k in 0..ring.len() {
            let (from, to) = match direction {
                Direction::Clockwise => (ring[k], ring[(k + 1) % 4]),
                Direction::CounterClockwise => (ring[(k + 1) % 4], ring[k]),
            };
            for (&(fr, fc), &(tr, tc)) in zip(&from.1, &to.1) {
                next.faces[to.0][tr][tc] = self.faces[from.0][fr][fc];
            }
        }

        next
    }

    pub fn apply(&self, twist: Twist) -> Self {
        let (direction, count) = twist.quarter_turns();
        (0..count).fold(self.clone(), |state, _| {
            state.rotate_face(twist.face(), direction)
        })
    }

    pub fn is_solved(&self) -> bool {
        self.faces
            .values()
            .all(|grid| grid.iter().flatten().all(|&color| color == grid[1][1]))
    }

    pub fn color_counts(&self) -> EnumMap<Color, usize> {
        let mut counts = EnumMap::default();
        for color in self.faces.values().flatten().flatten() {
            counts[*color] += 1;
        }
        counts
    }
}

impl fmt::Display for FaceletState {
    /// Unfolded net: U on top, then L F R B, then D.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let row_str = |face: Face, r: usize| -> String {
            self.faces[face][r]
                .iter()
                .map(|color| color.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        for r in 0..3 {
            writeln!(f, "      {}", row_str(Face::U, r))?;
        }
        for r in 0..3 {
            let middle = [Face::L, Face::F, Face::R, Face::B]
                .iter()
                .map(|&face| row_str(face, r))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{middle}")?;
        }
        for r in 0..3 {
            writeln!(f, "      {}", row_str(Face::D, r))?;
        }
        Ok(())
    }
}
