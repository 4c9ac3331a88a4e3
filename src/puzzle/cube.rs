use cgmath::Vector3;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer lattice coordinate of a piece or a direction.
/// +X: R, +Y: U, +Z: F
pub type Coord = Vector3<i8>;

pub fn dot(a: Coord, b: Coord) -> i8 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// One of the six faces, doubling as the outward direction it points along.
/// Declared in the order +X, -X, +Y, -Y, +Z, -Z so that maps keyed by
/// face iterate in that order.
#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    R,
    L,
    U,
    D,
    F,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::R, Face::L, Face::U, Face::D, Face::F, Face::B];

    pub fn normal(&self) -> Coord {
        use Face::*;

        match self {
            R => Vector3::new(1, 0, 0),
            L => Vector3::new(-1, 0, 0),
            U => Vector3::new(0, 1, 0),
            D => Vector3::new(0, -1, 0),
            F => Vector3::new(0, 0, 1),
            B => Vector3::new(0, 0, -1),
        }
    }

    pub fn from_normal(normal: Coord) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.normal() == normal)
    }

    pub fn opposite(&self) -> Face {
        use Face::*;

        match self {
            R => L,
            L => R,
            U => D,
            D => U,
            F => B,
            B => F,
        }
    }

    /// Floating point unit vector along the outward axis, for renderers.
    pub fn axis(&self) -> Vector3<f32> {
        self.normal().map(f32::from)
    }

    pub fn letter(&self) -> char {
        use Face::*;

        match self {
            R => 'R',
            L => 'L',
            U => 'U',
            D => 'D',
            F => 'F',
            B => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.letter() == letter)
    }

    /// Turns the direction `self` by a quarter turn of `face` and returns
    /// the direction it ends up pointing along.
    pub fn turn(&self, face: Face, direction: Direction) -> Face {
        let turned = quarter_turn(self.normal(), face, direction);
        Face::from_normal(turned).expect("a quarter turn maps unit axes to unit axes")
    }

    /// Colour of this face on a solved cube.
    pub fn solved_color(&self) -> Color {
        use Face::*;

        match self {
            U => Color::White,
            D => Color::Yellow,
            F => Color::Green,
            B => Color::Blue,
            R => Color::Red,
            L => Color::Orange,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Sense of a quarter turn, as seen looking at the face from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn reverse(&self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Rotates `v` a quarter turn about `face`'s outward axis.
///
/// Clockwise seen from outside is -90° by the right hand rule, which for a
/// unit axis `n` reduces to `n(n·v) - n×v`. Everything stays on the integer
/// lattice, so positions never drift.
pub fn quarter_turn(v: Coord, face: Face, direction: Direction) -> Coord {
    let n = face.normal();
    let along = n * dot(n, v);
    let across = n.cross(v);
    match direction {
        Direction::Clockwise => along - across,
        Direction::CounterClockwise => along + across,
    }
}

#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Yellow,
    Green,
    Blue,
    Red,
    Orange,
}

impl Color {
    pub fn letter(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Red => 'R',
            Color::Orange => 'O',
        }
    }
}

impl FromStr for Color {
    type Err = ();

    /// Accepts full colour names or their initial, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "yellow" | "y" => Ok(Color::Yellow),
            "green" | "g" => Ok(Color::Green),
            "blue" | "b" => Ok(Color::Blue),
            "red" | "r" => Ok(Color::Red),
            "orange" | "o" => Ok(Color::Orange),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
