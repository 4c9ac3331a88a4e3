use crate::error::EngineError;
use crate::puzzle::cube::{Direction, Face};
use cgmath::Deg;
use std::fmt;
use std::str::FromStr;

/// A single face turn: `turns` quarter turns clockwise about the face's
/// outward axis. Always one of 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Twist {
    face: Face,
    turns: u8,
}

impl Twist {
    /// Normalises `order` (negative is counter-clockwise) into 1..=3 quarter
    /// turns. Returns `None` for a whole number of revolutions.
    pub fn new(face: Face, order: i8) -> Option<Twist> {
        match order.rem_euclid(4) {
            0 => None,
            turns => Some(Twist {
                face,
                turns: turns as u8,
            }),
        }
    }

    pub fn clockwise(face: Face) -> Twist {
        Twist { face, turns: 1 }
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn turns(&self) -> u8 {
        self.turns
    }

    pub fn inverse(&self) -> Twist {
        Twist {
            face: self.face,
            turns: 4 - self.turns,
        }
    }

    /// How the twist is carried out with the quarter-turn algorithm: three
    /// clockwise quarters are done as one counter-clockwise quarter.
    pub fn quarter_turns(&self) -> (Direction, u8) {
        match self.turns {
            3 => (Direction::CounterClockwise, 1),
            n => (Direction::Clockwise, n),
        }
    }

    /// Signed right-hand angle about the outward axis swept by the twist.
    pub fn angle(&self) -> Deg<f32> {
        let (direction, count) = self.quarter_turns();
        let sign = match direction {
            Direction::Clockwise => -1.0,
            Direction::CounterClockwise => 1.0,
        };
        Deg(sign * 90.0 * count as f32)
    }
}

impl FromStr for Twist {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidNotation(s.to_string());
        let mut chars = s.chars();
        let face = chars
            .next()
            .and_then(Face::from_letter)
            .ok_or_else(invalid)?;
        let turns = match chars.as_str() {
            "" => 1,
            "'" => 3,
            "2" => 2,
            _ => return Err(invalid()),
        };
        Ok(Twist { face, turns })
    }
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let suffix = match self.turns {
            2 => "2",
            3 => "'",
            _ => "",
        };
        write!(f, "{}{}", self.face, suffix)
    }
}

/// Parses a whitespace separated move sequence such as `"R U R' U'"`.
/// Nothing is returned unless every token is valid.
pub fn parse_sequence(s: &str) -> Result<Vec<Twist>, EngineError> {
    s.split_whitespace().map(str::parse).collect()
}
