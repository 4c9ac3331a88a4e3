use crate::error::EngineError;
use crate::puzzle::notation::Twist;
use std::ops::Range;

/// How a solver's move list is split into named steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Cfop,
    Beginner,
    Generic,
}

impl Method {
    /// Recognises a solver's method label, e.g. "CFOP Method". No label
    /// means CFOP.
    pub fn detect(label: Option<&str>) -> Self {
        match label {
            None => Method::Cfop,
            Some(label) if label.contains("CFOP") => Method::Cfop,
            Some(label) if label.contains("Beginner") => Method::Beginner,
            Some(_) => Method::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionStep {
    pub title: String,
    pub description: String,
    /// indices into the whole move list
    pub moves: Range<usize>,
}

impl SolutionStep {
    fn new(title: impl Into<String>, description: impl Into<String>, moves: Range<usize>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            moves,
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

#[rustfmt::skip]
const CFOP: [(&str, &str); 4] = [
    ("Cross", "Form the white cross on the bottom layer"),
    ("F2L",   "First two layers: Pair corners with edges"),
    ("OLL",   "Orient last layer: Make the top face all yellow"),
    ("PLL",   "Permute last layer: Arrange the final pieces"),
];

#[rustfmt::skip]
const BEGINNER: [(&str, &str); 5] = [
    ("White Cross",   "Create a white cross on the bottom"),
    ("White Corners", "Position the white corner pieces"),
    ("Middle Layer",  "Solve the middle layer edges"),
    ("Yellow Face",   "Make the top face yellow"),
    ("Final Layer",   "Position the final layer pieces"),
];

/// Splits `0..n` at the given cut points, floored fractions of `n`.
fn cut(n: usize, fractions: &[(usize, usize)]) -> Vec<Range<usize>> {
    let mut start = 0;
    let mut ranges = vec![];
    for &(num, den) in fractions {
        let end = (n * num / den).max(start);
        ranges.push(start..end);
        start = end;
    }
    ranges.push(start..n);
    ranges
}

/// A solver's answer grouped into steps for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionPlan {
    method: Method,
    moves: Vec<Twist>,
    steps: Vec<SolutionStep>,
}

impl SolutionPlan {
    pub fn new(solution: &str, method: Option<&str>) -> Result<Self, EngineError> {
        let moves = solution
            .split_whitespace()
            .map(str::parse::<Twist>)
            .collect::<Result<Vec<Twist>, _>>()?;
        let method = Method::detect(method);
        let n = moves.len();

        let steps = match method {
            Method::Cfop => CFOP
                .iter()
                .zip(cut(n, &[(1, 4), (3, 5), (4, 5)]))
                .map(|(&(title, description), range)| SolutionStep::new(title, description, range))
                .collect(),
            Method::Beginner => BEGINNER
                .iter()
                .zip(cut(n, &[(1, 5), (2, 5), (3, 5), (4, 5)]))
                .map(|(&(title, description), range)| SolutionStep::new(title, description, range))
                .collect(),
            Method::Generic => {
                let size = n.div_ceil(5).max(1);
                (0..n)
                    .step_by(size)
                    .enumerate()
                    .map(|(k, start)| {
                        let end = (start + size).min(n);
                        SolutionStep::new(
                            format!("Step {}", k + 1),
                            format!("Solution moves {}-{}", start + 1, end),
                            start..end,
                        )
                    })
                    .collect()
            }
        };

        Ok(Self { method, moves, steps })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn moves(&self) -> &[Twist] {
        &self.moves
    }

    pub fn total_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn steps(&self) -> &[SolutionStep] {
        &self.steps
    }

    pub fn step_moves(&self, step: usize) -> &[Twist] {
        self.steps
            .get(step)
            .map_or(&[][..], |s| &self.moves[s.moves.clone()])
    }

    /// The step holding move `index`; past the end this is the last step.
    pub fn step_for_move(&self, index: usize) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| index < step.moves.end)
            .or(self.steps.len().checked_sub(1))
    }

    /// Index into the whole move list of the `relative`th move of `step`.
    pub fn absolute_index(&self, step: usize, relative: usize) -> usize {
        self.steps[..step.min(self.steps.len())]
            .iter()
            .map(SolutionStep::len)
            .sum::<usize>()
            + relative
    }

    /// Percentage of `step` done once move `current` has been played.
    pub fn step_progress(&self, step: usize, current: Option<usize>) -> f32 {
        let Some(current) = current else {
            return 0.0;
        };
        let Some(this) = self.steps.get(step) else {
            return 0.0;
        };
        if self.step_for_move(current) == Some(step) {
            let done = current + 1 - this.moves.start;
            (done as f32 / this.len() as f32 * 100.0).min(100.0)
        } else if current >= this.moves.end {
            100.0
        } else {
            0.0
        }
    }

    /// The twists that take the scrambled state to the position just after
    /// move `index`.
    pub fn moves_through(&self, index: usize) -> &[Twist] {
        &self.moves[..(index + 1).min(self.moves.len())]
    }
}
