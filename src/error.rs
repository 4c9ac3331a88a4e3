use crate::puzzle::notation::Twist;
use thiserror::Error;

/// Everything the engine can refuse. None of these leave the cube in a
/// partially turned state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid move notation: {0:?}")]
    InvalidNotation(String),
    #[error("Cannot start {0} while another twist is still turning")]
    MoveRejected(Twist),
}
