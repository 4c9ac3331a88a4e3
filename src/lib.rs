//! State and move execution for a 3x3x3 cube: facelets, pieces, notation,
//! a one-twist-at-a-time animated executor and the queue that feeds it.

pub mod error;
pub mod executor;
pub mod preferences;
pub mod puzzle;
pub mod queue;
pub mod session;
pub mod solution;

pub use error::EngineError;
pub use executor::{Executor, Frame, MoveObserver, Progress, Settled};
pub use puzzle::cube::{Color, Direction, Face};
pub use puzzle::facelet::{FaceletState, InitialState, RawFaceletState};
pub use puzzle::notation::{parse_sequence, Twist};
pub use puzzle::Puzzle;
pub use queue::{MoveQueue, QueueStatus};
pub use session::{Session, SessionLog};
pub use solution::SolutionPlan;
