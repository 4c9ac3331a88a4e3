use crate::error::EngineError;
use crate::puzzle::facelet::FaceletState;
use crate::puzzle::notation::Twist;
use crate::puzzle::piece::{PieceAnimation, PieceId};
use crate::puzzle::Puzzle;
use cgmath::{Deg, Matrix4, Vector3};
use log::{debug, trace, warn};

pub const DEFAULT_QUARTER_TURN_STEPS: u32 = 10;
/// Largest quarter turn step count, so a half turn's count still fits.
pub const MAX_QUARTER_TURN_STEPS: u32 = u32::MAX / 2;

/// What a renderer needs to draw one animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub twist: Twist,
    /// unit vector along the turning face's outward axis
    pub axis: Vector3<f32>,
    /// signed right-hand rotation about `axis` reached at this frame
    pub angle: Deg<f32>,
    pub layer: Vec<PieceId>,
    pub step: u32,
    pub steps: u32,
}

impl Frame {
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_axis_angle(self.axis, self.angle)
    }
}

/// Emitted once per committed twist.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    pub twist: Twist,
    pub state: FaceletState,
}

/// Receives the executor's output. Every method defaults to doing nothing.
pub trait MoveObserver {
    fn on_frame(&mut self, _frame: &Frame) {}
    fn on_settle(&mut self, _settled: &Settled) {}
    /// The queue ran out after a settle.
    fn on_drained(&mut self) {}
}

impl MoveObserver for () {}

/// The twist currently turning.
#[derive(Debug, Clone)]
pub struct Animation {
    twist: Twist,
    layer: Vec<PieceId>,
    step: u32,
    steps: u32,
}

impl Animation {
    pub fn twist(&self) -> Twist {
        self.twist
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Angle after `step` steps, always an exact fraction of the whole so
    /// the last step lands on the target.
    fn angle_at(&self, step: u32) -> Deg<f32> {
        if step >= self.steps {
            return self.twist.angle();
        }
        Deg(self.twist.angle().0 * step as f32 / self.steps as f32)
    }
}

#[derive(Debug, Clone, Default)]
pub enum ExecutorState {
    #[default]
    Idle,
    Animating(Animation),
}

/// Result of one `advance` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Nothing is turning.
    Idle,
    /// A frame was emitted and the twist is still turning.
    Turning,
    /// The final frame was emitted and the twist committed.
    Settled(Twist),
}

/// Turns one twist at a time. The facelets and pieces only change when a
/// twist settles, all at once.
#[derive(Debug, Clone)]
pub struct Executor {
    puzzle: Puzzle,
    state: ExecutorState,
    quarter_turn_steps: u32,
}

impl Executor {
    pub fn new(puzzle: Puzzle, quarter_turn_steps: u32) -> Self {
        Self {
            puzzle,
            state: ExecutorState::Idle,
            quarter_turn_steps: quarter_turn_steps.clamp(1, MAX_QUARTER_TURN_STEPS),
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn quarter_turn_steps(&self) -> u32 {
        self.quarter_turn_steps
    }

    pub fn state(&self) -> &ExecutorState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ExecutorState::Idle)
    }

    pub fn current(&self) -> Option<Twist> {
        match &self.state {
            ExecutorState::Idle => None,
            ExecutorState::Animating(animation) => Some(animation.twist),
        }
    }

    /// Starts turning `twist`. Refused while another twist is turning.
    pub fn submit(&mut self, twist: Twist) -> Result<(), EngineError> {
        if let ExecutorState::Animating(current) = &self.state {
            warn!("rejecting {twist}: {} is still turning", current.twist);
            return Err(EngineError::MoveRejected(twist));
        }
        // a half turn sweeps twice the angle in twice the steps
        let steps = self
            .quarter_turn_steps
            .saturating_mul(twist.quarter_turns().1 as u32);
        let layer = self.puzzle.layer(twist.face());
        debug!("starting {twist} over {steps} steps");
        self.state = ExecutorState::Animating(Animation {
            twist,
            layer,
            step: 0,
            steps,
        });
        Ok(())
    }

    pub fn submit_notation(&mut self, token: &str) -> Result<Twist, EngineError> {
        let twist = token.parse()?;
        self.submit(twist)?;
        Ok(twist)
    }

    /// Moves the current twist one step along and reports it to `observer`.
    /// The call that reaches the final angle also commits the twist.
    pub fn advance(&mut self, observer: &mut impl MoveObserver) -> Progress {
        let ExecutorState::Animating(animation) = &mut self.state else {
            return Progress::Idle;
        };

        animation.step = (animation.step + 1).min(animation.steps);
        let frame = Frame {
            twist: animation.twist,
            axis: animation.twist.face().axis(),
            angle: animation.angle_at(animation.step),
            layer: animation.layer.clone(),
            step: animation.step,
            steps: animation.steps,
        };
        trace!("{}: step {}/{} at {:?}", frame.twist, frame.step, frame.steps, frame.angle);

        if frame.step < frame.steps {
            self.puzzle.animate(
                &frame.layer,
                PieceAnimation {
                    axis: frame.axis,
                    angle: frame.angle,
                },
            );
            observer.on_frame(&frame);
            return Progress::Turning;
        }

        observer.on_frame(&frame);
        let twist = frame.twist;
        self.puzzle.twist(twist);
        self.state = ExecutorState::Idle;
        debug!("settled {twist}");
        observer.on_settle(&Settled {
            twist,
            state: self.puzzle.facelets().clone(),
        });
        Progress::Settled(twist)
    }

    /// Drives the current twist, if any, until it settles.
    pub fn finish(&mut self, observer: &mut impl MoveObserver) -> Option<Twist> {
        loop {
            match self.advance(observer) {
                Progress::Idle => return None,
                Progress::Turning => continue,
                Progress::Settled(twist) => return Some(twist),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::cube::Face;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        settled: Vec<Settled>,
    }

    impl MoveObserver for Recorder {
        fn on_frame(&mut self, frame: &Frame) {
            self.frames.push(frame.clone());
        }

        fn on_settle(&mut self, settled: &Settled) {
            self.settled.push(settled.clone());
        }
    }

    fn executor() -> Executor {
        Executor::new(Puzzle::make_solved(), DEFAULT_QUARTER_TURN_STEPS)
    }

    #[test_log::test]
    fn quarter_turn_runs_ten_frames_then_settles() {
        let mut exec = executor();
        let mut rec = Recorder::default();
        exec.submit_notation("R").unwrap();
        for _ in 0..9 {
            assert_eq!(exec.advance(&mut rec), Progress::Turning);
            assert!(exec.puzzle().is_solved(), "nothing commits mid-turn");
        }
        assert_eq!(exec.advance(&mut rec), Progress::Settled("R".parse().unwrap()));
        assert!(exec.is_idle());
        assert_eq!(rec.frames.len(), 10);
        assert_eq!(rec.frames.last().unwrap().angle, Deg(-90.0));
        assert_eq!(rec.frames[4].angle, Deg(-45.0));
        assert_eq!(rec.settled.len(), 1);
        assert_eq!(&rec.settled[0].state, exec.puzzle().facelets());
        assert_eq!(exec.advance(&mut rec), Progress::Idle);
    }

    #[test]
    fn half_turn_keeps_angular_velocity() {
        let mut exec = executor();
        let mut rec = Recorder::default();
        exec.submit_notation("U2").unwrap();
        exec.finish(&mut rec);
        assert_eq!(rec.frames.len(), 20);
        assert_eq!(rec.frames[0].angle, Deg(-9.0));
        assert_eq!(rec.frames[19].angle, Deg(-180.0));
        assert_eq!(rec.frames[0].axis, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn prime_turns_the_other_way() {
        let mut exec = executor();
        let mut rec = Recorder::default();
        exec.submit_notation("F'").unwrap();
        exec.finish(&mut rec);
        assert_eq!(rec.frames.len(), 10);
        assert_eq!(rec.frames[9].angle, Deg(90.0));
    }

    #[test_log::test]
    fn second_submit_is_rejected_while_turning() {
        let mut exec = executor();
        exec.submit_notation("R").unwrap();
        exec.advance(&mut ());
        assert_eq!(
            exec.submit_notation("F"),
            Err(EngineError::MoveRejected("F".parse().unwrap()))
        );
        assert_eq!(exec.current(), Some("R".parse().unwrap()));
        exec.finish(&mut ());
        assert_eq!(
            exec.puzzle().facelets(),
            &crate::puzzle::facelet::FaceletState::solved().apply("R".parse().unwrap())
        );
    }

    #[test]
    fn invalid_notation_changes_nothing() {
        let mut exec = executor();
        assert_eq!(
            exec.submit_notation("R3"),
            Err(EngineError::InvalidNotation("R3".to_string()))
        );
        assert!(exec.is_idle());
        assert!(exec.puzzle().is_solved());
    }

    #[test]
    fn layer_pieces_animate_and_reset() {
        let mut exec = executor();
        let layer = exec.puzzle().layer(Face::U);
        exec.submit_notation("U").unwrap();
        exec.advance(&mut ());
        for &id in &layer {
            let animation = exec.puzzle().pieces()[id].animation().copied();
            assert_eq!(animation.map(|a| a.angle), Some(Deg(-9.0)));
        }
        exec.finish(&mut ());
        assert!(exec.puzzle().pieces().iter().all(|p| p.animation().is_none()));
        assert!(exec.puzzle().is_consistent());
    }

    #[test]
    fn zero_steps_still_animates_once() {
        let mut exec = Executor::new(Puzzle::make_solved(), 0);
        exec.submit_notation("D").unwrap();
        assert_eq!(exec.advance(&mut ()), Progress::Settled("D".parse().unwrap()));
    }

    #[test]
    fn huge_step_count_from_preferences() {
        let prefs: crate::preferences::Preferences =
            serde_json::from_str(r#"{"animation": {"quarter_turn_steps": 4294967295}}"#).unwrap();
        let mut exec = Executor::new(Puzzle::make_solved(), prefs.animation.quarter_turn_steps);
        assert_eq!(exec.quarter_turn_steps(), MAX_QUARTER_TURN_STEPS);
        exec.submit_notation("U2").unwrap();
        assert_eq!(exec.advance(&mut ()), Progress::Turning);
        let ExecutorState::Animating(animation) = exec.state() else {
            panic!("U2 should be turning");
        };
        assert_eq!(animation.steps(), MAX_QUARTER_TURN_STEPS * 2);
        assert_eq!(animation.step(), 1);
    }
}
