use crate::error::EngineError;
use crate::executor::{Executor, MoveObserver, Progress};
use crate::preferences::Preferences;
use crate::puzzle::facelet::{FaceletState, InitialState, RawFaceletState};
use crate::puzzle::notation::Twist;
use crate::puzzle::scramble;
use crate::puzzle::Puzzle;
use crate::queue::{MoveQueue, QueueStatus};
use log::debug;
use rand::Rng;
use std::collections::VecDeque;
use std::path::Path;

/// Who asked for a queued twist, which decides where it is recorded once
/// it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Scramble,
    User,
    /// undo or redo; already recorded when requested
    History,
}

/// One puzzle instance: the executor, its queue and the twist history.
#[derive(Debug, Clone)]
pub struct Session {
    executor: Executor,
    queue: MoveQueue,
    /// origin of the turning twist followed by those of the queued ones
    origins: VecDeque<Origin>,
    initial: FaceletState,
    scramble: Vec<Twist>,
    twists: Vec<Twist>,
    undid_twists: Vec<Twist>,
    scrambling: bool,
}

impl Session {
    pub fn new(initial: FaceletState, quarter_turn_steps: u32) -> Self {
        Self {
            executor: Executor::new(Puzzle::from_facelets(initial.clone()), quarter_turn_steps),
            queue: MoveQueue::new(),
            origins: VecDeque::new(),
            initial,
            scramble: vec![],
            twists: vec![],
            undid_twists: vec![],
            scrambling: false,
        }
    }

    /// Starts from a collaborator's state, falling back to solved.
    pub fn from_raw(raw: Option<&RawFaceletState>, prefs: &Preferences) -> (Self, InitialState) {
        let (state, origin) = FaceletState::ingest(raw);
        (Self::new(state, prefs.animation.quarter_turn_steps), origin)
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.executor.puzzle()
    }

    pub fn facelets(&self) -> &FaceletState {
        self.executor.puzzle().facelets()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn queue(&self) -> &MoveQueue {
        &self.queue
    }

    /// Nothing turning and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.executor.is_idle() && self.queue.is_empty()
    }

    pub fn is_scrambling(&self) -> bool {
        self.scrambling
    }

    pub fn scramble_twists(&self) -> &[Twist] {
        &self.scramble
    }

    /// Settled user twists, oldest first.
    pub fn twists(&self) -> &[Twist] {
        &self.twists
    }

    fn push(&mut self, twists: Vec<Twist>, origin: Origin) {
        self.origins.extend(std::iter::repeat(origin).take(twists.len()));
        self.queue.enqueue(twists, &mut self.executor);
    }

    /// Queues one twist given in notation. It starts right away if nothing
    /// is turning.
    pub fn submit(&mut self, token: &str) -> Result<Twist, EngineError> {
        let twist = token.parse()?;
        self.push(vec![twist], Origin::User);
        Ok(twist)
    }

    /// Queues a batch of twists given in notation. Nothing is queued unless
    /// every token parses.
    pub fn enqueue_notation<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
    ) -> Result<Vec<Twist>, EngineError> {
        let twists = tokens
            .iter()
            .map(|token| token.as_ref().parse())
            .collect::<Result<Vec<Twist>, _>>()?;
        self.push(twists.clone(), Origin::User);
        Ok(twists)
    }

    pub fn enqueue(&mut self, twists: Vec<Twist>) {
        self.push(twists, Origin::User);
    }

    /// Queues a random scramble as one batch. Refused unless idle.
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R, length: usize) -> Option<Vec<Twist>> {
        if !self.is_idle() {
            debug!("not scrambling while twists are pending");
            return None;
        }
        let twists = scramble::scramble(rng, length);
        debug!(
            "scrambling with {}",
            twists.iter().map(Twist::to_string).collect::<Vec<_>>().join(" ")
        );
        self.scrambling = !twists.is_empty();
        self.push(twists.clone(), Origin::Scramble);
        Some(twists)
    }

    /// Turns back the last settled user twist. Refused unless idle.
    pub fn undo(&mut self) -> Option<Twist> {
        if !self.is_idle() {
            return None;
        }
        let twist = self.twists.pop()?;
        self.undid_twists.push(twist);
        // we want the animation this time
        self.push(vec![twist.inverse()], Origin::History);
        Some(twist.inverse())
    }

    /// Redoes the last undone twist. Refused unless idle.
    pub fn redo(&mut self) -> Option<Twist> {
        if !self.is_idle() {
            return None;
        }
        let twist = self.undid_twists.pop()?;
        self.twists.push(twist);
        self.push(vec![twist], Origin::History);
        Some(twist)
    }

    /// Back to solved with an empty history. Refused unless idle, since a
    /// turning twist always runs to the end.
    pub fn reset(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        let quarter_turn_steps = self.executor.quarter_turn_steps();
        *self = Self::new(FaceletState::solved(), quarter_turn_steps);
        true
    }

    /// Drops queued twists that have not started. Returns how many.
    pub fn clear_queue(&mut self) -> usize {
        let dropped = self.queue.clear();
        self.origins.truncate(self.origins.len() - dropped);
        if self.executor.is_idle() {
            self.scrambling = false;
        }
        dropped
    }

    fn record(&mut self, twist: Twist) {
        match self.origins.pop_front() {
            Some(Origin::Scramble) => self.scramble.push(twist),
            Some(Origin::User) => {
                self.twists.push(twist);
                self.undid_twists.clear();
            }
            Some(Origin::History) | None => {}
        }
    }

    /// One scheduler tick: advances the turning twist by a step and, when
    /// it settles, starts the next queued one.
    pub fn tick(&mut self, observer: &mut impl MoveObserver) -> Progress {
        let progress = self.executor.advance(observer);
        if let Progress::Settled(twist) = progress {
            self.record(twist);
            if let QueueStatus::Drained = self.queue.on_settle(&mut self.executor) {
                if self.scrambling {
                    debug!("scramble finished");
                    self.scrambling = false;
                }
                observer.on_drained();
            }
        }
        progress
    }

    /// Ticks until nothing is turning or queued.
    pub fn run(&mut self, observer: &mut impl MoveObserver) {
        while self.tick(observer) != Progress::Idle {}
    }

    pub fn to_log(&self) -> SessionLog {
        let names =
            |twists: &[Twist]| -> Vec<String> { twists.iter().map(Twist::to_string).collect() };
        SessionLog {
            version: env!("CARGO_PKG_VERSION").to_string(),
            initial: self.initial.clone(),
            scramble: names(&self.scramble),
            twists: names(&self.twists),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        std::fs::write(path, serde_json::to_string(&self.to_log())?)?;
        Ok(())
    }

    /// Rebuilds a session from its log by recomputing every twist, without
    /// animating.
    pub fn replay(log: &SessionLog, quarter_turn_steps: u32) -> eyre::Result<Self> {
        let parse = |names: &[String]| {
            names
                .iter()
                .map(|name| name.parse())
                .collect::<Result<Vec<Twist>, EngineError>>()
        };
        let scramble = parse(&log.scramble)?;
        let twists = parse(&log.twists)?;

        let mut puzzle = Puzzle::from_facelets(log.initial.clone());
        for &twist in scramble.iter().chain(&twists) {
            puzzle.twist(twist);
        }

        Ok(Self {
            executor: Executor::new(puzzle, quarter_turn_steps),
            queue: MoveQueue::new(),
            origins: VecDeque::new(),
            initial: log.initial.clone(),
            scramble,
            twists,
            undid_twists: vec![],
            scrambling: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionLog {
    pub version: String,
    pub initial: FaceletState,
    pub scramble: Vec<String>,
    pub twists: Vec<String>,
}

impl SessionLog {
    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{Frame, Settled};
    use crate::puzzle::notation::parse_sequence;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Events {
        settled: Vec<Twist>,
        frames: usize,
        drained: usize,
    }

    impl MoveObserver for Events {
        fn on_frame(&mut self, _frame: &Frame) {
            self.frames += 1;
        }

        fn on_settle(&mut self, settled: &Settled) {
            self.settled.push(settled.twist);
        }

        fn on_drained(&mut self) {
            self.drained += 1;
        }
    }

    fn session() -> Session {
        Session::new(FaceletState::solved(), 3)
    }

    #[test_log::test]
    fn f_waits_for_r() {
        let mut session = session();
        let mut events = Events::default();
        session.submit("R").unwrap();
        session.tick(&mut events);
        session.submit("F").unwrap();
        assert_eq!(session.executor().current(), Some("R".parse().unwrap()));
        assert_eq!(session.queue().len(), 1);

        session.tick(&mut events);
        assert_eq!(session.tick(&mut events), Progress::Settled("R".parse().unwrap()));
        assert_eq!(session.executor().current(), Some("F".parse().unwrap()));

        session.run(&mut events);
        assert_eq!(events.settled, parse_sequence("R F").unwrap());
        assert_eq!(events.frames, 6);
        assert_eq!(events.drained, 1);
        assert_eq!(session.twists(), &parse_sequence("R F").unwrap()[..]);
    }

    #[test]
    fn bad_batch_queues_nothing() {
        let mut session = session();
        assert_eq!(
            session.enqueue_notation(&["R", "U", "X2"]),
            Err(EngineError::InvalidNotation("X2".to_string()))
        );
        assert!(session.is_idle());
        assert!(session.puzzle().is_solved());
    }

    #[test_log::test]
    fn scramble_runs_to_drained() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(42);
        let twists = session.scramble(&mut rng, 20).unwrap();
        assert!(session.is_scrambling());
        assert_eq!(session.scramble(&mut rng, 20), None, "busy sessions refuse");

        let mut events = Events::default();
        session.run(&mut events);
        assert!(!session.is_scrambling());
        assert_eq!(events.drained, 1);
        assert_eq!(session.scramble_twists(), &twists[..]);
        assert!(session.twists().is_empty());

        let expected = twists
            .iter()
            .fold(FaceletState::solved(), |state, &twist| state.apply(twist));
        assert_eq!(session.facelets(), &expected);
        assert!(session.puzzle().is_consistent());
    }

    #[test]
    fn undo_and_redo() {
        let mut session = session();
        session.enqueue_notation(&["R", "U"]).unwrap();
        session.run(&mut ());
        let after_ru = session.facelets().clone();

        assert_eq!(session.undo(), Some("U'".parse().unwrap()));
        session.run(&mut ());
        assert_eq!(
            session.facelets(),
            &FaceletState::solved().apply("R".parse().unwrap())
        );
        assert_eq!(session.undo(), Some("R'".parse().unwrap()));
        session.run(&mut ());
        assert!(session.puzzle().is_solved());
        assert_eq!(session.undo(), None);

        session.redo();
        session.run(&mut ());
        session.redo();
        session.run(&mut ());
        assert_eq!(session.facelets(), &after_ru);
        assert_eq!(session.redo(), None);
    }

    #[test]
    fn new_twist_forgets_redo() {
        let mut session = session();
        session.submit("R").unwrap();
        session.run(&mut ());
        session.undo();
        session.run(&mut ());
        session.submit("U").unwrap();
        session.run(&mut ());
        assert_eq!(session.redo(), None);
    }

    #[test]
    fn clear_queue_keeps_turning_twist() {
        let mut session = session();
        session.enqueue_notation(&["R", "U", "F"]).unwrap();
        assert_eq!(session.clear_queue(), 2);
        session.run(&mut ());
        assert_eq!(session.twists(), &parse_sequence("R").unwrap()[..]);
    }

    #[test]
    fn reset_only_when_idle() {
        let mut session = session();
        session.submit("R").unwrap();
        assert!(!session.reset());
        session.run(&mut ());
        assert!(session.reset());
        assert!(session.puzzle().is_solved());
        assert!(session.twists().is_empty());
    }

    #[test]
    fn log_replays_to_same_state() {
        let mut session = session();
        session.scramble(&mut StdRng::seed_from_u64(1), 10);
        session.run(&mut ());
        session.enqueue_notation(&["R", "U'", "F2"]).unwrap();
        session.run(&mut ());

        let log = session.to_log();
        assert_eq!(log.twists, vec!["R", "U'", "F2"]);

        let path = std::env::temp_dir().join(format!("facelet-log-{}.json", std::process::id()));
        session.save(&path).unwrap();
        let loaded = SessionLog::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, log);

        let replayed = Session::replay(&loaded, 3).unwrap();
        assert_eq!(replayed.facelets(), session.facelets());
        assert_eq!(replayed.twists(), session.twists());
        assert!(replayed.puzzle().is_consistent());
    }

    #[test]
    fn empty_raw_state_starts_solved() {
        let (session, origin) =
            Session::from_raw(Some(&RawFaceletState::new()), &Preferences::default());
        assert_eq!(origin, InitialState::Substituted);
        assert!(session.puzzle().is_solved());
    }
}
