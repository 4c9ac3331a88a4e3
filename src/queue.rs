use crate::executor::Executor;
use crate::puzzle::notation::Twist;
use log::debug;
use std::collections::VecDeque;

/// What the queue did after a settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Dispatched(Twist),
    Drained,
    /// The executor had not settled yet; nothing was started.
    Busy,
}

/// Twists waiting for the executor, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MoveQueue {
    pending: VecDeque<Twist>,
}

impl MoveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Twist> {
        self.pending.iter()
    }

    /// Appends `twists` and, if nothing is turning, starts the first one
    /// right away. Returns the twist started, if any.
    pub fn enqueue<I>(&mut self, twists: I, executor: &mut Executor) -> Option<Twist>
    where
        I: IntoIterator<Item = Twist>,
    {
        let before = self.pending.len();
        self.pending.extend(twists);
        debug!("queued {} twists", self.pending.len() - before);
        if executor.is_idle() {
            self.dispatch(executor)
        } else {
            None
        }
    }

    /// Called after the executor settles: starts the next twist or reports
    /// that the queue is drained.
    pub fn on_settle(&mut self, executor: &mut Executor) -> QueueStatus {
        if !executor.is_idle() {
            return QueueStatus::Busy;
        }
        match self.dispatch(executor) {
            Some(twist) => QueueStatus::Dispatched(twist),
            None => {
                debug!("queue drained");
                QueueStatus::Drained
            }
        }
    }

    /// Drops every twist that has not started yet. The turning one, if
    /// any, is unaffected.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    fn dispatch(&mut self, executor: &mut Executor) -> Option<Twist> {
        let twist = self.pending.pop_front()?;
        match executor.submit(twist) {
            Ok(()) => Some(twist),
            Err(_) => {
                // put it back where it was
                self.pending.push_front(twist);
                None
            }
        }
    }
}
