use crate::goal::{Scope, Weakenings};
use crate::kont::Kont;
use crate::term::{Side, TermId};
use crate::undo::{Event, Snapshot, SplitPoint};
use hashbrown::HashSet;
use rustc_hash::FxHasher;
use std::collections::VecDeque;
use std::hash::BuildHasherDefault;
use std::rc::Rc;

/// A captured alternative: enough to restart resolution at `goal` in the
/// state the logs were in when the alternative was set aside.
#[derive(Debug, Clone)]
pub struct ChoicePoint {
    pub side: Side,
    pub goal: TermId,
    /// Uncommitted inverses of opponent events that happened after the split
    /// point; replayed (in order) when the choice point is retried.
    pub extra: Vec<Event>,
    /// Logs at the end of the run that found this choice point. Every choice
    /// point of that run holds the same copy.
    pub snapshot: Rc<Snapshot>,
    /// Where this choice point's state ends within `snapshot`.
    pub point: SplitPoint,
    pub weakenings: Weakenings,
    pub kont: Kont,
    pub scope: Scope,
}

/// Pending alternatives, retried first-discovered first.
#[derive(Debug, Default)]
pub struct RetryQueue {
    points: VecDeque<ChoicePoint>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: ChoicePoint) {
        self.points.push_back(point);
    }

    pub fn pop(&mut self) -> Option<ChoicePoint> {
        self.points.pop_front()
    }

    /// The choice point `pop` would return.
    pub fn front(&self) -> Option<&ChoicePoint> {
        self.points.front()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of queued choice points belonging to `side`.
    pub fn count(&self, side: Side) -> usize {
        self.points.iter().filter(|cp| cp.side == side).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChoicePoint> {
        self.points.iter()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Events held by the distinct snapshots behind the queued choice points.
    pub fn stored_events(&self) -> usize {
        let mut seen: HashSet<*const Snapshot, BuildHasherDefault<FxHasher>> = HashSet::default();
        self.points
            .iter()
            .filter(|cp| seen.insert(Rc::as_ptr(&cp.snapshot)))
            .map(|cp| cp.snapshot.events())
            .sum()
    }
}
