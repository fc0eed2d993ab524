//! Append-only undo logs.
//!
//! Every mutation of a variable cell is recorded as an [`Event`] in the log of
//! the variable's polarity. Reverting a log suffix in reverse order restores
//! the cells exactly; a pair of log lengths ([`SplitPoint`]) is therefore a
//! resumable snapshot of the whole search state.

use crate::term::{Side, TermId, TermStore};

#[cfg(feature = "tracing")]
use crate::trace::trace;

/// One recorded mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `var` was unbound and now points at `value`.
    Bind { var: TermId, value: TermId },
    /// `constraint` was pushed onto `var`'s coroutines.
    Freeze { var: TermId, constraint: TermId },
    /// `var` pointed at `value` and is now unbound.
    Unbind { var: TermId, value: TermId },
    /// `constraint` was popped off `var`'s coroutines.
    Unfreeze { var: TermId, constraint: TermId },
}

impl Event {
    /// The variable this event touched.
    pub fn var(self) -> TermId {
        match self {
            Event::Bind { var, .. }
            | Event::Freeze { var, .. }
            | Event::Unbind { var, .. }
            | Event::Unfreeze { var, .. } => var,
        }
    }

    /// The event whose effect cancels this one.
    pub fn inverse(self) -> Event {
        match self {
            Event::Bind { var, value } => Event::Unbind { var, value },
            Event::Unbind { var, value } => Event::Bind { var, value },
            Event::Freeze { var, constraint } => Event::Unfreeze { var, constraint },
            Event::Unfreeze { var, constraint } => Event::Freeze { var, constraint },
        }
    }

    /// Perform the event's effect.
    pub fn apply(self, terms: &mut TermStore) {
        match self {
            Event::Bind { var, value } => terms.set_instance(var, Some(value)),
            Event::Unbind { var, .. } => terms.set_instance(var, None),
            Event::Freeze { var, constraint } => terms.push_coroutine(var, constraint),
            Event::Unfreeze { var, .. } => {
                terms.pop_coroutine(var);
            }
        }
    }

    /// Cancel the event's effect.
    pub fn undo(self, terms: &mut TermStore) {
        self.inverse().apply(terms)
    }
}

/// Undo a slice of events, newest first.
pub fn revert(terms: &mut TermStore, events: &[Event]) {
    for event in events.iter().rev() {
        event.undo(terms);
    }
}

/// Return the inverse of `event`. With `commit`, the event's effect is also
/// cancelled now; without it the inverse is only a pending record, to be
/// logged elsewhere and applied later.
pub fn temporevert(terms: &mut TermStore, event: Event, commit: bool) -> Event {
    if commit {
        event.undo(terms);
    }
    event.inverse()
}

/// Lengths of both logs at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitPoint([usize; 2]);

impl SplitPoint {
    pub fn new(pos: usize, neg: usize) -> Self {
        SplitPoint([pos, neg])
    }

    pub fn get(self, side: Side) -> usize {
        self.0[side.index()]
    }
}

/// The two per-polarity logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Logs {
    sides: [Vec<Event>; 2],
}

impl Logs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lengths of both logs.
    pub fn point(&self) -> SplitPoint {
        SplitPoint([self.sides[0].len(), self.sides[1].len()])
    }

    pub fn side(&self, side: Side) -> &[Event] {
        &self.sides[side.index()]
    }

    pub fn len(&self, side: Side) -> usize {
        self.sides[side.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.iter().all(Vec::is_empty)
    }

    /// Append an event whose effect has already happened.
    pub fn push(&mut self, side: Side, event: Event) {
        #[cfg(feature = "tracing")]
        trace!(side = side.index(), ?event, "log_event");
        self.sides[side.index()].push(event);
    }

    /// Apply an event and log it.
    pub fn record(&mut self, terms: &mut TermStore, side: Side, event: Event) {
        event.apply(terms);
        self.push(side, event);
    }

    /// Drop everything one log recorded past `len`, undoing it.
    pub fn rewind_side(&mut self, terms: &mut TermStore, side: Side, len: usize) {
        let log = &mut self.sides[side.index()];
        if len < log.len() {
            revert(terms, &log[len..]);
            log.truncate(len);
        }
    }

    /// Drop everything recorded past `point` on both sides, undoing it.
    pub fn rewind(&mut self, terms: &mut TermStore, point: SplitPoint) {
        self.rewind_side(terms, Side::Pos, point.get(Side::Pos));
        self.rewind_side(terms, Side::Neg, point.get(Side::Neg));
    }

    /// Copy of both logs as they are now.
    ///
    /// One snapshot serves every choice point found in a run: each keeps its
    /// own [`SplitPoint`] into it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            sides: self.sides.clone(),
        }
    }

    /// Make the logs, and the cells they describe, equal to the prefix of
    /// `snapshot` that ends at `point`.
    ///
    /// Each log is rewound to its longest common prefix with the target and
    /// the target's remaining events are replayed. When the target is already
    /// a prefix of the logs this is a plain rewind.
    pub fn restore(&mut self, terms: &mut TermStore, snapshot: &Snapshot, point: SplitPoint) {
        let mut common = [0usize; 2];
        for (i, keep) in common.iter_mut().enumerate() {
            *keep = self.sides[i]
                .iter()
                .zip(snapshot.prefix(i, point))
                .take_while(|(a, b)| a == b)
                .count();
        }
        self.rewind(terms, SplitPoint(common));
        for (i, &keep) in common.iter().enumerate() {
            for &event in &snapshot.prefix(i, point)[keep..] {
                event.apply(terms);
                self.sides[i].push(event);
            }
        }
    }
}

/// Saved copy of both logs, shared by the choice points of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    sides: [Vec<Event>; 2],
}

impl Snapshot {
    /// Lengths of the saved logs.
    pub fn point(&self) -> SplitPoint {
        SplitPoint([self.sides[0].len(), self.sides[1].len()])
    }

    /// Number of events held.
    pub fn events(&self) -> usize {
        self.sides[0].len() + self.sides[1].len()
    }

    /// Saved events of one side, cut at `point`.
    pub fn side(&self, side: Side, point: SplitPoint) -> &[Event] {
        self.prefix(side.index(), point)
    }

    fn prefix(&self, i: usize, point: SplitPoint) -> &[Event] {
        let log = &self.sides[i];
        &log[..point.0[i].min(log.len())]
    }
}

#[cfg(test)]
#[path = "tests/undo.rs"]
mod tests;
