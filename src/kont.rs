use crate::goal::{Scope, Weakenings};
use crate::term::{Side, TermId};
use crate::undo::SplitPoint;
use std::rc::Rc;

#[cfg(feature = "tracing")]
use crate::trace::trace;

/// What to do once the current sub-goal has reached `true` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Left operand of a parallel connective is running; `sibling` is next.
    Parallel {
        side: Side,
        sibling: TermId,
        /// Log lengths before the left operand started.
        point: SplitPoint,
        /// Context for the sibling, already weakened by the left operand.
        weakenings: Weakenings,
        scope: Scope,
    },
    /// A retried parallel sibling: reaching the connective's identity value
    /// adds nothing new.
    Guard { side: Side },
    /// Left operand of a choice connective is running; `alternative` is the
    /// branch to take by clean revert or by backtracking.
    Choice {
        side: Side,
        alternative: TermId,
        point: SplitPoint,
        weakenings: Weakenings,
        scope: Scope,
    },
}

impl Frame {
    fn kind(&self) -> &'static str {
        match self {
            Frame::Parallel { .. } => "Parallel",
            Frame::Guard { .. } => "Guard",
            Frame::Choice { .. } => "Choice",
        }
    }
}

#[derive(Debug)]
struct Link {
    frame: Frame,
    next: Kont,
}

/// An immutable chain of frames.
///
/// Pushing shares the tail, so a choice point can hold on to the chain it was
/// created under while the solver keeps extending or unwinding its own copy.
#[derive(Debug, Clone, Default)]
pub struct Kont(Option<Rc<Link>>);

impl Kont {
    /// The empty chain: reaching it ends resolution.
    pub fn done() -> Self {
        Kont(None)
    }

    pub fn is_done(&self) -> bool {
        self.0.is_none()
    }

    /// A new chain with `frame` on top of this one.
    pub fn push(&self, frame: Frame) -> Kont {
        #[cfg(feature = "tracing")]
        trace!(kont_type = frame.kind(), "push_kont");
        Kont(Some(Rc::new(Link {
            frame,
            next: self.clone(),
        })))
    }

    /// The top frame and the chain below it.
    pub fn pop(&self) -> Option<(Frame, Kont)> {
        let link = self.0.as_ref()?;
        #[cfg(feature = "tracing")]
        trace!(kont_type = link.frame.kind(), "pop_kont");
        Some((link.frame, link.next.clone()))
    }

    /// Frames from the top down.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> + '_ {
        let mut cursor = self.0.as_deref();
        std::iter::from_fn(move || {
            let link = cursor?;
            cursor = link.next.0.as_deref();
            Some(&link.frame)
        })
    }

    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    /// Frame names from the top down (for debugging).
    pub fn describe(&self) -> Vec<&'static str> {
        self.frames().map(Frame::kind).collect()
    }
}

// Long chains are released iteratively; the default recursive drop would
// spend one native frame per link.
impl Drop for Kont {
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut link) => next = link.next.0.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(side: Side) -> Frame {
        Frame::Guard { side }
    }

    #[test]
    fn done_is_empty() {
        let k = Kont::done();
        assert!(k.is_done());
        assert_eq!(k.depth(), 0);
        assert!(k.pop().is_none());
    }

    #[test]
    fn push_then_pop_returns_frame_and_tail() {
        let k = Kont::done().push(guard(Side::Pos));
        let (frame, rest) = k.pop().expect("one frame");
        assert_eq!(frame, guard(Side::Pos));
        assert!(rest.is_done());
    }

    #[test]
    fn push_shares_the_tail() {
        let base = Kont::done().push(guard(Side::Neg));
        let a = base.push(guard(Side::Pos));
        let b = base.push(guard(Side::Neg));
        assert_eq!(a.depth(), 2);
        assert_eq!(b.depth(), 2);
        assert_eq!(base.depth(), 1, "extending never mutates the shared chain");
    }

    #[test]
    fn frames_run_top_down() {
        let k = Kont::done()
            .push(Frame::Choice {
                side: Side::Pos,
                alternative: crate::term::TermStore::new().truth(true),
                point: SplitPoint::default(),
                weakenings: Weakenings::new(),
                scope: 0,
            })
            .push(guard(Side::Neg));
        assert_eq!(k.describe(), vec!["Guard", "Choice"]);
    }

    #[test]
    fn dropping_a_long_chain_does_not_recurse() {
        let mut k = Kont::done();
        for _ in 0..200_000 {
            k = k.push(guard(Side::Pos));
        }
        assert_eq!(k.depth(), 200_000);
        drop(k);
    }
}
