//! Goal reduction.
//!
//! Resolution is a pair of step functions: [`Solver::solve_head`] takes a
//! goal apart, [`Solver::solve_cont`] feeds a finished sub-goal's value to
//! the innermost frame of the continuation. Both return the next [`Step`];
//! [`Solver::trampoline`] runs steps until one finishes, so proof depth
//! lives in the continuation chain and never in the native stack.

use crate::dup::{duplicate, Memo};
use crate::error::EngineError;
use crate::goal::{enter_scope, join_atom, scope_atom, unify_atom, Goal, Scope, Weakenings};
use crate::kont::{Frame, Kont};
use crate::program::Program;
use crate::retry::{ChoicePoint, RetryQueue};
use crate::symbol::AtomTable;
use crate::term::{Side, TermId, TermStore};
use crate::undo::{temporevert, Event, Logs, SplitPoint};
use crate::unify::unify;
use smallvec::smallvec;
use std::rc::Rc;

#[cfg(feature = "tracing")]
use crate::trace::{debug, debug_span, trace};

/// How a proof attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    True,
    False,
    /// A retried parallel sibling reached its connective's identity value:
    /// the branch adds nothing the first run did not already establish.
    Subsumed(Side),
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        if value {
            Outcome::True
        } else {
            Outcome::False
        }
    }
}

impl Outcome {
    /// The terminal value, if the attempt reached one.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Outcome::True => Some(true),
            Outcome::False => Some(false),
            Outcome::Subsumed(_) => None,
        }
    }
}

/// The stores resolution works against.
pub struct SolveCtx<'a> {
    pub atoms: &'a AtomTable,
    pub program: &'a Program,
    pub terms: &'a mut TermStore,
}

/// Arguments of a pending `solve_head` step.
#[derive(Debug, Clone)]
pub struct Head {
    pub goal: TermId,
    pub weakenings: Weakenings,
    pub kont: Kont,
    pub scope: Scope,
}

/// What the trampoline runs next.
#[derive(Debug, Clone)]
pub enum Step {
    Head(Head),
    Cont { result: bool, kont: Kont },
    Done(Outcome),
}

/// A choice point found during the current run, not yet queued.
struct Found {
    side: Side,
    goal: TermId,
    extra: Vec<Event>,
    point: SplitPoint,
    weakenings: Weakenings,
    kont: Kont,
    scope: Scope,
}

/// Resolution state borrowed for the duration of one run.
///
/// Within a run the logs below any recorded split point never change, so the
/// choice points a run finds are queued together when it ends, all sharing
/// one snapshot of the logs.
pub struct Solver<'s, 'a> {
    logs: &'s mut Logs,
    queue: &'s mut RetryQueue,
    ctx: &'s mut SolveCtx<'a>,
    found: Vec<Found>,
}

impl<'s, 'a> Solver<'s, 'a> {
    pub fn new(logs: &'s mut Logs, queue: &'s mut RetryQueue, ctx: &'s mut SolveCtx<'a>) -> Self {
        Self {
            logs,
            queue,
            ctx,
            found: Vec::new(),
        }
    }

    /// Run steps until one finishes, then queue the choice points found.
    pub fn trampoline(&mut self, step: Step) -> Result<Outcome, EngineError> {
        let outcome = self.run(step);
        self.settle();
        outcome
    }

    fn run(&mut self, mut step: Step) -> Result<Outcome, EngineError> {
        loop {
            step = match step {
                Step::Head(head) => self.solve_head(head)?,
                Step::Cont { result, kont } => self.solve_cont(result, kont),
                Step::Done(outcome) => return Ok(outcome),
            };
        }
    }

    /// Queue the choice points found so far, in discovery order.
    pub fn settle(&mut self) {
        if self.found.is_empty() {
            return;
        }
        let snapshot = Rc::new(self.logs.snapshot());
        for found in self.found.drain(..) {
            self.queue.push(ChoicePoint {
                side: found.side,
                goal: found.goal,
                extra: found.extra,
                snapshot: Rc::clone(&snapshot),
                point: found.point,
                weakenings: found.weakenings,
                kont: found.kont,
                scope: found.scope,
            });
        }
    }

    /// Number of choice points found and not yet queued.
    pub fn unsettled(&self) -> usize {
        self.found.len()
    }

    /// Reduce one goal.
    pub fn solve_head(&mut self, head: Head) -> Result<Step, EngineError> {
        let Head {
            goal,
            weakenings,
            kont,
            scope,
        } = head;
        let terms = &mut *self.ctx.terms;
        let view = Goal::view(terms, goal)?;

        #[cfg(feature = "tracing")]
        trace!(?goal, ?view, scope, "solve_head");

        let next = match view {
            Goal::Unify { side, left, right } => Head {
                goal: unify(terms, self.logs, &weakenings, left, right, side),
                weakenings,
                kont,
                scope,
            },
            Goal::Parallel { side, left, right } => {
                let point = self.logs.point();
                let sibling = weakenings.weaken(terms, left, side);
                let kont = kont.push(Frame::Parallel {
                    side,
                    sibling: right,
                    point,
                    weakenings: sibling,
                    scope,
                });
                Head {
                    goal: left,
                    weakenings: weakenings.weaken(terms, right, side),
                    kont,
                    scope,
                }
            }
            Goal::Choice { side, left, right } => {
                let scope = enter_scope(scope, side);
                let kont = kont.push(Frame::Choice {
                    side,
                    alternative: right,
                    point: self.logs.point(),
                    weakenings,
                    scope,
                });
                Head {
                    goal: left,
                    weakenings,
                    kont,
                    scope,
                }
            }
            Goal::Scope { side, body } => Head {
                goal: body,
                weakenings,
                kont,
                scope: enter_scope(scope, side),
            },
            Goal::Truth(result) => return Ok(Step::Cont { result, kont }),
            Goal::Call(atom) => {
                let rule = match self.ctx.program.get(atom) {
                    Some(rule) => *rule,
                    None => {
                        return Err(EngineError::UnknownRelation {
                            atom: self
                                .ctx
                                .atoms
                                .name(atom)
                                .map_or_else(|| format!("#{}", atom.raw()), str::to_owned),
                        })
                    }
                };
                let side = if self.ctx.atoms.is_negated(atom) {
                    Side::Neg
                } else {
                    Side::Pos
                };
                let offset = enter_scope(scope, side) - side as u32;

                #[cfg(feature = "tracing")]
                trace!(atom = atom.raw(), side = side.index(), offset, "instantiate_rule");

                let mut memo = Memo::default();
                let head = duplicate(terms, rule.head, &mut memo, offset);
                let body = duplicate(terms, rule.body, &mut memo, offset);
                let matched = terms.connective2(unify_atom(side), goal, head);
                let scoped = terms.connective(scope_atom(side), smallvec![body]);
                Head {
                    goal: terms.connective2(join_atom(side), matched, scoped),
                    weakenings,
                    kont,
                    scope,
                }
            }
        };
        Ok(Step::Head(next))
    }

    /// Hand a finished sub-goal's value to the innermost frame.
    pub fn solve_cont(&mut self, result: bool, kont: Kont) -> Step {
        let Some((frame, rest)) = kont.pop() else {
            return Step::Done(Outcome::from(result));
        };
        match frame {
            Frame::Parallel {
                side,
                sibling,
                point,
                weakenings,
                scope,
            } => {
                if result == side.identity() {
                    return Step::Head(Head {
                        goal: sibling,
                        weakenings,
                        kont: rest,
                        scope,
                    });
                }
                // The sibling still deserves a run of its own, later.
                let guarded = rest.push(Frame::Guard { side });
                self.discover(Found {
                    side,
                    goal: sibling,
                    extra: Vec::new(),
                    point,
                    weakenings,
                    kont: guarded,
                    scope,
                });
                Step::Cont { result, kont: rest }
            }
            Frame::Guard { side } => {
                if result == side.identity() {
                    Step::Done(Outcome::Subsumed(side))
                } else {
                    Step::Cont { result, kont: rest }
                }
            }
            Frame::Choice {
                side,
                alternative,
                point,
                weakenings,
                scope,
            } => {
                let terms = &mut *self.ctx.terms;
                if result == side.identity() {
                    // Clean revert: undo own work since the split point and
                    // keep the undoing on record.
                    let own: Vec<Event> = self.logs.side(side)[point.get(side)..].to_vec();
                    for &event in own.iter().rev() {
                        let inverse = temporevert(terms, event, true);
                        self.logs.push(side, inverse);
                    }
                    return Step::Head(Head {
                        goal: alternative,
                        weakenings,
                        kont: rest,
                        scope,
                    });
                }
                let opponent = side.flip();
                let extra = self.logs.side(opponent)[point.get(opponent)..]
                    .iter()
                    .map(|&event| temporevert(terms, event, false))
                    .collect();
                self.discover(Found {
                    side,
                    goal: alternative,
                    extra,
                    point,
                    weakenings,
                    kont: rest.clone(),
                    scope,
                });
                Step::Cont { result, kont: rest }
            }
        }
    }

    fn discover(&mut self, found: Found) {
        #[cfg(feature = "tracing")]
        debug!(
            side = found.side.index(),
            goal = ?found.goal,
            extra = found.extra.len(),
            queued = self.queue.len() + self.found.len() + 1,
            "choice_point"
        );
        self.found.push(found);
    }
}

/// Solve `goal` from scratch. Alternatives found along the way are appended
/// to `queue`.
pub fn solve(
    goal: TermId,
    logs: &mut Logs,
    weakenings: Weakenings,
    queue: &mut RetryQueue,
    ctx: &mut SolveCtx<'_>,
) -> Result<Outcome, EngineError> {
    #[cfg(feature = "tracing")]
    let _span = debug_span!("solve", ?goal).entered();

    Solver::new(logs, queue, ctx).trampoline(Step::Head(Head {
        goal,
        weakenings,
        kont: Kont::done(),
        scope: 0,
    }))
}

/// Retry the oldest pending alternative. `Ok(None)` once none are left.
pub fn solve_next(
    logs: &mut Logs,
    queue: &mut RetryQueue,
    ctx: &mut SolveCtx<'_>,
) -> Result<Option<Outcome>, EngineError> {
    let Some(cp) = queue.pop() else {
        return Ok(None);
    };

    #[cfg(feature = "tracing")]
    let _span = debug_span!("solve_next", side = cp.side.index(), remaining = queue.len())
        .entered();

    logs.restore(ctx.terms, &cp.snapshot, cp.point);
    let opponent = cp.side.flip();
    for &pending in &cp.extra {
        let replayed = temporevert(ctx.terms, pending, true);
        logs.push(opponent, replayed);
    }

    Solver::new(logs, queue, ctx)
        .trampoline(Step::Head(Head {
            goal: cp.goal,
            weakenings: cp.weakenings,
            kont: cp.kont,
            scope: cp.scope,
        }))
        .map(Some)
}

#[cfg(test)]
#[path = "tests/solve.rs"]
mod tests;
