use crate::goal::{join_atom, parallel_atom, unify_atom, Weakenings};
use crate::symbol::Atom;
use crate::term::{Node, Side, TermId, TermStore};
use crate::undo::{Event, Logs};
use smallvec::SmallVec;

#[cfg(feature = "tracing")]
use crate::trace::{debug_span, trace};

/// Unify `a` and `b` on behalf of `side` (0 for `=`, 1 for `!=`).
///
/// Returns the goal that remains: `true`/`false`, or a connective over the
/// leaf comparisons still to be solved. Bindings and frozen constraints go
/// straight into the cells and are recorded in `logs`.
pub fn unify(
    terms: &mut TermStore,
    logs: &mut Logs,
    weakenings: &Weakenings,
    a: TermId,
    b: TermId,
    side: Side,
) -> TermId {
    #[cfg(feature = "tracing")]
    let _span = debug_span!("unify", ?a, ?b, side = side.index()).entered();

    let mut a = terms.deref(a);
    let mut b = terms.deref(b);
    // The value a side concedes with when it cannot settle the goal itself.
    let conceded = terms.truth(side == Side::Neg);

    if a == b {
        return terms.truth(side == Side::Pos);
    }

    // Variables go right; between two variables the larger index goes right.
    let a_index = terms.var_cell(a).map(|cell| cell.index);
    let b_index = terms.var_cell(b).map(|cell| cell.index);
    if let Some(ia) = a_index {
        if b_index.map_or(true, |ib| ia > ib) {
            std::mem::swap(&mut a, &mut b);
        }
    }

    if let Some(index) = terms.var_cell(b).map(|cell| cell.index) {
        let owner = Side::of_index(index);
        if owner == side {
            let mark = logs.len(owner);
            if !refine(terms, logs, b, a) {
                #[cfg(feature = "tracing")]
                trace!(var = ?b, "unify_occurs_check_failed");
                logs.rewind_side(terms, owner, mark);
                return conceded;
            }
            logs.record(terms, owner, Event::Bind { var: b, value: a });
            #[cfg(feature = "tracing")]
            trace!(var = ?b, value = ?a, "unify_bind");
            // Read, not drained: reverting the bind must find them intact.
            let pending = terms
                .var_cell(b)
                .map(|cell| cell.coroutines.clone())
                .unwrap_or_default();
            return join(terms, &pending, side);
        }

        // Opponent-owned: it cannot be bound here, so the disagreement is
        // frozen on it until the opponent binds it.
        let mut constraint = terms.connective2(Atom::NEQ, a, b);
        if let Some(weakening) = weakenings.get(owner) {
            constraint = terms.connective2(parallel_atom(owner), constraint, weakening);
        }
        logs.record(terms, owner, Event::Freeze { var: b, constraint });
        let left_owner = terms.var_cell(a).map(|cell| Side::of_index(cell.index));
        if left_owner == Some(owner) {
            logs.record(terms, owner, Event::Freeze { var: a, constraint });
        }
        #[cfg(feature = "tracing")]
        trace!(var = ?b, ?constraint, "unify_freeze");
        return conceded;
    }

    let mut constraints: SmallVec<[TermId; 8]> = SmallVec::new();
    if expand(terms, a, b, unify_atom(side), &mut constraints) {
        return join(terms, &constraints, side);
    }
    #[cfg(feature = "tracing")]
    trace!("unify_functor_mismatch");
    conceded
}

/// Fold constraints to the right with the connective of `side`.
/// No constraints at all means the side has won outright.
pub fn join(terms: &mut TermStore, constraints: &[TermId], side: Side) -> TermId {
    let Some((&last, rest)) = constraints.split_last() else {
        return terms.truth(side == Side::Pos);
    };
    let op = join_atom(side);
    rest.iter()
        .rev()
        .fold(last, |acc, &c| terms.connective2(op, c, acc))
}

/// Pair up the arguments of two applications.
///
/// Nested application pairs are opened eagerly, depth first; every other pair
/// becomes an `op` goal appended to `constraints`, in left-to-right order.
/// Returns false as soon as two functors differ.
pub fn expand(
    terms: &mut TermStore,
    a: TermId,
    b: TermId,
    op: Atom,
    constraints: &mut SmallVec<[TermId; 8]>,
) -> bool {
    let mut worklist: SmallVec<[(TermId, TermId); 16]> = SmallVec::new();
    worklist.push((a, b));

    while let Some((x, y)) = worklist.pop() {
        match (terms.is_app(x), terms.is_app(y)) {
            (Some((fx, xs)), Some((fy, ys))) => {
                if fx != fy {
                    return false;
                }
                // Reversed so the leftmost pair is popped first.
                worklist.extend(xs.iter().copied().zip(ys.iter().copied()).rev());
            }
            _ => constraints.push(terms.connective2(op, x, y)),
        }
    }
    true
}

/// Occurs check merged with index lowering, run before binding `var` to
/// `value`.
///
/// Fails if `var` occurs in `value`. Same-polarity variables in `value` with a
/// larger index are rebound (and logged) to a fresh variable at `var`'s index,
/// so bound chains always lead towards smaller indices. Opponent variables are
/// accepted only if `var`'s index is larger than theirs: they were introduced
/// before `var` and act as constants for it.
pub fn refine(terms: &mut TermStore, logs: &mut Logs, var: TermId, value: TermId) -> bool {
    let (var_index, owner) = match terms.var_cell(var) {
        Some(cell) => (cell.index, Side::of_index(cell.index)),
        None => unreachable!("refine is only called on variables"),
    };
    let mut stack: SmallVec<[TermId; 16]> = SmallVec::new();
    stack.push(value);

    while let Some(t) = stack.pop() {
        let t = terms.deref(t);
        if t == var {
            return false;
        }
        if terms.is_ground(t) {
            continue;
        }
        match terms.node(t) {
            Node::App(_, args) => stack.extend(args.iter().rev().copied()),
            Node::Var(cell) => {
                if Side::of_index(cell.index) != owner {
                    if var_index <= cell.index {
                        return false;
                    }
                } else if var_index < cell.index {
                    let carried = cell.coroutines.clone();
                    let lowered = terms.var_with_coroutines(var_index, carried);
                    logs.record(terms, owner, Event::Bind { var: t, value: lowered });
                }
            }
        }
    }
    true
}
