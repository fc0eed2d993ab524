use crate::error::EngineError;
use crate::symbol::Atom;
use crate::term::{Node, Side, TermId, TermStore};

/// Quantifier scope counter. Its parity tracks the side of the innermost
/// quantifier; it offsets variable indices when rules are instantiated.
pub type Scope = u32;

/// Move the scope counter to the parity of `side`, incrementing by at most one.
pub fn enter_scope(scope: Scope, side: Side) -> Scope {
    scope + ((scope & 1) ^ side as u32)
}

/// A goal term seen through its connective.
///
/// Goals stay ordinary terms in the store (so unification can hand back
/// residual constraints as goals); this is the closed view the solver
/// dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// `=` (side 0) or `!=` (side 1).
    Unify {
        side: Side,
        left: TermId,
        right: TermId,
    },
    /// `pdisj` (side 0) or `pconj` (side 1): both operands are worked on.
    Parallel {
        side: Side,
        left: TermId,
        right: TermId,
    },
    /// `cdisj` (side 0) or `cconj` (side 1): the right operand is an
    /// alternative reached by backtracking.
    Choice {
        side: Side,
        left: TermId,
        right: TermId,
    },
    /// `idisj` (side 0) or `iconj` (side 1): enters a quantifier scope.
    Scope { side: Side, body: TermId },
    /// `true` or `false`.
    Truth(bool),
    /// A user relation, looked up in the program.
    Call(Atom),
}

impl Goal {
    /// Classify a goal term.
    pub fn view(terms: &TermStore, goal: TermId) -> Result<Goal, EngineError> {
        let root = terms.deref(goal);
        let (atom, args) = match terms.node(root) {
            Node::Var(_) => return Err(EngineError::NotAGoal(root)),
            Node::App(atom, args) => (*atom, args),
        };
        let binary = |side| (side, args[0], args[1]);
        let goal = match atom {
            Atom::TRUE => Goal::Truth(true),
            Atom::FALSE => Goal::Truth(false),
            Atom::EQ | Atom::NEQ => {
                let (side, left, right) = binary(side_of(atom == Atom::NEQ));
                Goal::Unify { side, left, right }
            }
            Atom::PDISJ | Atom::PCONJ => {
                let (side, left, right) = binary(side_of(atom == Atom::PCONJ));
                Goal::Parallel { side, left, right }
            }
            Atom::CDISJ | Atom::CCONJ => {
                let (side, left, right) = binary(side_of(atom == Atom::CCONJ));
                Goal::Choice { side, left, right }
            }
            Atom::IDISJ | Atom::ICONJ => Goal::Scope {
                side: side_of(atom == Atom::ICONJ),
                body: args[0],
            },
            other => Goal::Call(other),
        };
        Ok(goal)
    }
}

fn side_of(negative: bool) -> Side {
    if negative {
        Side::Neg
    } else {
        Side::Pos
    }
}

/// `=` for side 0, `!=` for side 1.
pub fn unify_atom(side: Side) -> Atom {
    [Atom::EQ, Atom::NEQ][side.index()]
}

/// Connective joining the residual constraints of a side-`side` unification:
/// `pconj` for equalities, `pdisj` for disequalities.
pub fn join_atom(side: Side) -> Atom {
    [Atom::PCONJ, Atom::PDISJ][side.index()]
}

/// Parallel connective whose own side is `side`.
pub fn parallel_atom(side: Side) -> Atom {
    [Atom::PDISJ, Atom::PCONJ][side.index()]
}

/// Scope marker whose own side is `side`.
pub fn scope_atom(side: Side) -> Atom {
    [Atom::IDISJ, Atom::ICONJ][side.index()]
}

/// Side constraints accumulated through parallel connectives, one slot per
/// polarity. A constraint frozen on a variable of polarity `p` is combined
/// with slot `p`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weakenings([Option<TermId>; 2]);

impl Weakenings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> Option<TermId> {
        self.0[side.index()]
    }

    /// Add `constraint` to the slot of `side`, joined with `pdisj` on side 0
    /// and `pconj` on side 1.
    pub fn weaken(self, terms: &mut TermStore, constraint: TermId, side: Side) -> Weakenings {
        let mut slots = self.0;
        let slot = &mut slots[side.index()];
        *slot = Some(match *slot {
            None => constraint,
            Some(prev) => terms.connective2(parallel_atom(side), constraint, prev),
        });
        Weakenings(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup;

    #[test]
    fn enter_scope_aligns_parity_with_side() {
        assert_eq!(enter_scope(0, Side::Pos), 0);
        assert_eq!(enter_scope(0, Side::Neg), 1);
        assert_eq!(enter_scope(1, Side::Neg), 1);
        assert_eq!(enter_scope(1, Side::Pos), 2);
        assert_eq!(enter_scope(2, Side::Neg), 3);
    }

    #[test]
    fn view_classifies_connectives() {
        let (_, mut terms) = setup();
        let x = terms.var(0);
        let y = terms.var(1);
        let eq = terms.app2(Atom::EQ, x, y).unwrap();
        let pconj = terms.app2(Atom::PCONJ, eq, eq).unwrap();
        let cdisj = terms.app2(Atom::CDISJ, eq, pconj).unwrap();
        let iconj = terms.app1(Atom::ICONJ, cdisj).unwrap();

        assert_eq!(
            Goal::view(&terms, eq),
            Ok(Goal::Unify {
                side: Side::Pos,
                left: x,
                right: y
            })
        );
        assert_eq!(
            Goal::view(&terms, pconj),
            Ok(Goal::Parallel {
                side: Side::Neg,
                left: eq,
                right: eq
            })
        );
        assert_eq!(
            Goal::view(&terms, cdisj),
            Ok(Goal::Choice {
                side: Side::Pos,
                left: eq,
                right: pconj
            })
        );
        assert_eq!(
            Goal::view(&terms, iconj),
            Ok(Goal::Scope {
                side: Side::Neg,
                body: cdisj
            })
        );
        assert_eq!(Goal::view(&terms, terms.truth(false)), Ok(Goal::Truth(false)));
    }

    #[test]
    fn view_falls_back_to_relation_calls() {
        let (mut atoms, mut terms) = setup();
        let p = atoms.register("p", 1);
        let x = terms.var(0);
        let call = terms.app1(p, x).unwrap();
        assert_eq!(Goal::view(&terms, call), Ok(Goal::Call(p)));
    }

    #[test]
    fn view_rejects_unbound_variables() {
        let (_, mut terms) = setup();
        let x = terms.var(0);
        assert_eq!(Goal::view(&terms, x), Err(EngineError::NotAGoal(x)));
    }

    #[test]
    fn view_sees_through_bound_variables() {
        let (_, mut terms) = setup();
        let x = terms.var(0);
        terms.set_instance(x, Some(terms.truth(true)));
        assert_eq!(Goal::view(&terms, x), Ok(Goal::Truth(true)));
    }

    #[test]
    fn weaken_chains_per_side() {
        let (_, mut terms) = setup();
        let a = terms.truth(true);
        let b = terms.truth(false);
        let w = Weakenings::new().weaken(&mut terms, a, Side::Pos);
        assert_eq!(w.get(Side::Pos), Some(a));
        assert_eq!(w.get(Side::Neg), None);

        let w = w.weaken(&mut terms, b, Side::Pos);
        let joined = w.get(Side::Pos).unwrap();
        assert_eq!(terms.is_app(joined), Some((Atom::PDISJ, smallvec::smallvec![b, a])));

        let w = w.weaken(&mut terms, a, Side::Neg).weaken(&mut terms, b, Side::Neg);
        let joined = w.get(Side::Neg).unwrap();
        assert_eq!(terms.atom_of(joined), Some(Atom::PCONJ));
    }
}
