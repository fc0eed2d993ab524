//! The list-append relation, used by the demo binary, the benchmarks and
//! the tests.

use crate::error::EngineError;
use crate::program::Program;
use crate::symbol::{Atom, AtomTable};
use crate::term::{TermId, TermStore};
use smallvec::smallvec;

/// Atoms of the list-append program.
pub struct ListAtoms {
    pub cons: Atom,
    pub nil: Atom,
    pub append: Atom,
    pub not_append: Atom,
}

/// The two-clause `append` relation and its dual `!append`:
///
/// ```text
/// append([], B, B).
/// append([A|As], B, [A|Cs]) :- append(As, B, Cs).
/// ```
///
/// `append` is proved on side 0 with a `cdisj` over the clauses; `!append`
/// is proved on side 1 with odd-indexed variables and the dual connectives.
pub fn append_program(
    atoms: &mut AtomTable,
    terms: &mut TermStore,
) -> Result<(ListAtoms, Program), EngineError> {
    let list = ListAtoms {
        cons: atoms.register("cons", 2),
        nil: atoms.register("nil", 0),
        append: atoms.register("append", 3),
        not_append: atoms.register("!append", 3),
    };
    let mut program = Program::new();
    for (relation, index) in [(list.append, 0), (list.not_append, 1)] {
        let (head, body) = append_clauses(&list, relation, index, terms)?;
        program.insert(relation, head, body);
    }
    Ok((list, program))
}

fn append_clauses(
    list: &ListAtoms,
    relation: Atom,
    index: u32,
    terms: &mut TermStore,
) -> Result<(TermId, TermId), EngineError> {
    let negated = index == 1;
    let (unify, par, choice) = if negated {
        (Atom::NEQ, Atom::PDISJ, Atom::CCONJ)
    } else {
        (Atom::EQ, Atom::PCONJ, Atom::CDISJ)
    };
    let [a, b, c, aa, ab, ac] = [(); 6].map(|_| terms.var(index));
    let nil = terms.app0(list.nil)?;
    let head = terms.app(relation, smallvec![a, b, c])?;

    let a_nil = terms.app2(unify, a, nil)?;
    let b_c = terms.app2(unify, b, c)?;
    let first = terms.app2(par, a_nil, b_c)?;

    let a_cons = terms.app2(list.cons, aa, ab)?;
    let c_cons = terms.app2(list.cons, aa, ac)?;
    let a_is = terms.app2(unify, a, a_cons)?;
    let c_is = terms.app2(unify, c, c_cons)?;
    let call = terms.app(relation, smallvec![ab, b, ac])?;
    let tail = terms.app2(par, c_is, call)?;
    let second = terms.app2(par, a_is, tail)?;

    let body = terms.app2(choice, first, second)?;
    Ok((head, body))
}
