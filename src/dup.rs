//! Rule instantiation by deep copy.
//!
//! Every invocation of a rule gets its own copy of the rule's variables, with
//! indices shifted by the current scope offset. The memo keeps sharing intact:
//! a variable (or subterm) reachable from several places in the source is
//! copied once and every position points at that one copy.

use crate::term::{Node, TermId, TermStore};
use crate::symbol::Atom;
use hashbrown::HashMap;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::hash::BuildHasherDefault;

/// Source node (after dereferencing) to its copy.
pub type Memo = HashMap<TermId, TermId, BuildHasherDefault<FxHasher>>;

enum Visit {
    Enter(TermId),
    Build(TermId, Atom, usize),
}

/// Copy `term`, giving each unbound variable a fresh cell at `index + offset`.
///
/// Bound variables are copied as their targets. Passing the same memo to
/// several calls (a rule head and its body) makes the copies share variables.
pub fn duplicate(terms: &mut TermStore, term: TermId, memo: &mut Memo, offset: u32) -> TermId {
    let mut stack: Vec<Visit> = vec![Visit::Enter(term)];
    let mut built: SmallVec<[TermId; 16]> = SmallVec::new();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(t) => {
                let t = terms.deref(t);
                if let Some(&copy) = memo.get(&t) {
                    built.push(copy);
                    continue;
                }
                match terms.node(t) {
                    Node::Var(cell) => {
                        let index = cell.index + offset;
                        let copy = terms.var(index);
                        memo.insert(t, copy);
                        built.push(copy);
                    }
                    Node::App(atom, args) => {
                        stack.push(Visit::Build(t, *atom, args.len()));
                        stack.extend(args.iter().rev().map(|&a| Visit::Enter(a)));
                    }
                }
            }
            Visit::Build(source, atom, arity) => {
                let args: SmallVec<[TermId; 4]> = built.drain(built.len() - arity..).collect();
                let copy = terms.connective(atom, args);
                memo.insert(source, copy);
                built.push(copy);
            }
        }
    }

    debug_assert_eq!(built.len(), 1);
    built[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::AtomTable;

    #[test]
    fn variables_get_fresh_cells_at_shifted_index() {
        let mut atoms = AtomTable::new();
        let mut terms = TermStore::new();
        let f = atoms.register("f", 2);
        let x = terms.var(1);
        let y = terms.var(3);
        let t = terms.app2(f, x, y).unwrap();

        let copy = duplicate(&mut terms, t, &mut Memo::default(), 4);
        let (atom, args) = terms.is_app(copy).unwrap();
        assert_eq!(atom, f);
        assert_ne!(args[0], x);
        assert_eq!(terms.var_cell(args[0]).unwrap().index, 5);
        assert_eq!(terms.var_cell(args[1]).unwrap().index, 7);
    }

    #[test]
    fn shared_variables_stay_shared_in_one_copy() {
        let mut atoms = AtomTable::new();
        let mut terms = TermStore::new();
        let f = atoms.register("f", 2);
        let g = atoms.register("g", 1);
        let x = terms.var(0);
        let gx = terms.app1(g, x).unwrap();
        let t = terms.app2(f, x, gx).unwrap();

        let copy = duplicate(&mut terms, t, &mut Memo::default(), 0);
        let (_, args) = terms.is_app(copy).unwrap();
        let (_, inner) = terms.is_app(args[1]).unwrap();
        assert_eq!(args[0], inner[0], "both positions alias the same fresh variable");
    }

    #[test]
    fn shared_subterms_alias_the_same_copy() {
        let mut atoms = AtomTable::new();
        let mut terms = TermStore::new();
        let f = atoms.register("f", 2);
        let g = atoms.register("g", 1);
        let x = terms.var(0);
        let gx = terms.app1(g, x).unwrap();
        let t = terms.app2(f, gx, gx).unwrap();

        let copy = duplicate(&mut terms, t, &mut Memo::default(), 0);
        let (_, args) = terms.is_app(copy).unwrap();
        assert_eq!(args[0], args[1]);
        assert_ne!(args[0], gx);
    }

    #[test]
    fn bound_variables_copy_their_targets() {
        let mut atoms = AtomTable::new();
        let mut terms = TermStore::new();
        let nil = atoms.register("nil", 0);
        let nil_t = terms.app0(nil).unwrap();
        let x = terms.var(0);
        terms.set_instance(x, Some(nil_t));

        let copy = duplicate(&mut terms, x, &mut Memo::default(), 2);
        assert_eq!(terms.atom_of(copy), Some(nil));
        assert!(terms.var_cell(copy).is_none());
    }

    #[test]
    fn one_memo_links_head_and_body() {
        let mut atoms = AtomTable::new();
        let mut terms = TermStore::new();
        let p = atoms.register("p", 1);
        let x = terms.var(0);
        let head = terms.app1(p, x).unwrap();
        let body = terms.app2(Atom::EQ, x, x).unwrap();

        let mut memo = Memo::default();
        let head_copy = duplicate(&mut terms, head, &mut memo, 0);
        let body_copy = duplicate(&mut terms, body, &mut memo, 0);
        let (_, head_args) = terms.is_app(head_copy).unwrap();
        let (_, body_args) = terms.is_app(body_copy).unwrap();
        assert_eq!(head_args[0], body_args[0]);
    }
}
