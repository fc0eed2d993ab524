//! Debug rendering of terms and undo logs.
//!
//! Variables print as a label followed by their index in subscript digits:
//! `X₀`, `V101₁`. Labels come from a [`Labels`] table; variables without one
//! get `V100`, `V101`, ... in order of first appearance.

use crate::symbol::AtomTable;
use crate::term::{Node, Side, TermId, TermStore};
use crate::undo::{Event, Logs};
use hashbrown::HashMap;
use rustc_hash::FxHasher;
use std::fmt::Write;
use std::hash::BuildHasherDefault;

const FIRST_LABEL: u32 = 100;

/// Display names for variables, stable for the lifetime of the table.
#[derive(Debug, Clone)]
pub struct Labels {
    names: HashMap<TermId, String, BuildHasherDefault<FxHasher>>,
    next: u32,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            names: HashMap::default(),
            next: FIRST_LABEL,
        }
    }
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with some variables already named.
    pub fn with_names<'n>(names: impl IntoIterator<Item = (TermId, &'n str)>) -> Self {
        let mut labels = Self::new();
        for (var, name) in names {
            labels.names.insert(var, name.to_string());
        }
        labels
    }

    /// The label of `var`, allocating the next `V<n>` on first sight.
    pub fn label(&mut self, var: TermId) -> &str {
        let next = &mut self.next;
        self.names.entry(var).or_insert_with(|| {
            let name = format!("V{}", next);
            *next += 1;
            name
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn subscript(out: &mut String, index: u32) {
    const DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];
    for digit in index.to_string().bytes() {
        out.push(DIGITS[(digit - b'0') as usize]);
    }
}

fn write_var(out: &mut String, terms: &TermStore, labels: &mut Labels, var: TermId) {
    out.push_str(labels.label(var));
    if let Some(cell) = terms.var_cell(var) {
        subscript(out, cell.index);
    }
}

enum Piece {
    Term(TermId),
    Text(&'static str),
}

/// Render a term, seeing through bound variables.
/// Nullary applications print as their bare name.
pub fn format_term(
    terms: &TermStore,
    atoms: &AtomTable,
    labels: &mut Labels,
    term: TermId,
) -> String {
    let mut out = String::new();
    let mut stack = vec![Piece::Term(term)];

    while let Some(piece) = stack.pop() {
        let id = match piece {
            Piece::Text(text) => {
                out.push_str(text);
                continue;
            }
            Piece::Term(id) => terms.deref(id),
        };
        match terms.node(id) {
            Node::Var(_) => write_var(&mut out, terms, labels, id),
            Node::App(atom, args) => {
                match atoms.name(*atom) {
                    Some(name) => out.push_str(name),
                    None => {
                        let _ = write!(out, "#{}", atom.raw());
                    }
                }
                if args.is_empty() {
                    continue;
                }
                out.push('(');
                stack.push(Piece::Text(")"));
                for (i, &arg) in args.iter().enumerate().rev() {
                    stack.push(Piece::Term(arg));
                    if i > 0 {
                        stack.push(Piece::Text(", "));
                    }
                }
            }
        }
    }
    out
}

/// Render one event, e.g. `bind(X₀, nil)` or `freeze(V100₀, !=(nil, V100₀))`.
pub fn format_event(
    terms: &TermStore,
    atoms: &AtomTable,
    labels: &mut Labels,
    event: Event,
) -> String {
    let (kind, var, payload) = match event {
        Event::Bind { var, value } => ("bind", var, value),
        Event::Unbind { var, value } => ("unbind", var, value),
        Event::Freeze { var, constraint } => ("freeze", var, constraint),
        Event::Unfreeze { var, constraint } => ("unfreeze", var, constraint),
    };
    let mut out = format!("{}(", kind);
    write_var(&mut out, terms, labels, var);
    out.push_str(", ");
    out.push_str(&format_term(terms, atoms, labels, payload));
    out.push(')');
    out
}

/// Render both logs, positive side first, as one bracketed list.
pub fn format_log(terms: &TermStore, atoms: &AtomTable, labels: &mut Labels, logs: &Logs) -> String {
    let events: Vec<String> = logs
        .side(Side::Pos)
        .iter()
        .chain(logs.side(Side::Neg))
        .map(|&event| format_event(terms, atoms, labels, event))
        .collect();
    format!("[{}]", events.join(", "))
}

/// Render the constraints suspended on a variable, oldest first.
pub fn format_coroutines(
    terms: &TermStore,
    atoms: &AtomTable,
    labels: &mut Labels,
    var: TermId,
) -> String {
    let root = terms.deref(var);
    let suspended = terms
        .var_cell(root)
        .map(|cell| cell.coroutines.clone())
        .unwrap_or_default();
    let rendered: Vec<String> = suspended
        .into_iter()
        .map(|c| format_term(terms, atoms, labels, c))
        .collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Atom;
    use crate::test_utils::setup;
    use smallvec::smallvec;

    #[test]
    fn unnamed_variables_get_numbered_labels() {
        let (atoms, mut terms) = setup();
        let a = terms.var(0);
        let b = terms.var(13);
        let mut labels = Labels::new();
        assert_eq!(format_term(&terms, &atoms, &mut labels, a), "V100₀");
        assert_eq!(format_term(&terms, &atoms, &mut labels, b), "V101₁₃");
        assert_eq!(format_term(&terms, &atoms, &mut labels, a), "V100₀");
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn preset_names_are_kept() {
        let (atoms, mut terms) = setup();
        let x = terms.var(1);
        let mut labels = Labels::with_names([(x, "X")]);
        assert_eq!(format_term(&terms, &atoms, &mut labels, x), "X₁");
    }

    #[test]
    fn compounds_print_with_arguments() {
        let (mut atoms, mut terms) = setup();
        let cons = atoms.register("cons", 2);
        let nil = atoms.register("nil", 0);
        let x = terms.var(0);
        let n = terms.app0(nil).unwrap();
        let list = terms.app(cons, smallvec![x, n]).unwrap();
        let mut labels = Labels::with_names([(x, "X")]);
        assert_eq!(
            format_term(&terms, &atoms, &mut labels, list),
            "cons(X₀, nil)"
        );
    }

    #[test]
    fn bound_variables_print_their_value() {
        let (mut atoms, mut terms) = setup();
        let nil = atoms.register("nil", 0);
        let x = terms.var(0);
        let n = terms.app0(nil).unwrap();
        let mut logs = Logs::new();
        logs.record(&mut terms, Side::Pos, Event::Bind { var: x, value: n });
        let mut labels = Labels::with_names([(x, "X")]);
        assert_eq!(format_term(&terms, &atoms, &mut labels, x), "nil");
        assert_eq!(
            format_log(&terms, &atoms, &mut labels, &logs),
            "[bind(X₀, nil)]"
        );
    }

    #[test]
    fn log_lists_positive_events_first() {
        let (atoms, mut terms) = setup();
        let x = terms.var(0);
        let y = terms.var(1);
        let c = terms.app2(Atom::NEQ, x, y).unwrap();
        let mut logs = Logs::new();
        logs.record(&mut terms, Side::Neg, Event::Freeze { var: y, constraint: c });
        logs.record(&mut terms, Side::Pos, Event::Freeze { var: x, constraint: c });
        let mut labels = Labels::with_names([(x, "X"), (y, "Y")]);
        assert_eq!(
            format_log(&terms, &atoms, &mut labels, &logs),
            "[freeze(X₀, !=(X₀, Y₁)), freeze(Y₁, !=(X₀, Y₁))]"
        );
        assert_eq!(
            format_coroutines(&terms, &atoms, &mut labels, y),
            "[!=(X₀, Y₁)]"
        );
    }
}
