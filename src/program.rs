use crate::symbol::Atom;
use crate::term::TermId;
use hashbrown::HashMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

/// A relation definition: the head pattern and the body goal proving it.
/// Both are instantiated together, so variables shared between them stay
/// shared in every copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub head: TermId,
    pub body: TermId,
}

/// The rule database, keyed by atom identity.
///
/// Populated by the caller; the solver only ever looks rules up.
#[derive(Debug, Default, Clone)]
pub struct Program {
    rules: HashMap<Atom, Rule, BuildHasherDefault<FxHasher>>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) the relation `atom`.
    pub fn insert(&mut self, atom: Atom, head: TermId, body: TermId) {
        self.rules.insert(atom, Rule { head, body });
    }

    /// Get the rule for a relation.
    pub fn get(&self, atom: Atom) -> Option<&Rule> {
        self.rules.get(&atom)
    }

    /// Number of relations.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
