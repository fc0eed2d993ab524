use lasso::{Rodeo, Spur};

/// A functor identity.
///
/// Atoms are compared by the id handed out at registration, never by name:
/// registering "f" twice yields two distinct atoms. The arity travels with the
/// handle so compound construction can be checked without a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    id: u32,
    arity: u32,
}

impl Atom {
    pub const TRUE: Atom = Atom::builtin(0, 0);
    pub const FALSE: Atom = Atom::builtin(1, 0);
    pub const EQ: Atom = Atom::builtin(2, 2);
    pub const NEQ: Atom = Atom::builtin(3, 2);
    pub const PCONJ: Atom = Atom::builtin(4, 2);
    pub const PDISJ: Atom = Atom::builtin(5, 2);
    pub const CCONJ: Atom = Atom::builtin(6, 2);
    pub const CDISJ: Atom = Atom::builtin(7, 2);
    /// Quantifier scope marker on the negative side.
    pub const ICONJ: Atom = Atom::builtin(8, 1);
    /// Quantifier scope marker on the positive side.
    pub const IDISJ: Atom = Atom::builtin(9, 1);

    const BUILTINS: [(&str, Atom); 10] = [
        ("true", Atom::TRUE),
        ("false", Atom::FALSE),
        ("=", Atom::EQ),
        ("!=", Atom::NEQ),
        ("pconj", Atom::PCONJ),
        ("pdisj", Atom::PDISJ),
        ("cconj", Atom::CCONJ),
        ("cdisj", Atom::CDISJ),
        ("iconj", Atom::ICONJ),
        ("idisj", Atom::IDISJ),
    ];

    const fn builtin(id: u32, arity: u32) -> Self {
        Atom { id, arity }
    }

    /// Number of arguments a compound tagged by this atom must carry.
    pub fn arity(self) -> usize {
        self.arity as usize
    }

    /// Raw registration id (for debugging/display).
    pub fn raw(self) -> u32 {
        self.id
    }

    /// True for the connectives the solver interprets itself.
    pub fn is_builtin(self) -> bool {
        (self.id as usize) < Atom::BUILTINS.len()
    }
}

/// Registry of atoms and their display names.
///
/// Guarantees:
/// - Every `register` call produces a fresh identity
/// - Built-in connectives occupy the first ids, in `Atom::BUILTINS` order
/// - Names are interned, so repeated names share storage
pub struct AtomTable {
    names: Rodeo,
    atoms: Vec<Spur>,
}

impl AtomTable {
    /// Create a table holding only the built-in connectives.
    pub fn new() -> Self {
        let mut table = Self {
            names: Rodeo::new(),
            atoms: Vec::new(),
        };
        for (name, atom) in Atom::BUILTINS {
            let registered = table.register(name, atom.arity());
            debug_assert_eq!(registered, atom);
        }
        table
    }

    /// Register a new atom. Two registrations never compare equal, even
    /// when they share a name.
    pub fn register(&mut self, name: &str, arity: usize) -> Atom {
        let spur = self.names.get_or_intern(name);
        let id = self.atoms.len() as u32;
        self.atoms.push(spur);
        Atom {
            id,
            arity: arity as u32,
        }
    }

    /// Display name of an atom. Returns None for atoms from another table.
    pub fn name(&self, atom: Atom) -> Option<&str> {
        let spur = self.atoms.get(atom.id as usize)?;
        Some(self.names.resolve(spur))
    }

    /// Relations whose name starts with `!` are proved on the negative side.
    pub fn is_negated(&self, atom: Atom) -> bool {
        self.name(atom).is_some_and(|name| name.starts_with('!'))
    }

    /// Number of registered atoms, built-ins included.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

impl Default for AtomTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_to_their_names() {
        let atoms = AtomTable::new();
        assert_eq!(atoms.name(Atom::TRUE), Some("true"));
        assert_eq!(atoms.name(Atom::NEQ), Some("!="));
        assert_eq!(atoms.name(Atom::IDISJ), Some("idisj"));
        assert!(Atom::PCONJ.is_builtin());
    }

    #[test]
    fn same_name_registers_distinct_atoms() {
        let mut atoms = AtomTable::new();
        let f1 = atoms.register("f", 1);
        let f2 = atoms.register("f", 1);
        assert_ne!(f1, f2, "identity, not name, is the equality key");
        assert_eq!(atoms.name(f1), atoms.name(f2));
        assert!(!f1.is_builtin());
    }

    #[test]
    fn arity_travels_with_the_handle() {
        let mut atoms = AtomTable::new();
        let cons = atoms.register("cons", 2);
        assert_eq!(cons.arity(), 2);
        assert_eq!(Atom::ICONJ.arity(), 1);
    }

    #[test]
    fn bang_prefix_marks_negated_relations() {
        let mut atoms = AtomTable::new();
        let append = atoms.register("append", 3);
        let not_append = atoms.register("!append", 3);
        assert!(!atoms.is_negated(append));
        assert!(atoms.is_negated(not_append));
    }

    #[test]
    fn foreign_atom_has_no_name() {
        let mut other = AtomTable::new();
        let mut atoms = AtomTable::new();
        let _ = atoms.register("x", 0);
        let late = other.register("a", 0);
        let later = other.register("b", 0);
        assert!(atoms.name(later).is_none());
        assert!(atoms.name(late).is_some());
    }
}
