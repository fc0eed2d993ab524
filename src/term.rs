use crate::error::EngineError;
use crate::symbol::Atom;
use smallvec::SmallVec;

/// Handle of a node in the term store.
/// Two handles are the same object iff they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(u32);

impl TermId {
    /// Get the raw u32 value (for debugging/display).
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Which proof side owns a variable or runs a goal.
///
/// Side 0 proves equalities and owns even-indexed variables; side 1 proves
/// disequalities and owns odd-indexed variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Pos = 0,
    Neg = 1,
}

impl Side {
    /// Polarity of a variable index.
    pub fn of_index(index: u32) -> Side {
        if index & 1 == 0 {
            Side::Pos
        } else {
            Side::Neg
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn flip(self) -> Side {
        match self {
            Side::Pos => Side::Neg,
            Side::Neg => Side::Pos,
        }
    }

    /// The value that lets a connective of this side move on to its sibling:
    /// `false` for disjunctions (side 0), `true` for conjunctions (side 1).
    pub fn identity(self) -> bool {
        self == Side::Neg
    }
}

/// A mutable variable cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarCell {
    /// Parity is the polarity, magnitude orders bindings.
    pub index: u32,
    /// None while unbound.
    pub instance: Option<TermId>,
    /// Constraint goals suspended until this variable is bound.
    pub coroutines: Vec<TermId>,
}

/// A node is either a variable cell or an atom applied to arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Var(VarCell),
    App(Atom, SmallVec<[TermId; 4]>),
}

const TRUE_ID: TermId = TermId(0);
const FALSE_ID: TermId = TermId(1);

/// Arena of terms.
///
/// Nodes are never freed or hashconsed: every construction yields a new
/// identity, and variables are rebound in place. Cells are addressed by
/// index, so sharing survives without pointer aliasing.
#[derive(Debug, Clone)]
pub struct TermStore {
    nodes: Vec<Node>,
    /// Per node: built from applications only. Arguments never change, so
    /// the flag is fixed at construction.
    ground: Vec<bool>,
}

impl TermStore {
    /// Create a store holding the `true` and `false` constants.
    pub fn new() -> Self {
        let mut store = Self {
            nodes: Vec::new(),
            ground: Vec::new(),
        };
        let t = store.push(Node::App(Atom::TRUE, SmallVec::new()));
        let f = store.push(Node::App(Atom::FALSE, SmallVec::new()));
        debug_assert_eq!((t, f), (TRUE_ID, FALSE_ID));
        store
    }

    fn push(&mut self, node: Node) -> TermId {
        let id = TermId(self.nodes.len() as u32);
        let ground = match &node {
            Node::Var(_) => false,
            Node::App(_, args) => args.iter().all(|arg| self.ground[arg.0 as usize]),
        };
        self.nodes.push(node);
        self.ground.push(ground);
        id
    }

    /// Create a fresh unbound variable.
    pub fn var(&mut self, index: u32) -> TermId {
        self.var_with_coroutines(index, Vec::new())
    }

    pub(crate) fn var_with_coroutines(&mut self, index: u32, coroutines: Vec<TermId>) -> TermId {
        self.push(Node::Var(VarCell {
            index,
            instance: None,
            coroutines,
        }))
    }

    /// Create an application, checking the argument count against the atom.
    pub fn app(&mut self, atom: Atom, args: SmallVec<[TermId; 4]>) -> Result<TermId, EngineError> {
        if args.len() != atom.arity() {
            return Err(EngineError::ArityMismatch {
                atom,
                expected: atom.arity(),
                found: args.len(),
            });
        }
        Ok(self.push(Node::App(atom, args)))
    }

    /// Create a nullary (0-arity) application.
    pub fn app0(&mut self, atom: Atom) -> Result<TermId, EngineError> {
        self.app(atom, SmallVec::new())
    }

    /// Create a unary (1-arity) application.
    pub fn app1(&mut self, atom: Atom, arg: TermId) -> Result<TermId, EngineError> {
        self.app(atom, smallvec::smallvec![arg])
    }

    /// Create a binary (2-arity) application.
    pub fn app2(&mut self, atom: Atom, left: TermId, right: TermId) -> Result<TermId, EngineError> {
        self.app(atom, smallvec::smallvec![left, right])
    }

    /// Build a connective whose arity is known to match.
    pub(crate) fn connective(&mut self, atom: Atom, args: SmallVec<[TermId; 4]>) -> TermId {
        debug_assert_eq!(args.len(), atom.arity());
        self.push(Node::App(atom, args))
    }

    pub(crate) fn connective2(&mut self, atom: Atom, left: TermId, right: TermId) -> TermId {
        self.connective(atom, smallvec::smallvec![left, right])
    }

    /// The shared `true` or `false` constant.
    pub fn truth(&self, value: bool) -> TermId {
        if value {
            TRUE_ID
        } else {
            FALSE_ID
        }
    }

    /// Read a node as stored, without dereferencing.
    pub fn node(&self, id: TermId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// True if no variable cell, bound or not, is reachable from `id`.
    pub fn is_ground(&self, id: TermId) -> bool {
        self.ground[id.0 as usize]
    }

    /// Follow variable bindings until reaching an unbound variable or an
    /// application.
    pub fn deref(&self, mut id: TermId) -> TermId {
        while let Node::Var(VarCell {
            instance: Some(next),
            ..
        }) = self.node(id)
        {
            id = *next;
        }
        id
    }

    /// The cell of `id` if it is a variable (bound or not).
    pub fn var_cell(&self, id: TermId) -> Option<&VarCell> {
        match self.node(id) {
            Node::Var(cell) => Some(cell),
            Node::App(..) => None,
        }
    }

    /// The cell of the dereferenced term, if it is an unbound variable.
    pub fn unbound(&self, id: TermId) -> Option<(TermId, &VarCell)> {
        let root = self.deref(id);
        self.var_cell(root).map(|cell| (root, cell))
    }

    /// Functor and arguments of the dereferenced term, if it is an application.
    pub fn is_app(&self, id: TermId) -> Option<(Atom, SmallVec<[TermId; 4]>)> {
        match self.node(self.deref(id)) {
            Node::Var(_) => None,
            Node::App(atom, args) => Some((*atom, args.clone())),
        }
    }

    /// Functor of the dereferenced term, if it is an application.
    pub fn atom_of(&self, id: TermId) -> Option<Atom> {
        match self.node(self.deref(id)) {
            Node::Var(_) => None,
            Node::App(atom, _) => Some(*atom),
        }
    }

    /// Truth value of a terminal goal.
    pub fn as_truth(&self, id: TermId) -> Option<bool> {
        match self.atom_of(id)? {
            Atom::TRUE => Some(true),
            Atom::FALSE => Some(false),
            _ => None,
        }
    }

    fn cell_mut(&mut self, var: TermId) -> &mut VarCell {
        match &mut self.nodes[var.0 as usize] {
            Node::Var(cell) => cell,
            Node::App(..) => unreachable!("term #{} is not a variable", var.0),
        }
    }

    pub(crate) fn set_instance(&mut self, var: TermId, value: Option<TermId>) {
        self.cell_mut(var).instance = value;
    }

    pub(crate) fn push_coroutine(&mut self, var: TermId, constraint: TermId) {
        self.cell_mut(var).coroutines.push(constraint);
    }

    pub(crate) fn pop_coroutine(&mut self, var: TermId) -> Option<TermId> {
        self.cell_mut(var).coroutines.pop()
    }

    /// Identity after dereferencing both sides.
    pub fn same(&self, a: TermId, b: TermId) -> bool {
        self.deref(a) == self.deref(b)
    }

    /// Same atoms and pairwise equal arguments, with variables compared by
    /// identity of their roots.
    pub fn structurally_equal(&self, a: TermId, b: TermId) -> bool {
        let mut stack: SmallVec<[(TermId, TermId); 16]> = SmallVec::new();
        stack.push((a, b));
        while let Some((x, y)) = stack.pop() {
            let (x, y) = (self.deref(x), self.deref(y));
            if x == y {
                continue;
            }
            match (self.node(x), self.node(y)) {
                (Node::App(fx, xs), Node::App(fy, ys)) if fx == fy => {
                    stack.extend(xs.iter().copied().zip(ys.iter().copied()));
                }
                _ => return false,
            }
        }
        true
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for TermStore {
    fn default() -> Self {
        Self::new()
    }
}
