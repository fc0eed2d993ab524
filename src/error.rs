use crate::symbol::Atom;
use crate::term::TermId;

/// A malformed program or goal.
///
/// These abort the run. Proof-search failure is never an error: it shows up
/// as an ordinary [`crate::solve::Outcome`] or as an exhausted retry queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A compound was built with the wrong number of arguments.
    ArityMismatch {
        atom: Atom,
        expected: usize,
        found: usize,
    },
    /// A goal names a functor that is neither a connective nor in the program.
    UnknownRelation { atom: String },
    /// A goal dereferenced to an unbound variable.
    NotAGoal(TermId),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::ArityMismatch {
                atom,
                expected,
                found,
            } => write!(
                f,
                "Arity mismatch for atom #{}: expected {} arguments, found {}",
                atom.raw(),
                expected,
                found
            ),
            EngineError::UnknownRelation { atom } => {
                write!(f, "Unknown relation {}", atom)
            }
            EngineError::NotAGoal(term) => {
                write!(f, "Term #{} is an unbound variable, not a goal", term.raw())
            }
        }
    }
}

impl std::error::Error for EngineError {}
