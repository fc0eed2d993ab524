//! A resolution engine for a polarized logic language.
//!
//! Goals are terms built from `=`/`!=`, parallel and choice connectives,
//! scope markers and relation calls. Each variable belongs to one side of
//! the proof by the parity of its index; a side binds its own variables and
//! freezes disequalities on the other side's. Every mutation goes through the
//! per-side undo logs, so any branch can be reverted exactly, and alternatives
//! wait in a first-in first-out retry queue.

pub mod dup;
pub mod error;
pub mod goal;
pub mod kont;
#[doc(hidden)]
pub mod lists;
pub mod program;
pub mod render;
pub mod retry;
pub mod solve;
pub mod symbol;
pub mod term;
pub mod trace;
pub mod undo;
pub mod unify;

pub use error::EngineError;
pub use program::{Program, Rule};
pub use retry::{ChoicePoint, RetryQueue};
pub use solve::{solve, solve_next, Outcome, SolveCtx};
pub use symbol::{Atom, AtomTable};
pub use term::{Side, TermId, TermStore};
pub use undo::{Event, Logs};

#[cfg(test)]
pub(crate) mod test_utils;
