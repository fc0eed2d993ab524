use crate::symbol::AtomTable;
use crate::term::TermStore;

pub(crate) fn setup() -> (AtomTable, TermStore) {
    (AtomTable::new(), TermStore::new())
}
