use super::Relation;
use std::collections::BTreeSet;

/// A listed relation whose entry does not link to a concrete package, usually
/// because the package is not published for this distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    pub relation: Relation,
    /// Visible text of the entry, for logging.
    pub label: String,
}

/// Package names a metadata page points at, derived fresh on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// Named packages, in lexicographic order.
    pub names: BTreeSet<String>,
    /// Entries that were skipped because they have no package link.
    pub unavailable: Vec<Unavailable>,
}
impl Dependencies {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
impl IntoIterator for Dependencies {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;
    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}
