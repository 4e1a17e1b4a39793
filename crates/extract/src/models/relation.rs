use std::fmt::{Display, Formatter, Result as FmtResult};

/// Kind of edge between two packages, as listed in the dependency region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// Required for the package to work.
    Depends,
    /// Installed alongside the package by default.
    Recommends,
    /// Optional extras.
    Suggests,
}
impl Relation {
    /// All relations, in the order they appear on a metadata page.
    pub const ALL: [Relation; 3] = [Self::Depends, Self::Recommends, Self::Suggests];

    /// CSS class of the sub-list holding this relation.
    pub(crate) fn list_class(&self) -> &'static str {
        match self {
            Self::Depends => "uldep",
            Self::Recommends => "ulrec",
            Self::Suggests => "ulsug",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Depends => "dependency",
            Self::Recommends => "recommendation",
            Self::Suggests => "suggestion",
        }
    }
}
impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Which optional relations to follow in addition to required dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationFilter {
    pub recommends: bool,
    pub suggests: bool,
}
impl RelationFilter {
    pub fn new(recommends: bool, suggests: bool) -> Self {
        Self { recommends, suggests }
    }

    /// Required dependencies are always followed.
    pub fn includes(&self, relation: Relation) -> bool {
        match relation {
            Relation::Depends => true,
            Relation::Recommends => self.recommends,
            Relation::Suggests => self.suggests,
        }
    }
}
