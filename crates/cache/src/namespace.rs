use std::fmt::{Display, Formatter, Result as FmtResult};

/// Cache partition; each holds one kind of page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Package metadata pages.
    Page,
    /// Architecture-specific download pages.
    ArchPage,
}
impl Namespace {
    pub const ALL: [Namespace; 2] = [Self::Page, Self::ArchPage];

    /// Directory name of the namespace inside the cache root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::ArchPage => "arch-page",
        }
    }
}
impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
