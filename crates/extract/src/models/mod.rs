mod dependencies;
mod mirror;
mod relation;

pub use self::dependencies::{Dependencies, Unavailable};
pub use self::mirror::MirrorMap;
pub use self::relation::{Relation, RelationFilter};
