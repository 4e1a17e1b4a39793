//! On-disk cache of package index pages.
//!
//! Fetched pages are kept in memory for the lifetime of a run and persisted as
//! raw HTML, one file per package per [`Namespace`]:
//!
//! ```text
//! {cache_dir}/{distribution}-{architecture}/page/{name}.html
//! {cache_dir}/{distribution}-{architecture}/arch-page/{name}.html
//! ```
//!
//! The cache is append-only. A file that already exists on disk is never
//! overwritten, so a corrupted entry stays corrupted until removed by hand.
//! The in-memory map is the authority on what has been seen this run.

mod document;
pub mod error;
mod namespace;
mod store;

pub use crate::document::Document;
pub use crate::namespace::Namespace;
pub use crate::store::PageCache;
