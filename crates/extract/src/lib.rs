//! Site-schema knowledge for package index pages.
//!
//! Everything that knows about element ids, classes and list structure of the
//! package index lives in this crate. Callers hand over raw HTML and get back
//! domain types: a [`Dependencies`] set, an architecture link, a file name, a
//! [`MirrorMap`], or the page-level error message.
//!
//! Parsed documents are not [`Send`]; parse, extract, and drop within a single
//! synchronous call.

mod arch;
mod consts;
pub mod error;
pub mod models;
mod page;

pub use crate::arch::ArchPage;
pub use crate::models::{Dependencies, MirrorMap, Relation, RelationFilter, Unavailable};
pub use crate::page::MetadataPage;

use scraper::{ElementRef, Html};

/// Returns the message of the page-level error region, if the page has one.
pub(crate) fn page_error(document: &Html) -> Option<String> {
    let region = document.select(&consts::PAGE_ERROR_SELECTOR).next()?;
    let message = region
        .select(&consts::PARAGRAPH_SELECTOR)
        .next()
        .map(|p| text_of(&p))
        .unwrap_or_else(|| text_of(&region));
    Some(message)
}

/// Collapsed, trimmed text content of an element.
pub(crate) fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}
