//! Dependency resolution and downloads against a package index.
//!
//! A [`Context`] owns everything a run touches. Starting from seed packages it
//! walks metadata pages breadth-first to find the dependency closure, then
//! follows each package's download region to its architecture page and
//! fetches the artifact from a mirror:
//!
//! ```text
//! seeds -> metadata pages -> closure -> architecture pages -> mirrors -> files
//! ```
//!
//! Every fetch goes through the [`Fetcher`](pkgdl_fetch::Fetcher) one request
//! at a time, and every page goes through the [`PageCache`](pkgdl_cache::PageCache).

mod arch;
mod closure;
mod context;
mod download;
pub mod error;
mod metadata;
mod run;
#[cfg(test)]
mod testutil;
mod warnings;

pub use crate::closure::ClosureState;
pub use crate::context::{Context, retry_policy};
pub use crate::download::DownloadOutcome;
pub use crate::run::Report;
pub use crate::warnings::{REPORT_HEADER, WarningLog};
