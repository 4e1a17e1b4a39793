//! Resolve Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the fetch and cache
//! crates are raised into one of the kinds below, keeping the inner error as a
//! child frame.

use derive_more::{Display, Error};
use pkgdl_extract::error::{Error as ExtractError, ErrorKind as ExtractErrorKind};
use std::path::PathBuf;

/// A resolve error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolve operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a failed run.
///
/// ### Remote Errors
/// - [`ErrorKind::Metadata`]
/// - [`ErrorKind::ArchPage`]
/// - [`ErrorKind::Download`]
/// - [`ErrorKind::PageError`]
///
/// ### Content Errors
/// - [`ErrorKind::Extract`]
/// - [`ErrorKind::NoMirrors`]
/// - [`ErrorKind::InvalidUrl`]
/// - [`ErrorKind::InvalidFilename`]
///
/// ### Local Errors
/// - [`ErrorKind::Cache`]
/// - [`ErrorKind::Io`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The metadata page of a package could not be fetched.
    #[display("could not fetch metadata page of package '{_0}'")]
    Metadata(#[error(not(source))] String),
    /// The architecture page of a package could not be fetched.
    #[display("could not fetch architecture page of package '{_0}'")]
    ArchPage(#[error(not(source))] String),
    /// The artifact of a package could not be fetched.
    #[display("could not download package '{_0}'")]
    Download(#[error(not(source))] String),
    /// The index served a page carrying its own error message.
    #[display("page error for package '{name}': {message}")]
    PageError { name: String, message: String },
    /// A page lacks content the index always provides.
    #[display("unexpected page content: {_0}")]
    Extract(ExtractErrorKind),
    /// The architecture page lists no mirror to download from.
    #[display("no mirror serves package '{_0}'")]
    NoMirrors(#[error(not(source))] String),
    /// A link found on a page cannot be turned into a URL.
    #[display("invalid link: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The artifact file name would escape the download directory.
    #[display("invalid artifact file name: {_0:?}")]
    InvalidFilename(#[error(not(source))] String),
    /// The page cache could not be loaded or written.
    #[display("page cache failure")]
    Cache,
    /// A local file could not be read or written.
    #[display("I/O error at {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Convert an extraction error into a resolve error, keeping the extract
    /// crate's frame as a child.
    #[track_caller]
    pub fn extract(err: ExtractError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Extract(inner))
    }

    /// Returns `true` if retrying might succeed.
    ///
    /// Remote kinds defer to the fetch error below them.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
