//! In-memory page maps backed by a write-once directory layout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::{Document, Namespace};

const EXTENSION: &str = "html";

/// Page cache for one distribution/architecture pair.
///
/// A disabled cache never touches the disk and never reports a hit, forcing
/// every lookup to go to the network.
///
/// # Examples
///
/// ```no_run
/// use pkgdl_cache::{Document, Namespace, PageCache};
///
/// # async fn example() -> pkgdl_cache::error::Result<()> {
/// let mut cache = PageCache::for_target("cache", "noble", "amd64");
/// cache.load(Namespace::Page).await?;
/// if cache.get(Namespace::Page, "curl").is_none() {
///     cache.put(Namespace::Page, "curl", Document::new("<html>...</html>"));
/// }
/// cache.flush(Namespace::Page).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PageCache {
    /// `None` when caching is disabled.
    root: Option<PathBuf>,
    pages: HashMap<Namespace, HashMap<String, Document>>,
}

impl PageCache {
    /// Cache rooted directly at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            pages: HashMap::new(),
        }
    }

    /// Cache rooted at `{cache_dir}/{distribution}-{architecture}`.
    pub fn for_target(cache_dir: impl AsRef<Path>, distribution: &str, architecture: &str) -> Self {
        Self::new(cache_dir.as_ref().join(format!("{distribution}-{architecture}")))
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    /// Directory holding the namespace's files, if caching is enabled.
    pub fn directory(&self, namespace: Namespace) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join(namespace.as_str()))
    }

    /// Reads every `*.html` file of the namespace directory into memory.
    ///
    /// A missing directory is an empty cache, not an error. Entries already in
    /// memory are kept. Returns the number of documents read.
    #[instrument(skip(self), fields(directory))]
    pub async fn load(&mut self, namespace: Namespace) -> Result<usize> {
        let Some(directory) = self.directory(namespace) else {
            return Ok(0);
        };
        tracing::Span::current().record("directory", tracing::field::display(directory.display()));
        let mut entries = match fs::read_dir(&directory).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => exn::bail!(Self::map_io_error(err, &directory)),
        };
        let pages = self.pages.entry(namespace).or_default();
        let mut loaded = 0;
        while let Some(entry) = entries.next_entry().await.map_err(|e| Self::map_io_error(e, &directory))? {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|e| Self::map_io_error(e, &path))?;
            if !file_type.is_file() {
                continue;
            }
            let Some(name) = Self::package_name(&path) else {
                tracing::debug!(path = %path.display(), "Ignoring non-page file in cache directory");
                continue;
            };
            if pages.contains_key(&name) {
                continue;
            }
            let bytes = fs::read(&path).await.map_err(|e| Self::map_io_error(e, &path))?;
            pages.insert(name, Document::from_bytes(bytes));
            loaded += 1;
        }
        tracing::info!(%namespace, loaded, "Loaded page cache");
        Ok(loaded)
    }

    pub fn get(&self, namespace: Namespace, name: &str) -> Option<&Document> {
        if !self.is_enabled() {
            return None;
        }
        self.pages.get(&namespace)?.get(name)
    }

    pub fn put(&mut self, namespace: Namespace, name: impl Into<String>, document: Document) {
        if !self.is_enabled() {
            return;
        }
        self.pages.entry(namespace).or_default().insert(name.into(), document);
    }

    /// Number of documents held in memory for the namespace.
    pub fn len(&self, namespace: Namespace) -> usize {
        self.pages.get(&namespace).map(HashMap::len).unwrap_or_default()
    }

    /// Writes every in-memory document whose file does not exist yet.
    ///
    /// Existing files are never overwritten. Returns the number of files
    /// written.
    #[instrument(skip(self))]
    pub async fn flush(&self, namespace: Namespace) -> Result<usize> {
        let Some(directory) = self.directory(namespace) else {
            return Ok(0);
        };
        let Some(pages) = self.pages.get(&namespace).filter(|pages| !pages.is_empty()) else {
            return Ok(0);
        };
        Self::ensure_directory(&directory).await?;
        let mut written = 0;
        for (name, document) in pages {
            let path = Self::entry_path(&directory, name)?;
            if fs::try_exists(&path).await.map_err(|e| Self::map_io_error(e, &path))? {
                continue;
            }
            fs::write(&path, document.as_str()).await.map_err(|e| Self::map_io_error(e, &path))?;
            written += 1;
        }
        tracing::info!(%namespace, written, "Flushed page cache");
        Ok(written)
    }

    async fn ensure_directory(directory: &Path) -> Result<()> {
        match fs::metadata(directory).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => exn::bail!(ErrorKind::NotADirectory(directory.to_path_buf())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(fs::create_dir_all(directory).await.map_err(|e| Self::map_io_error(e, directory))?)
            },
            Err(err) => exn::bail!(Self::map_io_error(err, directory)),
        }
    }

    /// File path of a package inside a namespace directory.
    ///
    /// Rejects names that would leave the directory.
    fn entry_path(directory: &Path, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
            exn::bail!(ErrorKind::InvalidName(name.to_string()));
        }
        Ok(directory.join(format!("{name}.{EXTENSION}")))
    }

    /// Package name of a cache file: the file name minus its final extension.
    fn package_name(path: &Path) -> Option<String> {
        if path.extension()? != EXTENSION {
            return None;
        }
        let name = path.file_stem()?.to_str()?;
        (!name.is_empty()).then(|| name.to_string())
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}
