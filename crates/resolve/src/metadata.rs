//! Metadata pages: `{base}/{distribution}/{name}`.

use exn::{OptionExt, ResultExt};
use pkgdl_cache::{Document, Namespace};
use pkgdl_extract::{Dependencies, MetadataPage, Relation};
use tokio::fs;
use tracing::instrument;
use url::Url;

use crate::Context;
use crate::error::{ErrorKind, Result};

impl Context {
    /// URL of a package's metadata page, below the index base URL.
    pub fn metadata_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()
            .ok_or_raise(|| ErrorKind::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([self.settings.distribution.as_str(), name]);
        Ok(url)
    }

    /// Returns the metadata page of a package, from the cache when possible.
    ///
    /// A freshly fetched page is cached only once it is known not to carry a
    /// page error.
    ///
    /// # Errors
    ///
    /// - [`Metadata`](ErrorKind::Metadata) if the page cannot be fetched. When
    ///   the server answered at all, its body is first written to the
    ///   configured error page for inspection.
    /// - [`PageError`](ErrorKind::PageError) if the page reports an error.
    #[instrument(skip(self))]
    pub async fn resolve_metadata(&mut self, name: &str) -> Result<Document> {
        if let Some(document) = self.cache.get(Namespace::Page, name) {
            return Ok(document.clone());
        }
        tracing::info!("Visiting metadata page");
        let url = self.metadata_url(name)?;
        let body = match self.fetcher.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(err) => {
                if let Some(body) = err.body() {
                    self.write_error_page(body).await;
                }
                return Err(err).or_raise(|| ErrorKind::Metadata(name.to_string()));
            },
        };
        let document = Document::from_bytes(body);
        if let Some(message) = MetadataPage::parse(document.as_str()).error_message() {
            exn::bail!(ErrorKind::PageError {
                name: name.to_string(),
                message,
            });
        }
        self.cache.put(Namespace::Page, name, document.clone());
        Ok(document)
    }

    /// Packages the given package points at, according to the relation
    /// settings.
    ///
    /// Entries without a package link are skipped and only logged.
    pub async fn dependencies(&mut self, name: &str) -> Result<Dependencies> {
        let document = self.resolve_metadata(name).await?;
        let dependencies = MetadataPage::parse(document.as_str()).dependencies(self.relation_filter());
        for unavailable in &dependencies.unavailable {
            match unavailable.relation {
                Relation::Depends => {
                    tracing::warn!(package = name, label = %unavailable.label, "Skipping unlinked dependency");
                },
                relation => {
                    tracing::info!(package = name, %relation, label = %unavailable.label, "Unavailable package");
                },
            }
        }
        Ok(dependencies)
    }

    async fn write_error_page(&self, body: &[u8]) {
        let path = &self.settings.error_page;
        match fs::write(path, body).await {
            Ok(()) => tracing::info!(path = %path.display(), "Wrote failed response body"),
            Err(err) => tracing::warn!(path = %path.display(), %err, "Could not write failed response body"),
        }
    }
}
