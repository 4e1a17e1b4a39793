//! Architecture pages, reached through the download region of a metadata page.

use exn::ResultExt;
use pkgdl_cache::{Document, Namespace};
use pkgdl_extract::{ArchPage, MetadataPage};
use tracing::instrument;

use crate::Context;
use crate::error::{ErrorKind, Result};

impl Context {
    /// Returns the architecture page of a package, or `None` when the package
    /// has nothing to download.
    ///
    /// An architecture-independent build is preferred over the configured
    /// architecture.
    ///
    /// # Errors
    ///
    /// - [`Extract`](ErrorKind::Extract) if the download region lists neither
    ///   build, or the chosen link has no target.
    /// - [`ArchPage`](ErrorKind::ArchPage) if the page cannot be fetched.
    /// - [`PageError`](ErrorKind::PageError) if the page reports an error.
    #[instrument(skip(self))]
    pub async fn resolve_arch_page(&mut self, name: &str) -> Result<Option<Document>> {
        if let Some(document) = self.cache.get(Namespace::ArchPage, name) {
            return Ok(Some(document.clone()));
        }
        let metadata = self.resolve_metadata(name).await?;
        let link = MetadataPage::parse(metadata.as_str())
            .architecture_link(&self.settings.architecture)
            .map_err(ErrorKind::extract)?;
        let Some(href) = link else {
            return Ok(None);
        };
        let url = self.join(&href)?;
        tracing::info!(%url, "Visiting architecture page");
        let body = self.fetcher.fetch(url.as_str()).await.or_raise(|| ErrorKind::ArchPage(name.to_string()))?;
        let document = Document::from_bytes(body);
        if let Some(message) = ArchPage::parse(document.as_str()).error_message() {
            exn::bail!(ErrorKind::PageError {
                name: name.to_string(),
                message,
            });
        }
        self.cache.put(Namespace::ArchPage, name, document.clone());
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{BASE_URL, TestIndex, arch_page, metadata_page};
    use pkgdl_extract::error::ErrorKind as ExtractErrorKind;

    const ARCH: &str = "/noble/amd64/curl/download";
    const ALL: &str = "/noble/all/curl/download";

    fn arch_html() -> String {
        arch_page("curl_8.5.0_amd64.deb", &[("de.archive.ubuntu.com/ubuntu", "http://de.example/curl.deb")])
    }

    #[tokio::test]
    async fn test_configured_architecture() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("arm64", "/noble/arm64/curl/download"), ("amd64", ARCH)]));
        index.mirror(&format!("{BASE_URL}{ARCH}"), arch_html().as_bytes());
        let mut ctx = index.context().await;

        let document = ctx.resolve_arch_page("curl").await.unwrap().unwrap();
        assert_eq!(document.as_str(), arch_html());
        assert_eq!(index.transport.request_count(&format!("{BASE_URL}{ARCH}")), 1);
        assert!(ctx.cache().get(Namespace::ArchPage, "curl").is_some());

        // Second lookup is served from the cache.
        ctx.resolve_arch_page("curl").await.unwrap().unwrap();
        assert_eq!(index.transport.request_count(&format!("{BASE_URL}{ARCH}")), 1);
    }

    #[tokio::test]
    async fn test_architecture_independent_is_preferred() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", ARCH), ("all", ALL)]));
        index.mirror(&format!("{BASE_URL}{ALL}"), arch_html().as_bytes());
        let mut ctx = index.context().await;

        assert!(ctx.resolve_arch_page("curl").await.unwrap().is_some());
        assert_eq!(index.transport.request_count(&format!("{BASE_URL}{ALL}")), 1);
        assert_eq!(index.transport.request_count(&format!("{BASE_URL}{ARCH}")), 0);
    }

    #[tokio::test]
    async fn test_absolute_link() {
        let index = TestIndex::new();
        let absolute = "https://mirror.example/noble/amd64/curl/download";
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", absolute)]));
        index.mirror(absolute, arch_html().as_bytes());
        let mut ctx = index.context().await;

        assert!(ctx.resolve_arch_page("curl").await.unwrap().is_some());
        assert_eq!(index.transport.request_count(absolute), 1);
    }

    #[tokio::test]
    async fn test_no_download_region() {
        let index = TestIndex::new();
        index.page("virtual", &metadata_page(&[], &[], &[], &[]));
        let mut ctx = index.context().await;

        assert!(ctx.resolve_arch_page("virtual").await.unwrap().is_none());
        assert_eq!(index.transport.requests(), vec![index.url("virtual")]);
    }

    #[tokio::test]
    async fn test_missing_architecture() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("arm64", "/noble/arm64/curl/download")]));
        let mut ctx = index.context().await;

        let err = ctx.resolve_arch_page("curl").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Extract(ExtractErrorKind::MissingArchitecture(arch)) if arch == "amd64"));
    }

    #[tokio::test]
    async fn test_missing_link() {
        let index = TestIndex::new();
        index.page(
            "curl",
            r#"<html><body><div id="pdownload"><table><tr><th><a>amd64</a></th></tr></table></div></body></html>"#,
        );
        let mut ctx = index.context().await;

        let err = ctx.resolve_arch_page("curl").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Extract(ExtractErrorKind::MissingLink(_))));
    }

    #[tokio::test]
    async fn test_failed_status_is_fatal_without_error_page() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", ARCH)]));
        let mut ctx = index.context().await;

        let err = ctx.resolve_arch_page("curl").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::ArchPage(name) if name == "curl"));
        assert!(!ctx.settings().error_page.exists());
    }

    #[tokio::test]
    async fn test_page_error() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", ARCH)]));
        index.mirror(
            &format!("{BASE_URL}{ARCH}"),
            br#"<html><body><div class="perror"><p>Package not available in this suite.</p></div></body></html>"#,
        );
        let mut ctx = index.context().await;

        let err = ctx.resolve_arch_page("curl").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::PageError { message, .. } if message == "Package not available in this suite."));
        assert!(ctx.cache().get(Namespace::ArchPage, "curl").is_none());
    }
}
