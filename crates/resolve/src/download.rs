use exn::{OptionExt, ResultExt};
use pkgdl_extract::ArchPage;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

use crate::Context;
use crate::error::{ErrorKind, Result};

/// What [`Context::download`] did for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The artifact was fetched and written.
    Downloaded { path: PathBuf, bytes: usize, mirror: String },
    /// The artifact was already in the download directory; nothing was
    /// fetched.
    AlreadyPresent(PathBuf),
    /// The package has no artifact. A warning was recorded.
    Unavailable,
}

impl Context {
    /// Downloads the artifact of a package into the download directory.
    ///
    /// A package without a download region is not an error: a warning is
    /// recorded and [`DownloadOutcome::Unavailable`] returned. The first
    /// favorite mirror listed on the page wins, falling back to the first
    /// mirror listed.
    ///
    /// # Errors
    ///
    /// - [`Extract`](ErrorKind::Extract) if the page has no file name.
    /// - [`NoMirrors`](ErrorKind::NoMirrors) if the page lists no mirror.
    /// - [`Download`](ErrorKind::Download) if the artifact cannot be fetched.
    /// - [`Io`](ErrorKind::Io) if the artifact cannot be written.
    #[instrument(skip(self))]
    pub async fn download(&mut self, name: &str) -> Result<DownloadOutcome> {
        let Some(document) = self.resolve_arch_page(name).await? else {
            self.warnings.push(format!("Package '{name}' cannot be downloaded"));
            return Ok(DownloadOutcome::Unavailable);
        };
        let (filename, mirrors) = {
            let page = ArchPage::parse(document.as_str());
            (page.filename(), page.mirrors())
        };
        let filename = filename.map_err(ErrorKind::extract)?;
        let path = Self::artifact_path(&self.settings.download_dir, &filename)?;
        if fs::try_exists(&path).await.or_raise(|| ErrorKind::Io(path.clone()))? {
            tracing::debug!(path = %path.display(), "Already downloaded");
            return Ok(DownloadOutcome::AlreadyPresent(path));
        }

        let (mirror, href) = mirrors
            .select(self.settings.favorite_mirrors.as_slice())
            .ok_or_raise(|| ErrorKind::NoMirrors(name.to_string()))?;
        let url = self.join(href)?;
        tracing::info!(%mirror, %url, "Downloading");
        let download_dir = &self.settings.download_dir;
        fs::create_dir_all(download_dir).await.or_raise(|| ErrorKind::Io(download_dir.clone()))?;
        let bytes = self.fetcher.fetch(url.as_str()).await.or_raise(|| ErrorKind::Download(name.to_string()))?;
        fs::write(&path, &bytes).await.or_raise(|| ErrorKind::Io(path.clone()))?;
        Ok(DownloadOutcome::Downloaded {
            path,
            bytes: bytes.len(),
            mirror: mirror.to_string(),
        })
    }

    /// Target path of an artifact. The file name must stay inside the
    /// download directory.
    fn artifact_path(download_dir: &Path, filename: &str) -> Result<PathBuf> {
        if filename == "." || filename == ".." || filename.contains(['/', '\\', '\0']) {
            exn::bail!(ErrorKind::InvalidFilename(filename.to_string()));
        }
        Ok(download_dir.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{BASE_URL, TestIndex, arch_page, metadata_page};
    use pkgdl_fetch::Response;
    use rstest::rstest;

    const ARCH: &str = "/noble/amd64/curl/download";
    const FILENAME: &str = "curl_8.5.0-2ubuntu10_amd64.deb";
    const DE: &str = "http://de.archive.ubuntu.com/ubuntu/pool/main/c/curl/curl_8.5.0-2ubuntu10_amd64.deb";
    const US: &str = "http://us.archive.ubuntu.com/ubuntu/pool/main/c/curl/curl_8.5.0-2ubuntu10_amd64.deb";

    fn curl(index: &TestIndex) {
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", ARCH)]));
        index.mirror(
            &format!("{BASE_URL}{ARCH}"),
            arch_page(FILENAME, &[("de.archive.ubuntu.com/ubuntu", DE), ("us.archive.ubuntu.com/ubuntu", US)]),
        );
        index.mirror(DE, "de-bytes");
        index.mirror(US, "us-bytes");
    }

    #[rstest]
    #[case(vec!["uk.archive.ubuntu.com/ubuntu", "us.archive.ubuntu.com/ubuntu"], "us.archive.ubuntu.com/ubuntu", "us-bytes")]
    #[case(vec!["uk.archive.ubuntu.com/ubuntu"], "de.archive.ubuntu.com/ubuntu", "de-bytes")]
    #[case(vec![], "de.archive.ubuntu.com/ubuntu", "de-bytes")]
    #[tokio::test]
    async fn test_mirror_selection(#[case] favorites: Vec<&str>, #[case] expected: &str, #[case] content: &str) {
        let index = TestIndex::new();
        curl(&index);
        let mut ctx = index
            .context_with(|settings| settings.favorite_mirrors = favorites.iter().map(|s| s.to_string()).collect())
            .await;

        let outcome = ctx.download("curl").await.unwrap();
        let path = ctx.settings().download_dir.join(FILENAME);
        assert_eq!(
            outcome,
            DownloadOutcome::Downloaded {
                path: path.clone(),
                bytes: content.len(),
                mirror: expected.to_string(),
            }
        );
        assert_eq!(std::fs::read_to_string(path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_download_is_idempotent() {
        let index = TestIndex::new();
        curl(&index);
        let mut ctx = index.context().await;
        let path = ctx.settings().download_dir.join(FILENAME);
        std::fs::create_dir_all(&ctx.settings().download_dir).unwrap();
        std::fs::write(&path, "already here").unwrap();

        let outcome = ctx.download("curl").await.unwrap();
        assert_eq!(outcome, DownloadOutcome::AlreadyPresent(path.clone()));
        assert_eq!(index.transport.request_count(DE), 0);
        assert_eq!(index.transport.request_count(US), 0);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "already here");
    }

    #[tokio::test]
    async fn test_second_download_fetches_nothing() {
        let index = TestIndex::new();
        curl(&index);
        let mut ctx = index.context().await;

        assert!(matches!(ctx.download("curl").await.unwrap(), DownloadOutcome::Downloaded { .. }));
        let requests = index.transport.requests().len();
        assert!(matches!(ctx.download("curl").await.unwrap(), DownloadOutcome::AlreadyPresent(_)));
        assert_eq!(index.transport.requests().len(), requests);
    }

    #[tokio::test]
    async fn test_unavailable_records_one_warning() {
        let index = TestIndex::new();
        index.page("virtual", &metadata_page(&[], &[], &[], &[]));
        let mut ctx = index.context().await;

        let outcome = ctx.download("virtual").await.unwrap();
        assert_eq!(outcome, DownloadOutcome::Unavailable);
        assert_eq!(ctx.warnings().iter().collect::<Vec<_>>(), vec!["Package 'virtual' cannot be downloaded"]);
        assert!(!ctx.settings().download_dir.exists());
    }

    #[tokio::test]
    async fn test_no_mirrors() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", ARCH)]));
        index.mirror(&format!("{BASE_URL}{ARCH}"), arch_page(FILENAME, &[]));
        let mut ctx = index.context().await;

        let err = ctx.download("curl").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NoMirrors(name) if name == "curl"));
    }

    #[tokio::test]
    async fn test_missing_filename() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", ARCH)]));
        index.mirror(&format!("{BASE_URL}{ARCH}"), "<html><body><div id=\"content\"></div></body></html>");
        let mut ctx = index.context().await;

        let err = ctx.download("curl").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Extract(_)));
    }

    #[tokio::test]
    async fn test_failed_download_is_fatal() {
        let index = TestIndex::new();
        index.page("curl", &metadata_page(&[], &[], &[], &[("amd64", ARCH)]));
        index.mirror(&format!("{BASE_URL}{ARCH}"), arch_page(FILENAME, &[("de.archive.ubuntu.com/ubuntu", DE)]));
        index.transport.push(DE, Response::new(403, "forbidden"));
        let mut ctx = index.context().await;

        let err = ctx.download("curl").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Download(name) if name == "curl"));
        assert!(!ctx.settings().download_dir.join(FILENAME).exists());
    }

    #[rstest]
    #[case("curl.deb", true)]
    #[case("..", false)]
    #[case("../curl.deb", false)]
    #[case("pool\\curl.deb", false)]
    fn test_artifact_path(#[case] filename: &str, #[case] valid: bool) {
        assert_eq!(Context::artifact_path(Path::new("download"), filename).is_ok(), valid);
    }
}
