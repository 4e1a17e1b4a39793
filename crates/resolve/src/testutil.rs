//! Fixtures shared by the unit tests: a scripted index and page builders.

use pkgdl_cache::{Namespace, PageCache};
use pkgdl_config::Settings;
use pkgdl_fetch::{MockTransport, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::Context;

pub(crate) const BASE_URL: &str = "https://index.example";

/// Settings pointing every directory into `root`, without pacing.
pub(crate) fn settings(root: &Path) -> Settings {
    Settings {
        distribution: "noble".to_string(),
        architecture: "amd64".to_string(),
        base_url: BASE_URL.to_string(),
        cache_dir: root.join("cache"),
        download_dir: root.join("download"),
        error_page: root.join("error.html"),
        request_delay: 0.0,
        retry_delay: 0.0,
        ..Settings::default()
    }
}

/// Writes a page straight into the on-disk cache layout.
pub(crate) async fn write_cached(settings: &Settings, namespace: Namespace, name: &str, html: &str) {
    let directory = PageCache::for_target(&settings.cache_dir, &settings.distribution, &settings.architecture)
        .directory(namespace)
        .unwrap();
    tokio::fs::create_dir_all(&directory).await.unwrap();
    tokio::fs::write(directory.join(format!("{name}.html")), html).await.unwrap();
}

/// A package index served by a [`MockTransport`], with its own scratch
/// directory.
pub(crate) struct TestIndex {
    pub transport: Arc<MockTransport>,
    dir: TempDir,
}
impl TestIndex {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(MockTransport::default()),
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Metadata page URL of a package.
    pub fn url(&self, name: &str) -> String {
        format!("{BASE_URL}/noble/{name}")
    }

    pub fn page(&self, name: &str, html: &str) {
        self.transport.push(self.url(name), Response::ok(html));
    }

    pub fn respond(&self, name: &str, status: u16, body: &str) {
        self.transport.push(self.url(name), Response::new(status, body));
    }

    /// Serves a body at an arbitrary URL.
    pub fn mirror(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.transport.push(url, Response::ok(body));
    }

    pub fn settings(&self) -> Settings {
        settings(self.dir.path())
    }

    pub fn cache_file(&self, namespace: Namespace, name: &str) -> PathBuf {
        let settings = self.settings();
        PageCache::for_target(&settings.cache_dir, &settings.distribution, &settings.architecture)
            .directory(namespace)
            .unwrap()
            .join(format!("{name}.html"))
    }

    pub async fn context(&self) -> Context {
        self.context_with(|_| ()).await
    }

    pub async fn context_with(&self, configure: impl FnOnce(&mut Settings)) -> Context {
        let mut settings = self.settings();
        configure(&mut settings);
        Context::with_transport(settings, self.transport.clone()).await.unwrap()
    }
}

/// A metadata page listing the given relations, plus a download region when
/// `downloads` is not empty.
pub(crate) fn metadata_page(
    depends: &[&str],
    recommends: &[&str],
    suggests: &[&str],
    downloads: &[(&str, &str)],
) -> String {
    let list = |class: &str, names: &[&str]| {
        let items: String = names
            .iter()
            .map(|name| format!(r#"<li><dl><dt><a href="/noble/{name}">{name}</a></dt><dd>{name}</dd></dl>"#))
            .collect();
        format!(r#"<ul class="{class}">{items}</ul>"#)
    };
    let mut html = String::from(r#"<html><body><div id="content"><div id="pdeps">"#);
    html.push_str(&list("uldep", depends));
    html.push_str(&list("ulrec", recommends));
    html.push_str(&list("ulsug", suggests));
    html.push_str("</div>");
    if !downloads.is_empty() {
        html.push_str(r#"<div id="pdownload"><table>"#);
        for (label, href) in downloads {
            html.push_str(&format!(r#"<tr><th><a href="{href}">{label}</a></th></tr>"#));
        }
        html.push_str("</table></div>");
    }
    html.push_str("</div></body></html>");
    html
}

/// An architecture page for `filename` served by the given mirrors.
pub(crate) fn arch_page(filename: &str, mirrors: &[(&str, &str)]) -> String {
    let items: String = mirrors.iter().map(|(label, href)| format!(r#"<li><a href="{href}">{label}</a>"#)).collect();
    format!(
        r#"<html><body><div id="content"><h2>Download Page for <kbd>{filename}</kbd></h2><div class="cardleft"><ul>{items}</ul></div></div></body></html>"#
    )
}
