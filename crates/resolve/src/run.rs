use exn::ResultExt;
use pkgdl_cache::Namespace;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::{Context, DownloadOutcome, WarningLog};

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The dependency closure, in discovery order.
    pub packages: Vec<String>,
    /// One outcome per package, in the same order.
    pub outcomes: Vec<(String, DownloadOutcome)>,
    pub warnings: WarningLog,
}
impl Report {
    /// Number of artifacts fetched during the run.
    pub fn downloaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DownloadOutcome::Downloaded { .. }))
            .count()
    }
}

impl Context {
    /// Resolves the closure of the seeds, then downloads every package in it.
    ///
    /// Metadata pages are persisted before the first download starts;
    /// architecture pages once every download has finished.
    #[instrument(skip_all)]
    pub async fn run<I, S>(mut self, seeds: I) -> Result<Report>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let packages = self.build_closure(seeds).await?.packages().to_vec();
        self.cache.flush(Namespace::Page).await.or_raise(|| ErrorKind::Cache)?;

        let mut outcomes = Vec::with_capacity(packages.len());
        for name in &packages {
            let outcome = self.download(name).await?;
            outcomes.push((name.clone(), outcome));
        }
        self.cache.flush(Namespace::ArchPage).await.or_raise(|| ErrorKind::Cache)?;

        let report = Report {
            packages,
            outcomes,
            warnings: self.warnings,
        };
        tracing::info!(
            packages = report.packages.len(),
            downloaded = report.downloaded(),
            warnings = report.warnings.len(),
            "Run complete"
        );
        Ok(report)
    }
}
