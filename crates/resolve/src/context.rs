use exn::ResultExt;
use pkgdl_cache::{Namespace, PageCache};
use pkgdl_config::Settings;
use pkgdl_extract::RelationFilter;
use pkgdl_fetch::{Fetcher, RetryPolicy, TransportHandle};
use std::num::NonZeroU32;
use tracing::instrument;
use url::Url;

use crate::closure::ClosureState;
use crate::error::{ErrorKind, Result};
use crate::warnings::WarningLog;

/// State of one run: settings, the fetcher, both page caches, the closure
/// discovered so far, and the warnings collected along the way.
///
/// Nothing is shared between contexts, so two contexts over the same data
/// behave identically.
pub struct Context {
    pub(crate) settings: Settings,
    pub(crate) fetcher: Fetcher,
    pub(crate) cache: PageCache,
    pub(crate) closure: ClosureState,
    pub(crate) warnings: WarningLog,
    pub(crate) base_url: Url,
}

impl Context {
    /// Creates a context and loads both cache namespaces from disk.
    ///
    /// The cache lives under `{cache_dir}/{distribution}-{architecture}` and
    /// is skipped entirely when `use_local_cache` is off.
    #[instrument(skip_all, fields(distribution = %settings.distribution, architecture = %settings.architecture))]
    pub async fn new(settings: Settings, fetcher: Fetcher) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).or_raise(|| ErrorKind::InvalidUrl(settings.base_url.clone()))?;
        let mut cache = if settings.use_local_cache {
            PageCache::for_target(&settings.cache_dir, &settings.distribution, &settings.architecture)
        } else {
            tracing::info!("Local page cache disabled");
            PageCache::disabled()
        };
        for namespace in Namespace::ALL {
            cache.load(namespace).await.or_raise(|| ErrorKind::Cache)?;
        }
        Ok(Self {
            settings,
            fetcher,
            cache,
            closure: ClosureState::default(),
            warnings: WarningLog::default(),
            base_url,
        })
    }

    /// Convenience constructor wiring a [`Fetcher`] with the settings' pacing
    /// and retry behaviour.
    pub async fn with_transport(settings: Settings, transport: TransportHandle) -> Result<Self> {
        let fetcher = Fetcher::new(transport, retry_policy(&settings));
        Self::new(settings, fetcher).await
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn closure(&self) -> &ClosureState {
        &self.closure
    }

    pub fn warnings(&self) -> &WarningLog {
        &self.warnings
    }

    pub(crate) fn relation_filter(&self) -> RelationFilter {
        RelationFilter::new(self.settings.want_recommendations, self.settings.want_suggestions)
    }

    /// Resolves a link found on a page against the index base URL.
    pub(crate) fn join(&self, href: &str) -> Result<Url> {
        self.base_url.join(href).or_raise(|| ErrorKind::InvalidUrl(href.to_string()))
    }
}

/// Fetch pacing and retry behaviour described by the settings.
pub fn retry_policy(settings: &Settings) -> RetryPolicy {
    RetryPolicy::new(settings.request_delay_duration(), settings.retry_delay_duration())
        .with_max_attempts(settings.max_attempts.and_then(NonZeroU32::new))
}
