use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::error::{ErrorKind, Result};

pub const DEFAULT_BASE_URL: &str = "https://packages.ubuntu.com";
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";
pub const ENV_PREFIX: &str = "PKGDL_";

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Distribution codename, e.g. `noble`.
    pub distribution: String,
    /// Target architecture, e.g. `amd64`.
    pub architecture: String,
    pub want_recommendations: bool,
    pub want_suggestions: bool,
    /// Mirror labels in priority order.
    pub favorite_mirrors: Vec<String>,
    pub use_local_cache: bool,
    /// Seed packages.
    pub packages: Vec<String>,
    /// Seconds to pause after every request.
    pub request_delay: f64,
    /// Seconds to pause before retrying a transient server error.
    pub retry_delay: f64,
    /// Attempts per request before giving up on transient errors; unbounded
    /// when absent.
    pub max_attempts: Option<u32>,
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub download_dir: PathBuf,
    /// Where the body of a failed metadata request is written.
    pub error_page: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout: f64,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            distribution: String::new(),
            architecture: String::new(),
            want_recommendations: false,
            want_suggestions: false,
            favorite_mirrors: Vec::new(),
            use_local_cache: true,
            packages: Vec::new(),
            request_delay: 0.5,
            retry_delay: 3.0,
            max_attempts: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from("cache"),
            download_dir: PathBuf::from("download"),
            error_page: PathBuf::from("error.html"),
            timeout: 60.0,
        }
    }
}

/// Command-line values that win over every other source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_local_cache: Option<bool>,
}

impl Settings {
    /// Layered sources for the settings file at `path`, without overrides.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            _ => figment.merge(Json::file(path)),
        };
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads, merges, and validates settings.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, overrides: Overrides) -> Result<Self> {
        let figment = Self::figment(path).merge(Serialized::defaults(overrides));
        Self::from_figment(&figment)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let settings: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        settings.validate()
    }

    /// Checks every field and normalizes the ones with a canonical form.
    pub fn validate(mut self) -> Result<Self> {
        self.distribution = Self::required("distribution", &self.distribution)?;
        self.architecture = Self::required("architecture", &self.architecture)?;
        Self::seconds("request_delay", self.request_delay)?;
        Self::seconds("retry_delay", self.retry_delay)?;
        if Self::seconds("timeout", self.timeout)?.is_zero() {
            exn::bail!(ErrorKind::invalid("timeout", "must be greater than zero"));
        }
        if self.max_attempts == Some(0) {
            exn::bail!(ErrorKind::invalid("max_attempts", "must be at least 1"));
        }
        let base_url = Url::parse(self.base_url.trim()).or_raise(|| ErrorKind::invalid("base_url", "not a URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            exn::bail!(ErrorKind::invalid("base_url", format!("unsupported scheme '{}'", base_url.scheme())));
        }
        self.base_url = base_url.as_str().trim_end_matches('/').to_string();
        self.packages = self
            .packages
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Ok(self)
    }

    pub fn request_delay_duration(&self) -> Duration {
        Self::saturating(self.request_delay)
    }

    pub fn retry_delay_duration(&self) -> Duration {
        Self::saturating(self.retry_delay)
    }

    pub fn timeout_duration(&self) -> Duration {
        Self::saturating(self.timeout)
    }

    /// Values [`validate`](Self::validate) would reject clamp to the nearest
    /// bound instead of collapsing to zero.
    fn saturating(secs: f64) -> Duration {
        if secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    fn required(field: &'static str, value: &str) -> Result<String> {
        let value = value.trim();
        if value.is_empty() {
            exn::bail!(ErrorKind::invalid(field, "is required"));
        }
        if value.contains(['/', '\\']) {
            exn::bail!(ErrorKind::invalid(field, "must not contain path separators"));
        }
        Ok(value.to_string())
    }

    fn seconds(field: &'static str, value: f64) -> Result<Duration> {
        if !value.is_finite() || value < 0.0 {
            exn::bail!(ErrorKind::invalid(field, format!("{value} is not a non-negative number of seconds")));
        }
        Duration::try_from_secs_f64(value)
            .or_raise(|| ErrorKind::invalid(field, format!("{value} seconds is out of range")))
    }
}
