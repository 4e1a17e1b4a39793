use clap::{ArgAction, Parser};
use derive_more::{Display, Error};
use exn::ResultExt;
use pkgdl_config::{DEFAULT_SETTINGS_FILE, Overrides, Settings};
use pkgdl_fetch::ReqwestTransport;
use pkgdl_resolve::{Context, Report};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CRATES: [&str; 6] = ["pkgdl", "pkgdl_cache", "pkgdl_config", "pkgdl_extract", "pkgdl_fetch", "pkgdl_resolve"];

/// Resolve the dependency closure of packages and download their artifacts.
#[derive(Debug, Parser)]
#[command(name = "pkgdl", version, about)]
struct Cli {
    /// Settings file (JSON, or TOML with a `.toml` extension).
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    /// Distribution codename, overriding the settings file.
    #[arg(short, long)]
    distribution: Option<String>,
    /// Target architecture, overriding the settings file.
    #[arg(short, long)]
    architecture: Option<String>,
    /// Neither read nor write the local page cache.
    #[arg(long)]
    no_cache: bool,
    /// Increase log verbosity (repeatable). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Packages to resolve, replacing the ones from the settings file.
    packages: Vec<String>,
}
impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            distribution: self.distribution.clone(),
            architecture: self.architecture.clone(),
            packages: (!self.packages.is_empty()).then(|| self.packages.clone()),
            use_local_cache: self.no_cache.then_some(false),
        }
    }
}

#[derive(Debug, Display, Error)]
enum ErrorKind {
    #[display("invalid settings")]
    Settings,
    #[display("could not set up the HTTP client")]
    Client,
    #[display("run failed")]
    Run,
}

type Result<T> = std::result::Result<T, exn::Exn<ErrorKind>>;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES.iter().map(|name| format!("{name}={level}")).collect();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<Report> {
    let settings = Settings::load(&cli.config, cli.overrides()).or_raise(|| ErrorKind::Settings)?;
    if settings.packages.is_empty() {
        tracing::warn!("No packages requested");
    }
    let transport = ReqwestTransport::new(settings.timeout_duration()).or_raise(|| ErrorKind::Client)?;
    let seeds = settings.packages.clone();
    let ctx = Context::with_transport(settings, Arc::new(transport)).await.or_raise(|| ErrorKind::Run)?;
    ctx.run(seeds).await.or_raise(|| ErrorKind::Run)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli).await {
        Ok(report) => {
            println!("\n\n{}", report.warnings);
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["pkgdl", "--no-cache", "-a", "arm64", "-vv", "curl", "wget"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_SETTINGS_FILE));
        let overrides = cli.overrides();
        assert_eq!(overrides.architecture.as_deref(), Some("arm64"));
        assert_eq!(overrides.distribution, None);
        assert_eq!(overrides.use_local_cache, Some(false));
        assert_eq!(overrides.packages, Some(vec!["curl".to_string(), "wget".to_string()]));
    }

    #[test]
    fn test_cli_defaults_leave_settings_alone() {
        let overrides = Cli::parse_from(["pkgdl", "-c", "pkgdl.toml"]).overrides();
        assert!(overrides.packages.is_none());
        assert!(overrides.use_local_cache.is_none());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
