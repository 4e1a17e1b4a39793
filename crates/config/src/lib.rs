//! Settings for a pkgdl run.
//!
//! Settings are layered with [`figment`], lowest priority first:
//!
//! 1. built-in defaults,
//! 2. the settings file (JSON, or TOML when the path ends in `.toml`),
//! 3. `PKGDL_*` environment variables,
//! 4. command-line [`Overrides`].
//!
//! The merged result is validated before it is handed out, so every
//! [`Settings`] value in circulation is usable as-is.

pub mod error;
mod settings;

pub use crate::settings::{DEFAULT_BASE_URL, DEFAULT_SETTINGS_FILE, ENV_PREFIX, Overrides, Settings};
