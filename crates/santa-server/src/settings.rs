//! Runtime configuration, read from an optional TOML file and `SANTA_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use santa_core::{assignment::Year, generator::DEFAULT_MAX_ATTEMPTS};
use serde::Deserialize;

/// Everything the binary needs to open the store and serve the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  /// The exchange year. Unset means the current UTC year at startup.
  pub year:          Option<Year>,
  pub max_attempts:  u32,
  pub export_prefix: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          8000,
      store_path:    PathBuf::from("santa.sqlite"),
      year:          None,
      max_attempts:  DEFAULT_MAX_ATTEMPTS,
      export_prefix: santa_api::exchange::DEFAULT_EXPORT_PREFIX.to_string(),
    }
  }
}

impl ServerConfig {
  /// Load `path` (if it exists) layered under `SANTA_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SANTA"))
      .build()
      .with_context(|| format!("failed to read config file {path:?}"))?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  /// The year to operate on: the CLI override, then the config, then `today`.
  /// Must be positive.
  pub fn resolve_year(&self, cli: Option<Year>, today: Year) -> anyhow::Result<Year> {
    let year = cli.or(self.year).unwrap_or(today);
    anyhow::ensure!(year > 0, "year must be a positive integer, got {year}");
    Ok(year)
  }

  /// `store_path` with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
