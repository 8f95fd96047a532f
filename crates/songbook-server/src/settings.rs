//! Runtime configuration, read from `config.toml` and `SONGBOOK_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub store:      StoreConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
  /// Per-operation deadline in milliseconds; unset means no deadline.
  pub op_timeout_ms: Option<u64>,
}

impl StoreConfig {
  pub fn op_timeout(&self) -> Option<Duration> {
    self.op_timeout_ms.map(Duration::from_millis)
  }
}

impl ServerConfig {
  /// Layer `path` (optional) under `SONGBOOK_*` environment variables.
  /// Nested keys use a double underscore, e.g. `SONGBOOK_STORE__OP_TIMEOUT_MS`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8080)?
      .set_default("store_path", "songbook.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("SONGBOOK")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
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
