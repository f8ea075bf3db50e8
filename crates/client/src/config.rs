//! Configuration loading and validation.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Client configuration, layered from defaults, an optional `mikra.toml`,
/// and `MIKRA_`-prefixed environment variables (highest precedence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the library API.
    pub base_url: String,
    /// Directory for persisted client state (preferences, history).
    /// Defaults to the platform data directory when unset.
    pub state_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: "https://www.sefaria.org".into(), state_dir: None }
    }
}

impl ClientConfig {
    /// Load the layered configuration.
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(ClientConfig::default()))
                .merge(Toml::file("mikra.toml"))
                .merge(Env::prefixed("MIKRA_")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: ClientConfig = figment.extract().or_raise(|| ErrorKind::Config)?;
        if config.base_url.trim_end_matches('/').is_empty() {
            exn::bail!(ErrorKind::Config);
        }
        Ok(config)
    }

    /// The directory persisted client state lives in.
    pub fn state_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.state_dir {
            return Ok(dir.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", "mikra").ok_or_raise(|| ErrorKind::Config)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Join an API path onto the base URL.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
