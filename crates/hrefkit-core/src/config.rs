//! Linker configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use hrefkit_uri::{Charset, Uri};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Character set used to encode and decode components
    pub charset: Charset,
    /// Base URL that relative references resolve against
    pub base_url: Option<String>,
    /// Normalize every URL the linker hands out
    pub normalize: bool,
    /// Keep identical values of a repeated query parameter
    pub keep_duplicate_query_values: bool,
}

impl Config {
    pub fn with_base(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Read a JSON configuration file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// The base URL, when set, must be hierarchical and carry a hostname
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.base_url {
            check_base(base)?;
        }
        Ok(())
    }

    /// `$XDG_CONFIG_HOME/hrefkit/config.json`, falling back to `~/.config`
    pub fn default_path() -> PathBuf {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
            .map(|d| d.join("hrefkit").join("config.json"))
            .unwrap_or_else(|| PathBuf::from(".hrefkit.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            charset: Charset::Unicode,
            base_url: None,
            normalize: true,
            keep_duplicate_query_values: false,
        }
    }
}

pub(crate) fn check_base(base: &str) -> Result<()> {
    let uri = Uri::parse(base);
    if uri.is_urn() || uri.hostname().is_empty() {
        return Err(CoreError::Config(format!(
            "base URL '{}' must be absolute and name a host",
            base
        )));
    }
    Ok(())
}
