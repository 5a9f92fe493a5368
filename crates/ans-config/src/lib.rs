//! # ans-config
//!
//! Layered configuration loading for html2ans using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HTML2ANS_*` prefix, `__` as separator)
//! 2. Project-level `.html2ans/config.toml`
//! 3. User-level `~/.config/html2ans/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `HTML2ANS_CONVERTER__ANS_VERSION` -> `converter.ans_version`.
//!
//! ```no_run
//! use ans_config::AnsConfig;
//!
//! let config = AnsConfig::load().expect("config");
//! let options = config.converter.options();
//! println!("converting from <{}>", config.converter.start_tag);
//! # let _ = options;
//! ```

mod converter;
mod error;

pub use converter::{ConverterConfig, DEFAULT_ANS_VERSION};
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HTML2ANS_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnsConfig {
    #[serde(default)]
    pub converter: ConverterConfig,
}

impl AnsConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a source fails to parse or a value is
    /// invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load from a TOML document layered over the defaults. Environment
    /// variables still take precedence.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the document fails to parse or a value is
    /// invalid.
    pub fn load_from_str(toml: &str) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".html2ans/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.converter.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("html2ans").join("config.toml"))
    }
}
