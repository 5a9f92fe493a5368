//! Converter configuration.

use ans_parser::{ConverterOptions, DEFAULT_START_TAG};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// ANS schema version stamped on versioned elements.
pub const DEFAULT_ANS_VERSION: &str = "0.10.9";

fn default_ans_version() -> String {
    DEFAULT_ANS_VERSION.to_string()
}

fn default_start_tag() -> String {
    DEFAULT_START_TAG.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConverterConfig {
    /// Version stamped on image, figure and audio elements. Empty disables
    /// stamping.
    #[serde(default = "default_ans_version")]
    pub ans_version: String,

    /// Skip parsers that fail instead of aborting the conversion.
    #[serde(default)]
    pub suppress_exceptions: bool,

    /// Element whose children are converted.
    #[serde(default = "default_start_tag")]
    pub start_tag: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ans_version: default_ans_version(),
            suppress_exceptions: false,
            start_tag: default_start_tag(),
        }
    }
}

impl ConverterConfig {
    /// Reject values the converter cannot use.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidSetting`] for a blank `start_tag`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_tag.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                field: "converter.start_tag".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn options(&self) -> ConverterOptions {
        ConverterOptions {
            ans_version: Some(self.ans_version.clone()).filter(|v| !v.is_empty()),
            suppress_exceptions: self.suppress_exceptions,
        }
    }
}
