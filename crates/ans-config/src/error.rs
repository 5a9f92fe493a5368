//! Errors raised while loading html2ans settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings file or `HTML2ANS_*` variable could not be read or merged.
    #[error("could not read html2ans settings: {0}")]
    Source(#[from] figment::Error),

    /// A converter setting was read but cannot drive a conversion.
    #[error("html2ans setting `{field}` {reason}")]
    InvalidSetting { field: String, reason: String },
}
