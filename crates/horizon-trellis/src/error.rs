//! Error types for configuration loading.
//!
//! Everything else in the toolkit reports invalid operations through
//! `bool`/`Option` returns; only file and text parsing can fail with an error.

use std::path::PathBuf;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while reading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML syntax or shape error.
    #[error("configuration parse error: {message}")]
    Parse { message: String },

    /// TOML generation error.
    #[error("configuration serialize error: {message}")]
    Serialize { message: String },

    /// A key combination named no key, only modifiers.
    #[error("key combination '{0}' has no key")]
    NoKey(String),

    /// Unknown key name in a key combination.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A non-modifier key appeared in modifier position, as `A` in `A+B`.
    #[error("'{0}' is not a modifier; a key combination names exactly one key")]
    UnknownModifier(String),

    /// File I/O error.
    #[error("failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        Self::parse(error.message())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialize {
            message: error.to_string(),
        }
    }
}
