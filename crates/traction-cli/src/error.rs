//! Error types for the traction driver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or running a session.
#[derive(Error, Debug)]
pub enum CliError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadConfig {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// The engine rejected the physical parameters.
    #[error(transparent)]
    Engine(#[from] traction::Error),

    /// A run setting is out of range.
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting {
        /// Name of the offending setting, as spelled in the config file.
        name: &'static str,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// JSON encoding failed.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for driver operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_read_config_display_and_source() {
        let err = CliError::ReadConfig {
            path: PathBuf::from("/nope/traction.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/traction.toml"));
        assert!(msg.contains("missing"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let inner = traction::Parameters::new(0.0, 0.2, 1.0, 1.0).unwrap_err();
        let expected = inner.to_string();
        let err = CliError::from(inner);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_invalid_setting_display() {
        let err = CliError::InvalidSetting {
            name: "frame_rate",
            reason: "must be greater than zero",
        };
        assert_eq!(
            err.to_string(),
            "invalid setting frame_rate: must be greater than zero"
        );
    }
}
