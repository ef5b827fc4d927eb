//! Error types for prosesim

use thiserror::Error;

/// Error types for the prosesim library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Protocol-related errors.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Message encoding/decoding errors.
    #[error("Codec error: {0}")]
    Codec(String),

    /// State machine errors.
    #[error("State machine error: {0}")]
    StateMachine(String),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}
