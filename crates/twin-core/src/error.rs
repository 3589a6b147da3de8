use thiserror::Error;

/// Top-level error type shared by the Twin Voice crates.
///
/// Subsystem crates keep their own error enums and convert into `TwinError`
/// where an error has to cross a crate boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TwinError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TwinError {
    fn from(err: toml::de::Error) -> Self {
        TwinError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TwinError {
    fn from(err: toml::ser::Error) -> Self {
        TwinError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TwinError {
    fn from(err: serde_json::Error) -> Self {
        TwinError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Twin Voice operations.
pub type Result<T> = std::result::Result<T, TwinError>;
