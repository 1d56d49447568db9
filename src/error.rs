//! Error types for MudraIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// MudraIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload length violates the fixed wire contract.
    /// Non-fatal: callers log the condition and drop the frame.
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    /// Value or bit range outside the encodable domain
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Actuator coordinates with no physical module behind them
    #[error("Invalid actuator: {0}")]
    InvalidActuator(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
