use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Transport failure: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid transaction request field {field}: {reason}")]
    InvalidRequestError { field: String, reason: String },
}

impl LoadError {
    /// Transport failures end the run; everything else is a setup problem.
    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::TransportError(_))
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
