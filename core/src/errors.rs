use thiserror::Error;

#[derive(Error, Debug)]
pub enum GreeterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Failed to load configuration from {origin}: {error}")]
    LoadFailed {
        origin: String,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Problems with a single incoming event, before it reaches the greeter.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Event must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Event is not valid JSON: {reason}")]
    Malformed { reason: String },
}

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON serialization failed: {reason}")]
    Json { reason: String },
}

pub type Result<T> = std::result::Result<T, GreeterError>;

impl From<serde_json::Error> for GreeterError {
    fn from(err: serde_json::Error) -> Self {
        GreeterError::Serialization(SerializationError::Json {
            reason: err.to_string(),
        })
    }
}
