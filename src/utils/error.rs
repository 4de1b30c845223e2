use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{method} {url} returned status {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Place not found: {id}")]
    NotFound { id: String },

    #[error("No authenticated user")]
    Unauthenticated,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {field}: {value} ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    NotFound,
    Auth,
    Configuration,
    Data,
}

impl PlacesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlacesError::ApiError(_) | PlacesError::Status { .. } => ErrorCategory::Network,
            PlacesError::NotFound { .. } => ErrorCategory::NotFound,
            PlacesError::Unauthenticated => ErrorCategory::Auth,
            PlacesError::ConfigError { .. }
            | PlacesError::InvalidConfigValueError { .. }
            | PlacesError::UrlError(_) => ErrorCategory::Configuration,
            PlacesError::SerializationError(_)
            | PlacesError::IoError(_)
            | PlacesError::InvalidInput { .. } => ErrorCategory::Data,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PlacesError::NotFound { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlacesError::ApiError(e) if e.is_timeout() => {
                "The listing store did not answer in time".to_string()
            }
            PlacesError::ApiError(_) => "Could not reach the listing store".to_string(),
            PlacesError::Status { status, .. } => {
                format!("The listing store rejected the request (HTTP {})", status)
            }
            PlacesError::NotFound { id } => format!("No place with id '{}'", id),
            PlacesError::Unauthenticated => {
                "You need to be signed in to create a place".to_string()
            }
            PlacesError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlacesError>;
