//! Error types for the SupportDesk system

use thiserror::Error;

/// A shape or semantic violation in a Configuration.
///
/// `field` is the dotted path of the offending field (for example
/// `theme.defaultTheme` or `contacts.regions[2].phone`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a required field that is absent.
    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("missing required field \"{}\"", field);
        Self { field, message }
    }
}

/// Core error type for SupportDesk operations
#[derive(Error, Debug)]
pub enum SupportDeskError {
    /// Transport failure or non-success HTTP status
    #[error("Failed to fetch {endpoint}: {reason}")]
    Fetch { endpoint: String, reason: String },

    /// Configuration shape or semantic violation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistent storage failure (never surfaced by the config cache)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A single document could not be loaded from its collection
    #[error("Failed to load document {id}: {reason}")]
    DocumentLoad { id: String, reason: String },

    /// Client settings problems
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SupportDeskError {
    pub fn fetch(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from the transport rather than the payload.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for SupportDesk operations
pub type Result<T> = std::result::Result<T, SupportDeskError>;

impl From<serde_json::Error> for SupportDeskError {
    fn from(err: serde_json::Error) -> Self {
        SupportDeskError::Serialization(err.to_string())
    }
}
