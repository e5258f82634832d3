// Error types shared across the SubHub crates

use thiserror::Error;

/// Result type alias for SubHub operations
pub type Result<T> = std::result::Result<T, SubHubError>;

/// Errors that can occur while processing subscriptions
#[derive(Debug, Error)]
pub enum SubHubError {
    /// Subscription table error
    #[error("store error: {0}")]
    Store(String),

    /// Contact lookup error
    #[error("contact lookup error: {0}")]
    ContactLookup(String),

    /// Notice publish error
    #[error("publish error: {0}")]
    Publish(String),

    /// Record decode error
    #[error("record decode error: {0}")]
    Decode(String),

    /// Requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SubHubError {
    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        SubHubError::Store(msg.into())
    }

    /// Create a contact lookup error
    pub fn contact(msg: impl Into<String>) -> Self {
        SubHubError::ContactLookup(msg.into())
    }

    /// Create a publish error
    pub fn publish(msg: impl Into<String>) -> Self {
        SubHubError::Publish(msg.into())
    }

    /// Create a record decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        SubHubError::Decode(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        SubHubError::NotFound(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        SubHubError::Configuration(msg.into())
    }
}
