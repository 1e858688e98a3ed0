//! Store error types

use thiserror::Error;

/// Store-related errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Token endpoint returned non-2xx or the call failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Upload-url endpoint returned non-2xx or the call failed
    #[error("Failed to obtain upload target: {0}")]
    UploadTargetFailed(String),

    /// Upload transport failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Upload completed at the HTTP level but the vendor reported failure
    #[error("Upload rejected by vendor (ifSuccess={0})")]
    UploadRejected(i64),

    /// File-info endpoint returned non-2xx or the call failed
    #[error("File info registration failed: {0}")]
    RegistrationFailed(String),

    /// File-info endpoint responded with a non-success status message
    #[error("File info registration rejected: {0}")]
    RegistrationRejected(String),

    /// Submission endpoint responded with a non-success, non-transient message
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// Response body was missing an expected field or did not match the schema
    #[error("Malformed response from {endpoint}: {detail}")]
    MalformedResponse { endpoint: &'static str, detail: String },

    /// Invalid artifact
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
