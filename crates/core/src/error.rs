// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Timestamp error: {0}")]
    Timestamp(#[from] crate::domain::TimestampError),

    #[error("Device service error: {0}")]
    Service(#[from] crate::port::ServiceError),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Verification token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
