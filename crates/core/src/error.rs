// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Only persistence failures escape a verification iteration; everything
/// else degrades into a status or sentinel on the record itself.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Store error: {0}")]
    Store(#[from] crate::port::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
