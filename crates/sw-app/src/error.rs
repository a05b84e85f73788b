//! Error types for the sw-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for both CLI and GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Subscription to {collection} closed")]
    SubscriptionClosed { collection: String },

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sw-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<sw_store::StoreError> for AppError {
    fn from(err: sw_store::StoreError) -> Self {
        match err {
            sw_store::StoreError::SubscriptionClosed { collection } => {
                AppError::SubscriptionClosed { collection }
            }
            other => AppError::Store(other.to_string()),
        }
    }
}

impl From<sw_core::SwError> for AppError {
    fn from(err: sw_core::SwError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
