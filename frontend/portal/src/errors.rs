//! Application-wide error types.

use thiserror::Error;

use crate::models::Currency;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate for {target} missing from {base} response")]
    MissingRate { base: Currency, target: Currency },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PortalError>;
