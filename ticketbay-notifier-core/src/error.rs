//! Error types for ticketbay-notifier-core

use thiserror::Error;

/// Main error type for the ticketbay-notifier-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection failure, timeout or non-2xx status
    #[error("transport error: {0}")]
    Transport(String),

    /// Listing page did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// Identity store read/write failure
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for ticketbay-notifier-core
pub type Result<T> = std::result::Result<T, Error>;
