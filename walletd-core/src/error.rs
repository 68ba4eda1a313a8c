//! Error types for the walletd-core library

use thiserror::Error;

/// Custom error type for walletd-core operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    #[error("Provisioning error: {0}")]
    Provisioning(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Wallet not initialized: {0}")]
    NotInitialized(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for walletd-core operations
pub type Result<T> = std::result::Result<T, Error>;
