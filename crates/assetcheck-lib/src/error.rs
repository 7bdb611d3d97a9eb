use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content verification error: {0}")]
    Verification(#[from] crate::verification::VerificationError),

    #[error("Digest error: {0}")]
    Digest(#[from] crate::verification::DigestError),

    #[error("Archive validation error: {0}")]
    Archive(#[from] crate::archive::ArchiveError),

    #[error("Failed to load manifest from {path}: {reason}")]
    ManifestLoad { path: PathBuf, reason: String },

    #[error("Manifest validation failed: {details}")]
    ManifestValidation { details: String },

    #[error("Invalid command-line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Response status {actual} does not match expected {expected}")]
    StatusMismatch { expected: String, actual: u16 },

    #[error("Response is missing required header {name}")]
    MissingHeader { name: String },

    #[error("No response has been recorded for the current scenario")]
    NoResponse,

    #[error("Asset lookup failed: {details}")]
    AssetLookup { details: String },

    #[error("File verification failed for {path}: {details}")]
    FileVerification { path: PathBuf, details: String },

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}
