use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GeseError {
    #[error("invalid species argument: {0:?}")]
    InvalidSpecies(String),

    #[error("invalid species name: '{input}'. Available options are: {}", .available.join(", "))]
    UnknownSpecies {
        input: String,
        available: Vec<String>,
    },

    #[error("trait '{name}' not found. Available traits: {}", .available.join(", "))]
    UnknownTrait {
        name: String,
        available: Vec<String>,
    },

    #[error("malformed index file: {0}")]
    MalformedIndex(String),

    #[error("malformed {file}: {message}")]
    MalformedPayload { file: String, message: String },

    #[error(
        "data unavailable for {filename}: not found in {directory} and fetch from {url} failed: {message}"
    )]
    DataUnavailable {
        filename: String,
        directory: String,
        url: String,
        message: String,
    },

    #[error("registry request failed: {0}")]
    RegistryHttp(String),

    #[error("registry returned status {status}: {message}")]
    RegistryStatus { status: u16, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
