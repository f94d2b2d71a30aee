/*!
 * Error types for the plotlingo application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a reqwest transport error
    pub fn from_transport(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }

    /// Map a non-success HTTP status to an error
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors raised while extracting fragments from a source file
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// The grammar could not be loaded into the parser
    #[error("Failed to load the Python grammar: {0}")]
    Grammar(String),

    /// The source is not valid Python
    #[error("Syntax error at line {line}, column {column}")]
    Parse {
        /// 1-based line of the first error node
        line: usize,
        /// 1-based column of the first error node
        column: usize,
    },
}

/// Errors that can occur while talking to a text collaborator
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The collaborator answered, but not with a usable mapping or text
    #[error("Translation unavailable: {0}")]
    Unavailable(String),
}

/// Errors that end the processing of a single file
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading the input or writing the output failed
    #[error("I/O failure on {path}: {message}")]
    Io {
        /// File the operation was performed on
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The input holds nothing but whitespace
    #[error("Input file is empty: {0}")]
    EmptyInput(PathBuf),

    /// The input cannot be parsed as Python
    #[error("Cannot parse {path}: {source}")]
    Parse {
        /// Input file
        path: PathBuf,
        /// Parser diagnostic
        source: ExtractionError,
    },

    /// Fragments were found but no translation could be obtained
    #[error("Translation unavailable for {path}: {source}")]
    TranslationUnavailable {
        /// Input file
        path: PathBuf,
        /// Collaborator failure
        source: TranslationError,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from fragment extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the per-file pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
