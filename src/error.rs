//! Error types for ai-cli.
//!
//! This module defines the error taxonomy shared by the configuration store,
//! the stream decoder and the chat client, along with the process exit code
//! each error maps to.

use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Exit status for usage errors and failures without a more specific code.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status after a fresh configuration template was written.
pub const EXIT_CONFIG_CREATED: i32 = 2;
/// Exit status when the credential is missing or still the placeholder.
pub const EXIT_MISSING_CREDENTIAL: i32 = 3;
/// Exit status when the request could not be completed.
pub const EXIT_REQUEST_FAILED: i32 = 4;
/// Exit status for a non-success HTTP status.
pub const EXIT_API_ERROR: i32 = 5;
/// Exit status when reading the response stream failed.
pub const EXIT_STREAM_ERROR: i32 = 6;
/// Exit status for rejected model-list edits.
pub const EXIT_INVALID_MODEL: i32 = 7;

/// The main error type for ai-cli.
#[derive(Clone, Debug)]
pub enum Error {
    /// The configuration file does not exist.
    ConfigNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The credential is absent or still the placeholder value.
    MissingCredential {
        /// Path of the configuration file to edit.
        path: PathBuf,
    },

    /// The named model is not in the configured list.
    UnknownModel {
        /// The requested model.
        name: String,
        /// The models that are configured.
        available: Vec<String>,
    },

    /// The named model is already in the configured list.
    DuplicateModel {
        /// The requested model.
        name: String,
    },

    /// A model index fell outside the configured list.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the model list.
        len: usize,
    },

    /// Invalid user input.
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// The API answered with a non-success status.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Raw response body.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<u64>,
    },

    /// Connection error.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The transport failed while the response body was being read.
    StreamRead {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A single stream line exceeded the decoder's ceiling.
    LineTooLong {
        /// The ceiling in bytes.
        limit: usize,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// A URL parsing error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },
}

impl Error {
    /// Creates a new configuration-not-found error.
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Creates a new missing-credential error.
    pub fn missing_credential(path: impl Into<PathBuf>) -> Self {
        Error::MissingCredential { path: path.into() }
    }

    /// Creates a new unknown-model error.
    pub fn unknown_model(name: impl Into<String>, available: &[String]) -> Self {
        Error::UnknownModel {
            name: name.into(),
            available: available.to_vec(),
        }
    }

    /// Creates a new duplicate-model error.
    pub fn duplicate_model(name: impl Into<String>) -> Self {
        Error::DuplicateModel { name: name.into() }
    }

    /// Creates a new index-out-of-range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Creates a new API error.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<u64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new stream read error.
    pub fn stream_read(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::StreamRead {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new line-too-long error.
    pub fn line_too_long(limit: usize) -> Self {
        Error::LineTooLong { limit }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Returns true if the configuration file was not found.
    pub fn is_config_not_found(&self) -> bool {
        matches!(self, Error::ConfigNotFound { .. })
    }

    /// Returns true if the credential is missing.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Error::MissingCredential { .. })
    }

    /// Returns true if this error rejected a model-list edit.
    pub fn is_model_selection(&self) -> bool {
        matches!(
            self,
            Error::UnknownModel { .. }
                | Error::DuplicateModel { .. }
                | Error::IndexOutOfRange { .. }
                | Error::Validation { .. }
        )
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if the response stream failed mid-read.
    pub fn is_stream(&self) -> bool {
        matches!(self, Error::StreamRead { .. } | Error::LineTooLong { .. })
    }

    /// The process exit status a binary should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingCredential { .. } => EXIT_MISSING_CREDENTIAL,
            Error::Api { .. } => EXIT_API_ERROR,
            Error::Timeout { .. } | Error::Connection { .. } | Error::HttpClient { .. } => {
                EXIT_REQUEST_FAILED
            }
            Error::StreamRead { .. } | Error::LineTooLong { .. } => EXIT_STREAM_ERROR,
            Error::UnknownModel { .. }
            | Error::DuplicateModel { .. }
            | Error::IndexOutOfRange { .. }
            | Error::Validation { .. } => EXIT_INVALID_MODEL,
            Error::ConfigNotFound { .. }
            | Error::Io { .. }
            | Error::Url { .. } => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigNotFound { path } => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            Error::MissingCredential { path } => {
                write!(
                    f,
                    "API key is missing or not set in {}. Please edit the file and set your API key",
                    path.display()
                )
            }
            Error::UnknownModel { name, available } => {
                if available.is_empty() {
                    write!(f, "Model '{name}' not found in configuration")
                } else {
                    write!(
                        f,
                        "Model '{name}' not found in configuration. Available models: {}",
                        available.join(", ")
                    )
                }
            }
            Error::DuplicateModel { name } => {
                write!(f, "Model '{name}' already exists")
            }
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Invalid selection: index {index} is outside 0..{len}")
            }
            Error::Validation { message } => {
                write!(f, "Validation error: {message}")
            }
            Error::Api {
                status_code,
                message,
            } => {
                write!(f, "API request failed with status {status_code}: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::StreamRead { message, .. } => {
                write!(f, "Error reading stream: {message}")
            }
            Error::LineTooLong { limit } => {
                write!(f, "Error reading stream: line exceeds {limit} bytes")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. }
            | Error::HttpClient { source, .. }
            | Error::StreamRead { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source.as_ref()),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

/// A specialized Result type for ai-cli operations.
pub type Result<T> = std::result::Result<T, Error>;
