//! Error types for the coffee team builder.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can occur between logging in to the HR service and
//! handing the finished grouping to the spreadsheet emitter.

use thiserror::Error;

/// The main error type for the coffee team builder.
///
/// Every component returns this error type and lower-level errors are
/// propagated unchanged up to the caller of
/// [`GroupingPipeline::produce_grouping`](crate::pipeline::GroupingPipeline::produce_grouping).
///
/// # Example
///
/// ```
/// use coffee_teams::error::EngineError;
///
/// let error = EngineError::AuthenticationError {
///     message: "expected exactly one session cookie, got 2".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Authentication failed: expected exactly one session cookie, got 2"
/// );
/// ```
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value is missing or nonsensical.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfiguration {
        /// The offending configuration field.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// The login sequence did not yield a usable session credential.
    #[error("Authentication failed: {message}")]
    AuthenticationError {
        /// A description of the failed login step.
        message: String,
    },

    /// The HR service could not be reached at all.
    #[error("Request to {url} failed: {message}")]
    RequestFailed {
        /// The requested URL.
        url: String,
        /// The transport error.
        message: String,
    },

    /// A data endpoint answered with a non-success status.
    #[error("Upstream request to {url} returned status {status} with body {body:?}")]
    UpstreamError {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, kept for diagnostics.
        body: String,
    },

    /// A response body was not the expected JSON envelope.
    #[error("Failed to decode response from {url}: {message}")]
    DecodeError {
        /// The requested URL.
        url: String,
        /// The decoder error.
        message: String,
    },

    /// A delegated grouping computation failed.
    #[error("Grouping backend failed: {diagnostic}")]
    GroupingBackendError {
        /// The delegate's diagnostic output, verbatim.
        diagnostic: String,
    },

    /// The spreadsheet conversion failed.
    #[error("Spreadsheet conversion failed: {diagnostic}")]
    EmitterError {
        /// The emitter's diagnostic output, verbatim.
        diagnostic: String,
    },

    /// The tabular artifact could not be serialized.
    #[error("Failed to write artifact: {message}")]
    ArtifactError {
        /// A description of the serialization failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidConfiguration`].
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::AuthenticationError`].
    pub fn authentication(message: impl Into<String>) -> Self {
        EngineError::AuthenticationError {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
