//! Error types for the fact checker.
//!
//! Every external call maps its failure into `TruthTraceError` with the
//! service name attached, so the presentation layer can render each stage's
//! failure without knowing which HTTP client produced it.

use thiserror::Error;

/// Main error type for the fact checker library.
#[derive(Debug, Error)]
pub enum TruthTraceError {
    /// The claim is empty or whitespace only.
    #[error("Please enter a claim to verify.")]
    EmptyClaim,

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client construction or an unattributed request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure while talking to an external service.
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// An external service answered with a non-success status.
    #[error("{service} returned status {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("{service} returned a malformed response: {message}")]
    MalformedResponse {
        service: &'static str,
        message: String,
    },

    /// The LLM answered without any content.
    #[error("LLM returned empty response")]
    LlmEmptyResponse,

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the report failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fact checker operations.
pub type Result<T> = std::result::Result<T, TruthTraceError>;
