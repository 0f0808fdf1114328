//! Error types for `demodesk-core`.
//!
//! The backend can fail in two ways: the request never produced a usable
//! response (transport), or the backend answered with a non-2xx status
//! (application). Both surface as [`ApiError`]; callers that render messages
//! use [`ApiError::is_transport`] to pick the wording.

/// All errors that can occur when talking to the lead backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid client configuration (bad base URL, client construction).
    #[error("demodesk config error: {0}")]
    Config(String),

    /// The backend answered with a non-2xx status.
    #[error("demodesk API error {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the response body, when present.
        message: Option<String>,
    },

    /// Network or HTTP client error.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A success response carried a body that could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the request failed before the backend produced a usable answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }

    /// The backend-supplied error text, if this is an application failure
    /// that carried one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an application failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
