//! Error types for backend calls.
//!
//! The `Display` text of every variant is what ends up in the inline error
//! banners, so it is written for the user rather than for logs.

use thiserror::Error;

/// Result type for API client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the API client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A session-scoped call was attempted without a session id.
    #[error("No active session. Please upload a document first.")]
    MissingSession,

    /// An explanation was requested without a clause id.
    #[error("No clause selected.")]
    MissingClause,

    /// The picked file is neither a PDF nor a DOCX document.
    #[error("Only PDF and DOCX files are supported (got {0}).")]
    UnsupportedFile(String),

    /// The chat endpoint answered 404.
    #[error("Chat session not found. Please reload the page.")]
    SessionNotFound,

    /// Any other non-success status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message taken from the response body when available.
        message: String,
    },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a body we cannot use.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True for errors raised before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ApiError::MissingSession | ApiError::MissingClause | ApiError::UnsupportedFile(_)
        )
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::SessionNotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
