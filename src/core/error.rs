//! Error types for the client core.
//!
//! One enum per domain:
//!
//! - [`FetchError`] - transport failures below HTTP semantics
//! - [`ApiError`] - HTTP-level outcomes of an API call
//! - [`SessionError`] - missing or malformed local session
//! - [`StorageError`] - localStorage writes
//! - [`BlobError`] - object URL creation
//! - [`ValidationError`] - form input rejected before any request is sent
//! - [`PreviewError`], [`FormError`] - composites surfaced by dialogs and forms

use thiserror::Error;

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// Failed to build the HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, connection refused, ...)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

/// Outcome of an API call that did not produce the expected payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401/403: the stored token is no longer accepted.
    #[error("Session expired, please log in again")]
    SessionExpired,
    /// 404 for the requested resource.
    #[error("Not found")]
    NotFound,
    /// Any other non-2xx status, with the server's message when it sent one.
    #[error("Server error ({status}): {message}")]
    Http { status: u16, message: String },
    /// The request never produced a response.
    #[error(transparent)]
    Network(#[from] FetchError),
    /// 2xx response whose body does not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error must invalidate the local session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Whether this is a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Message suitable for an inline banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } if !message.is_empty() => message.clone(),
            Self::Network(FetchError::Timeout) => "The server took too long to respond".into(),
            Self::Network(_) => "Could not reach the server".into(),
            other => other.to_string(),
        }
    }
}

/// Local session could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No session stored")]
    Missing,
    #[error("Stored session is malformed: {0}")]
    Malformed(String),
}

/// localStorage write errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("localStorage not available")]
    Unavailable,
    #[error("failed to serialize value")]
    SerializationFailed,
    #[error("failed to write to localStorage")]
    WriteFailed,
}

/// Object URL creation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
    #[error("Failed to create blob")]
    BlobCreationFailed,
    #[error("Failed to create object URL")]
    UrlCreationFailed,
}

/// Form input rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("Password must include both uppercase and lowercase letters")]
    PasswordMissingCase,
    #[error("Password must include at least one number")]
    PasswordMissingDigit,
    #[error("Password must include at least one special character")]
    PasswordMissingSpecial,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Current password is required to make any changes")]
    CurrentPasswordRequired,
    #[error("No file selected")]
    NoFileSelected,
}

/// Opening a document for preview or download failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Blob(#[from] BlobError),
    /// Content type that has no in-app renderer.
    #[error("Preview not available for this file type")]
    Unsupported,
}

impl PreviewError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_session_expired())
    }
}

/// Failure of a form submission (login, register, settings, upload, rename).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FormError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_session_expired())
    }

    /// Message for the inline form error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
