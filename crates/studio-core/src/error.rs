//! Error types for the studio admin toolkit.
//!
//! A single [`Error`] with explicit variants for transport, authentication,
//! remote (server-reported), storage and input validation failures, so that
//! callers pattern-match instead of inspecting status codes.

use std::fmt;
use thiserror::Error;

use crate::types::ResourceFamily;

/// The unified error type for studio admin operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, unexpected status).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected login, missing or revoked session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The server answered with a structured error message.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// A resource client was requested before any token was available.
    ///
    /// This is a contract violation in the calling code, not a user-facing
    /// condition. It is never worth retrying.
    #[error("{family} client used before initialization")]
    NotInitialized { family: ResourceFamily },

    /// Session storage could not be written or removed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (bad API root, unusable token).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// True when the server rejected the bearer token (HTTP 401).
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Error::Auth(AuthError::Unauthenticated))
    }

    /// True when a login attempt was rejected.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Error::Auth(AuthError::InvalidCredentials))
    }

    /// True for [`Error::NotInitialized`].
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Error::NotInitialized { .. })
    }

    /// The server-provided message, if this error carries one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Error::Remote(remote) => Some(&remote.message),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Non-success status without a usable error body.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    /// A success response whose body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login rejected by the server.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token was rejected on an authenticated call.
    #[error("not authenticated")]
    Unauthenticated,

    /// The stored session is past its expiry.
    #[error("session expired")]
    SessionExpired,

    /// No session is stored.
    #[error("no active session")]
    NoSession,
}

/// A structured error reported by the admin API.
#[derive(Debug)]
pub struct RemoteError {
    /// HTTP status code.
    pub status: u16,
    /// Envelope `code` field, if present.
    pub code: Option<i64>,
    /// Error message from the server, surfaced verbatim.
    pub message: String,
}

impl RemoteError {
    /// Create a new remote error.
    pub fn new(status: u16, code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(code) = self.code {
            write!(f, " [{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for RemoteError {}

/// Session storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The session record could not be serialized.
    #[error("failed to encode session: {message}")]
    Encode { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API root URL.
    #[error("invalid API root '{value}': {reason}")]
    ApiRoot { value: String, reason: String },

    /// The token cannot be carried in an HTTP header.
    #[error("token is not a valid header value")]
    Token,

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
