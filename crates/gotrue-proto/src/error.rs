//! Domain error taxonomy for auth operations
//!
//! Validation errors are produced before any network call; transport
//! errors pass through unchanged from the transport layer; the rest are
//! mappings of provider responses. Every public operation in this
//! workspace returns `Result<T>` — no panics cross the API boundary.

use thiserror::Error;

/// Errors from auth protocol operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input failed schema validation; the request was never sent.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Network/DNS/timeout failure from the transport, surfaced unchanged.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider rejected the grant (expired code, bad refresh token, ...).
    #[error("invalid grant")]
    InvalidGrant,

    /// The provider rejected the credentials themselves (wrong password).
    /// Distinguished from `InvalidGrant` so callers can branch on it.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// The response did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl Error {
    /// Shorthand for a validation failure naming the offending field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for auth protocol operations.
pub type Result<T> = std::result::Result<T, Error>;
