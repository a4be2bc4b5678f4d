//! Token engine error types
//!
//! Every failure path threads a [`JoseError`]. Callers that only care about the
//! category match on [`JoseError::kind`]; the rendered message always contains
//! the canonical phrase of its [`ErrorKind`].

use std::fmt;
use thiserror::Error;

/// Result type for token operations
pub type JoseResult<T> = Result<T, JoseError>;

/// Discriminant of a [`JoseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad segment count, encoding or JSON structure
    MalformedToken,
    /// Header has no usable `alg` member
    MissingAlgClaim,
    /// Algorithm name is not registered for this use
    UnrecognizedAlgorithm,
    /// Algorithm is registered but not allow-listed
    UnwantedAlgorithm,
    /// Keystore lookup failed
    KeyNotFound,
    /// Signature, MAC, key unwrap or decryption did not check out
    IntegrityCheckFailed,
    /// Key material unusable for the requested algorithm
    InvalidKey,
    /// Payload or header could not be serialized
    Serialization,
    /// A cryptographic primitive failed while producing a token
    Crypto,
}

impl ErrorKind {
    /// Canonical phrase contained in every message of this kind
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            ErrorKind::MalformedToken => "Malformed token",
            ErrorKind::MissingAlgClaim => "Missing or invalid alg claim in header",
            ErrorKind::UnrecognizedAlgorithm => "Unrecognized algorithm",
            ErrorKind::UnwantedAlgorithm => "Unwanted algorithm",
            ErrorKind::KeyNotFound => "Key not found",
            ErrorKind::IntegrityCheckFailed => "Integrity check failed",
            ErrorKind::InvalidKey => "Invalid key",
            ErrorKind::Serialization => "Serialization error",
            ErrorKind::Crypto => "Cryptographic operation failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Token engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoseError {
    /// Structural problem with the compact serialization
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Header lacks `alg` or carries a non-string value
    #[error("Missing or invalid alg claim in header")]
    MissingAlgClaim,

    /// Algorithm not present in the registry
    #[error("Unrecognized algorithm: {0}")]
    UnrecognizedAlgorithm(String),

    /// Algorithm rejected by the configured allow-list
    #[error("Unwanted algorithm: {0}")]
    UnwantedAlgorithm(String),

    /// No key for the requested identifier
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Tampering, wrong key, wrong key type or wrong key length
    #[error("Integrity check failed")]
    IntegrityCheckFailed,

    /// Key material rejected before any cryptographic operation ran
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Primitive failure while producing a token
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),
}

impl JoseError {
    /// Discriminant of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            JoseError::MalformedToken(_) => ErrorKind::MalformedToken,
            JoseError::MissingAlgClaim => ErrorKind::MissingAlgClaim,
            JoseError::UnrecognizedAlgorithm(_) => ErrorKind::UnrecognizedAlgorithm,
            JoseError::UnwantedAlgorithm(_) => ErrorKind::UnwantedAlgorithm,
            JoseError::KeyNotFound(_) => ErrorKind::KeyNotFound,
            JoseError::IntegrityCheckFailed => ErrorKind::IntegrityCheckFailed,
            JoseError::InvalidKey(_) => ErrorKind::InvalidKey,
            JoseError::Serialization(_) => ErrorKind::Serialization,
            JoseError::Crypto(_) => ErrorKind::Crypto,
        }
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        JoseError::MalformedToken(msg.into())
    }

    /// Create an unrecognized algorithm error
    #[inline]
    #[must_use]
    pub fn unrecognized_algorithm(alg: impl Into<String>) -> Self {
        JoseError::UnrecognizedAlgorithm(alg.into())
    }

    /// Create a key not found error
    #[inline]
    #[must_use]
    pub fn key_not_found(msg: impl Into<String>) -> Self {
        JoseError::KeyNotFound(msg.into())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        JoseError::InvalidKey(msg.into())
    }

    /// Create a cryptographic failure error
    #[inline]
    #[must_use]
    pub fn crypto(msg: impl Into<String>) -> Self {
        JoseError::Crypto(msg.into())
    }
}

impl From<base64::DecodeError> for JoseError {
    fn from(err: base64::DecodeError) -> Self {
        JoseError::MalformedToken(format!("base64url decode error: {err}"))
    }
}

impl From<serde_json::Error> for JoseError {
    fn from(err: serde_json::Error) -> Self {
        JoseError::Serialization(err.to_string())
    }
}
