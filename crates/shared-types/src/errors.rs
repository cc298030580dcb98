//! # Error Types
//!
//! Errors raised while handling shared primitives.

use thiserror::Error;

/// Failure to parse an identifier from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    /// The text is not an unsigned 64-bit decimal.
    #[error("Invalid identifier '{0}': expected an unsigned 64-bit decimal")]
    NotUnsigned(String),

    /// The text is not a 32-byte hex public key.
    #[error("Invalid public key '{0}': expected 64 hex characters")]
    InvalidPublicKey(String),
}
