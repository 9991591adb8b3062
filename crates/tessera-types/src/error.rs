use std::fmt;
use thiserror::Error;

/// Error taxonomy shared by every Tessera component.
///
/// Each domain error maps onto exactly one kind, so callers can decide on
/// retry policy without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing capability or non-owner mutation attempt
    Authorization,
    /// Operation invalid for the current lifecycle state
    State,
    /// Already voted, scheduled, claimed, or nonce consumed
    Replay,
    /// Malformed proof, mismatched hash, expired signature, insufficient funds
    Validation,
    /// Predecessor not executed or an underlying call reverted
    Dependency,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::State => "state",
            ErrorKind::Replay => "replay",
            ErrorKind::Validation => "validation",
            ErrorKind::Dependency => "dependency",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in type operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid address length: expected 20, got {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid hash length: expected 32, got {0}")]
    InvalidHashLength(usize),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Bech32 error: {0}")]
    Bech32Error(String),
}

impl TypesError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

impl From<hex::FromHexError> for TypesError {
    fn from(e: hex::FromHexError) -> Self {
        TypesError::InvalidHex(e.to_string())
    }
}
