use tessera_types::{Address, Amount, ErrorKind, Timepoint};
use thiserror::Error;

/// Errors that can occur in token ledger operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },

    #[error("Invalid receiver: {0:?}")]
    InvalidReceiver(Address),

    #[error("Invalid delegatee: {0:?}")]
    InvalidDelegatee(Address),

    #[error("Future lookup: timepoint {timepoint} is after current {current}")]
    FutureLookup { timepoint: Timepoint, current: Timepoint },

    #[error("Stale timepoint {timepoint}: history already at {latest}")]
    StaleTimepoint { timepoint: Timepoint, latest: Timepoint },

    #[error("Invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("Expired signature: deadline {deadline}, now {now}")]
    ExpiredSignature { deadline: Timepoint, now: Timepoint },

    #[error("Invalid signer for {0:?}")]
    InvalidSigner(Address),

    #[error("Arithmetic overflow")]
    Overflow,
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::InvalidNonce { .. } => ErrorKind::Replay,
            TokenError::FutureLookup { .. } | TokenError::StaleTimepoint { .. } => ErrorKind::State,
            TokenError::InvalidSigner(_) => ErrorKind::Authorization,
            TokenError::InsufficientBalance { .. }
            | TokenError::InsufficientAllowance { .. }
            | TokenError::InvalidReceiver(_)
            | TokenError::InvalidDelegatee(_)
            | TokenError::ExpiredSignature { .. }
            | TokenError::Overflow => ErrorKind::Validation,
        }
    }
}
