use tessera_token::TokenError;
use tessera_types::{Address, ErrorKind};
use thiserror::Error;

/// Errors that can occur in airdrop operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AirdropError {
    #[error("Account {0} already claimed")]
    AlreadyClaimed(Address),

    #[error("Invalid proof for {0}")]
    InvalidProof(Address),

    #[error("Ledger {got} is not the airdrop token {expected}")]
    WrongToken { expected: Address, got: Address },

    #[error("Duplicate allocation for {0}")]
    DuplicateAllocation(Address),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl AirdropError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AirdropError::AlreadyClaimed(_) => ErrorKind::Replay,
            AirdropError::Token(e) => e.kind(),
            AirdropError::InvalidProof(_)
            | AirdropError::WrongToken { .. }
            | AirdropError::DuplicateAllocation(_) => ErrorKind::Validation,
        }
    }
}
