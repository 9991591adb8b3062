use tessera_airdrop::AirdropError;
use tessera_governance::{GovernorError, TimelockError};
use tessera_token::TokenError;
use tessera_types::{Address, ErrorKind};
use thiserror::Error;

use crate::value_box::ValueBoxError;

/// Errors surfaced by devnet transactions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DevnetError {
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Timelock error: {0}")]
    Timelock(#[from] TimelockError),

    #[error("Governor error: {0}")]
    Governor(#[from] GovernorError),

    #[error("Airdrop error: {0}")]
    Airdrop(#[from] AirdropError),

    #[error("Box error: {0}")]
    ValueBox(#[from] ValueBoxError),

    #[error("Event {0} not found in transaction logs")]
    EventNotFound(String),

    #[error("No account at index {0}")]
    UnknownAccount(usize),

    #[error("No value box deployed at {0}")]
    MissingBox(Address),
}

impl DevnetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DevnetError::Token(e) => e.kind(),
            DevnetError::Timelock(e) => e.kind(),
            DevnetError::Governor(e) => e.kind(),
            DevnetError::Airdrop(e) => e.kind(),
            DevnetError::ValueBox(e) => e.kind(),
            DevnetError::EventNotFound(_) | DevnetError::UnknownAccount(_) => ErrorKind::Validation,
            DevnetError::MissingBox(_) => ErrorKind::State,
        }
    }
}
