use crate::access::Role;
use crate::proposal::ProposalState;
use crate::timelock::OperationState;
use tessera_token::TokenError;
use tessera_types::{Address, Amount, ErrorKind, Hash};
use thiserror::Error;

/// Errors that can occur in timelock operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelockError {
    #[error("Account {account} is missing role {role:?}")]
    MissingRole { role: Role, account: Address },

    #[error("Unauthorized caller: {0}")]
    UnauthorizedCaller(Address),

    #[error("Roles can only be renounced for self")]
    BadConfirmation,

    #[error("Invalid operation length: {targets} targets, {values} values, {payloads} payloads")]
    InvalidOperationLength {
        targets: usize,
        values: usize,
        payloads: usize,
    },

    #[error("Insufficient delay: {delay} < {min_delay}")]
    InsufficientDelay { delay: u64, min_delay: u64 },

    #[error("Operation {0} already scheduled")]
    OperationAlreadyScheduled(Hash),

    #[error("Operation {id} not ready: {state:?}")]
    OperationNotReady { id: Hash, state: OperationState },

    #[error("Operation {id} in unexpected state {state:?}")]
    UnexpectedOperationState { id: Hash, state: OperationState },

    #[error("Predecessor {0} not executed")]
    PredecessorNotExecuted(Hash),

    #[error("Call {index} reverted: {reason}")]
    UnderlyingCallReverted { index: usize, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

impl TimelockError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TimelockError::MissingRole { .. }
            | TimelockError::UnauthorizedCaller(_)
            | TimelockError::BadConfirmation => ErrorKind::Authorization,
            TimelockError::OperationAlreadyScheduled(_) => ErrorKind::Replay,
            TimelockError::OperationNotReady { .. }
            | TimelockError::UnexpectedOperationState { .. } => ErrorKind::State,
            TimelockError::PredecessorNotExecuted(_)
            | TimelockError::UnderlyingCallReverted { .. } => ErrorKind::Dependency,
            TimelockError::InvalidOperationLength { .. }
            | TimelockError::InsufficientDelay { .. }
            | TimelockError::Encoding(_)
            | TimelockError::Overflow => ErrorKind::Validation,
        }
    }
}

/// Errors that can occur in governor operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernorError {
    #[error("Proposer {proposer} has {votes} votes, threshold is {threshold}")]
    InsufficientProposerVotes {
        proposer: Address,
        votes: Amount,
        threshold: Amount,
    },

    #[error("Proposal {0} already exists")]
    DuplicateProposal(Hash),

    #[error("Nonexistent proposal {0}")]
    NonexistentProposal(Hash),

    #[error("Invalid proposal length: {targets} targets, {values} values, {calldatas} calldatas")]
    InvalidProposalLength {
        targets: usize,
        values: usize,
        calldatas: usize,
    },

    #[error("Proposal {id} in unexpected state {state:?}")]
    GovernorUnexpectedProposalState { id: Hash, state: ProposalState },

    #[error("Account {voter} already voted on {id}")]
    GovernorAlreadyCastVote { id: Hash, voter: Address },

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(u8),

    #[error("Only the proposer can cancel, not {0}")]
    GovernorOnlyProposer(Address),

    #[error("Proposer {proposer} cannot cancel queued proposal {id}")]
    GovernorUnableToCancel { id: Hash, proposer: Address },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Timelock error: {0}")]
    Timelock(#[from] TimelockError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl GovernorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GovernorError::Timelock(e) => e.kind(),
            GovernorError::Token(e) => e.kind(),
            GovernorError::GovernorOnlyProposer(_) | GovernorError::GovernorUnableToCancel { .. } => {
                ErrorKind::Authorization
            }
            GovernorError::DuplicateProposal(_) | GovernorError::GovernorAlreadyCastVote { .. } => {
                ErrorKind::Replay
            }
            GovernorError::GovernorUnexpectedProposalState { .. }
            | GovernorError::NonexistentProposal(_) => ErrorKind::State,
            GovernorError::InsufficientProposerVotes { .. }
            | GovernorError::InvalidProposalLength { .. }
            | GovernorError::InvalidVoteType(_)
            | GovernorError::InvalidSettings(_)
            | GovernorError::Encoding(_)
            | GovernorError::Overflow => ErrorKind::Validation,
        }
    }
}
