use tessera_types::{Address, Amount, Event, Hash, Timepoint};

use crate::access::Role;

/// Events emitted by the timelock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelockEvent {
    /// One per call of a scheduled batch
    CallScheduled {
        id: Hash,
        index: usize,
        target: Address,
        value: Amount,
        payload: Vec<u8>,
        predecessor: Hash,
        delay: u64,
    },
    /// Emitted alongside `CallScheduled` when the salt is non-zero
    CallSalt { id: Hash, salt: Hash },
    CallExecuted {
        id: Hash,
        index: usize,
        target: Address,
        value: Amount,
        payload: Vec<u8>,
    },
    Cancelled { id: Hash },
    MinDelayChange { old_delay: u64, new_delay: u64 },
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
}

impl Event for TimelockEvent {
    fn name(&self) -> &'static str {
        match self {
            TimelockEvent::CallScheduled { .. } => "CallScheduled",
            TimelockEvent::CallSalt { .. } => "CallSalt",
            TimelockEvent::CallExecuted { .. } => "CallExecuted",
            TimelockEvent::Cancelled { .. } => "Cancelled",
            TimelockEvent::MinDelayChange { .. } => "MinDelayChange",
            TimelockEvent::RoleGranted { .. } => "RoleGranted",
            TimelockEvent::RoleRevoked { .. } => "RoleRevoked",
        }
    }
}

/// Events emitted by the governor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovernorEvent {
    ProposalCreated {
        id: Hash,
        proposer: Address,
        targets: Vec<Address>,
        values: Vec<Amount>,
        calldatas: Vec<Vec<u8>>,
        vote_start: Timepoint,
        vote_end: Timepoint,
        description: String,
    },
    VoteCast {
        voter: Address,
        id: Hash,
        support: u8,
        weight: Amount,
        reason: String,
    },
    ProposalQueued { id: Hash, eta: Timepoint },
    ProposalExecuted { id: Hash },
    ProposalCanceled { id: Hash },
}

impl Event for GovernorEvent {
    fn name(&self) -> &'static str {
        match self {
            GovernorEvent::ProposalCreated { .. } => "ProposalCreated",
            GovernorEvent::VoteCast { .. } => "VoteCast",
            GovernorEvent::ProposalQueued { .. } => "ProposalQueued",
            GovernorEvent::ProposalExecuted { .. } => "ProposalExecuted",
            GovernorEvent::ProposalCanceled { .. } => "ProposalCanceled",
        }
    }
}
