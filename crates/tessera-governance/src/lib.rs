//! Tessera Governance - token-weighted proposals executed through a timelock.
//!
//! This crate provides:
//! - Capability roles (Admin, Proposer, Executor, Canceller)
//! - Call targets and an all-or-nothing call dispatcher
//! - The timelock queue with minimum delay and predecessors
//! - The governor: proposals, snapshot voting, quorum, queue/execute/cancel

pub mod access;
pub mod target;
pub mod timelock;
pub mod proposal;
pub mod votes;
pub mod settings;
pub mod governor;
pub mod events;
pub mod error;

pub use access::{AccessControl, Role};
pub use target::{CallFrame, Revert, Target, Targets};
pub use timelock::{OperationBatch, OperationState, Timelock, TimelockCall};
pub use proposal::{description_hash, hash_proposal, ProposalActions, ProposalState, ProposalVotes, VoteType};
pub use votes::Votes;
pub use settings::{GovernorSettings, TimelockSettings};
pub use governor::Governor;
pub use events::{GovernorEvent, TimelockEvent};
pub use error::{GovernorError, TimelockError};
