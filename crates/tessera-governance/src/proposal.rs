//! Proposal content, identity and lifecycle states.

use borsh::{BorshDeserialize, BorshSerialize};
use tessera_types::{Address, Amount, Hash};

use crate::error::GovernorError;
use crate::timelock::OperationBatch;

/// The calls a proposal executes, in order.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ProposalActions {
    pub targets: Vec<Address>,
    pub values: Vec<Amount>,
    pub calldatas: Vec<Vec<u8>>,
}

impl ProposalActions {
    pub fn new(targets: Vec<Address>, values: Vec<Amount>, calldatas: Vec<Vec<u8>>) -> Self {
        Self {
            targets,
            values,
            calldatas,
        }
    }

    /// A proposal making one call.
    pub fn single(target: Address, value: Amount, calldata: Vec<u8>) -> Self {
        Self::new(vec![target], vec![value], vec![calldata])
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// At least one call, and targets, values and calldatas line up.
    pub fn validate(&self) -> Result<(), GovernorError> {
        let n = self.targets.len();
        if n == 0 || self.values.len() != n || self.calldatas.len() != n {
            return Err(GovernorError::InvalidProposalLength {
                targets: n,
                values: self.values.len(),
                calldatas: self.calldatas.len(),
            });
        }
        Ok(())
    }

    /// The timelock batch carrying these calls.
    pub fn to_batch(&self, predecessor: Hash, salt: Hash) -> OperationBatch {
        OperationBatch {
            targets: self.targets.clone(),
            values: self.values.clone(),
            payloads: self.calldatas.clone(),
            predecessor,
            salt,
        }
    }
}

/// Hash of a proposal description.
pub fn description_hash(description: &str) -> Hash {
    Hash::compute(description.as_bytes())
}

/// Proposal id: hash of the borsh encoding of
/// `(targets, values, calldatas, description_hash)`.
pub fn hash_proposal(actions: &ProposalActions, description_hash: &Hash) -> Result<Hash, GovernorError> {
    let mut bytes = borsh::to_vec(actions).map_err(|e| GovernorError::Encoding(e.to_string()))?;
    bytes.extend_from_slice(description_hash.as_bytes());
    Ok(Hash::compute(&bytes))
}

/// Lifecycle state of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalState {
    /// Voting has not started
    Pending,
    /// Voting window open
    Active,
    Canceled,
    /// Quorum missed or not more for than against
    Defeated,
    Succeeded,
    /// Scheduled in the timelock
    Queued,
    Executed,
}

/// Ballot options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VoteType {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl TryFrom<u8> for VoteType {
    type Error = GovernorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VoteType::Against),
            1 => Ok(VoteType::For),
            2 => Ok(VoteType::Abstain),
            other => Err(GovernorError::InvalidVoteType(other)),
        }
    }
}

/// Tallies of a proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProposalVotes {
    pub against: Amount,
    pub for_votes: Amount,
    pub abstain: Amount,
}

impl ProposalVotes {
    /// Add `weight` to the tally for `support`.
    pub fn add(&mut self, support: VoteType, weight: Amount) -> Result<(), GovernorError> {
        let tally = match support {
            VoteType::Against => &mut self.against,
            VoteType::For => &mut self.for_votes,
            VoteType::Abstain => &mut self.abstain,
        };
        *tally = tally.checked_add(weight).ok_or(GovernorError::Overflow)?;
        Ok(())
    }

    /// Votes counting towards quorum.
    pub fn quorum_votes(&self) -> Amount {
        self.for_votes.saturating_add(self.abstain)
    }
}
