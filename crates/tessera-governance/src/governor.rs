//! The governor: proposal lifecycle and vote counting.
//!
//! Proposals are identified by the hash of their actions and description
//! hash. Voting power is read from the token's history at the proposal's
//! snapshot block. Succeeded proposals are scheduled in the timelock under a
//! salt derived from the description hash, and executed through it; once
//! queued, the timelock operation is the source of truth for the state.

use std::collections::{HashMap, HashSet};

use tessera_types::{Address, Amount, BlockContext, Hash, Timepoint};

use crate::error::GovernorError;
use crate::events::GovernorEvent;
use crate::proposal::{
    description_hash, hash_proposal, ProposalActions, ProposalState, ProposalVotes, VoteType,
};
use crate::settings::{GovernorSettings, QUORUM_DENOMINATOR};
use crate::target::Targets;
use crate::timelock::{OperationBatch, OperationState, Timelock};
use crate::votes::Votes;

#[derive(Debug, Clone)]
struct ProposalCore {
    proposer: Address,
    /// Block whose voting power counts
    vote_start: Timepoint,
    vote_end: Timepoint,
    votes: ProposalVotes,
    has_voted: HashSet<Address>,
    /// Timelock operation once queued
    operation: Option<Hash>,
    eta: Option<Timepoint>,
    executed: bool,
    canceled: bool,
}

/// Timelock-controlled governor.
#[derive(Debug, Clone)]
pub struct Governor {
    address: Address,
    settings: GovernorSettings,
    token: Address,
    timelock: Address,
    /// May cancel any proposal that is not final
    guardian: Option<Address>,
    proposals: HashMap<Hash, ProposalCore>,
    events: Vec<GovernorEvent>,
}

impl Governor {
    pub fn new(
        address: Address,
        settings: GovernorSettings,
        token: Address,
        timelock: Address,
    ) -> Result<Self, GovernorError> {
        settings.validate()?;
        tracing::info!(
            "Governor '{}' deployed at {} (delay {}, period {}, quorum {}%)",
            settings.name,
            address,
            settings.voting_delay,
            settings.voting_period,
            settings.quorum_numerator
        );
        Ok(Self {
            address,
            settings,
            token,
            timelock,
            guardian: None,
            proposals: HashMap::new(),
            events: Vec::new(),
        })
    }

    /// Authorize `guardian` to cancel proposals, including queued ones.
    pub fn with_guardian(mut self, guardian: Address) -> Self {
        self.guardian = Some(guardian);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn settings(&self) -> &GovernorSettings {
        &self.settings
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn timelock(&self) -> Address {
        self.timelock
    }

    pub fn guardian(&self) -> Option<Address> {
        self.guardian
    }

    pub fn voting_delay(&self) -> u64 {
        self.settings.voting_delay
    }

    pub fn voting_period(&self) -> u64 {
        self.settings.voting_period
    }

    pub fn proposal_threshold(&self) -> Amount {
        self.settings.proposal_threshold
    }

    /// Votes needed for quorum at `timepoint`.
    pub fn quorum(
        &self,
        ctx: &BlockContext,
        votes: &impl Votes,
        timepoint: Timepoint,
    ) -> Result<Amount, GovernorError> {
        let supply = votes.past_total_supply(ctx, timepoint)?;
        let scaled = supply
            .checked_mul(Amount::from(self.settings.quorum_numerator))
            .ok_or(GovernorError::Overflow)?;
        Ok(scaled / Amount::from(QUORUM_DENOMINATOR))
    }

    pub fn hash_proposal(
        &self,
        actions: &ProposalActions,
        description_hash: &Hash,
    ) -> Result<Hash, GovernorError> {
        hash_proposal(actions, description_hash)
    }

    pub fn proposal_snapshot(&self, id: &Hash) -> Option<Timepoint> {
        self.proposals.get(id).map(|p| p.vote_start)
    }

    pub fn proposal_deadline(&self, id: &Hash) -> Option<Timepoint> {
        self.proposals.get(id).map(|p| p.vote_end)
    }

    pub fn proposal_proposer(&self, id: &Hash) -> Option<Address> {
        self.proposals.get(id).map(|p| p.proposer)
    }

    /// Timestamp at which a queued proposal becomes executable.
    pub fn proposal_eta(&self, id: &Hash) -> Option<Timepoint> {
        self.proposals.get(id).and_then(|p| p.eta)
    }

    pub fn proposal_votes(&self, id: &Hash) -> Option<ProposalVotes> {
        self.proposals.get(id).map(|p| p.votes)
    }

    pub fn has_voted(&self, id: &Hash, account: &Address) -> bool {
        self.proposals
            .get(id)
            .is_some_and(|p| p.has_voted.contains(account))
    }

    /// Every proposal goes through the timelock.
    pub fn proposal_needs_queuing(&self, _id: &Hash) -> bool {
        true
    }

    pub fn events(&self) -> &[GovernorEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GovernorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current state of proposal `id`.
    pub fn state(
        &self,
        ctx: &BlockContext,
        votes: &impl Votes,
        timelock: &Timelock,
        id: &Hash,
    ) -> Result<ProposalState, GovernorError> {
        let proposal = self
            .proposals
            .get(id)
            .ok_or(GovernorError::NonexistentProposal(*id))?;

        if proposal.executed {
            return Ok(ProposalState::Executed);
        }
        if proposal.canceled {
            return Ok(ProposalState::Canceled);
        }
        // Voting opens once the snapshot block is closed and runs through
        // the deadline block
        if ctx.number <= proposal.vote_start {
            return Ok(ProposalState::Pending);
        }
        if ctx.number <= proposal.vote_end {
            return Ok(ProposalState::Active);
        }

        let quorum = self.quorum(ctx, votes, proposal.vote_start)?;
        let tally = &proposal.votes;
        if tally.quorum_votes() < quorum || tally.for_votes <= tally.against {
            return Ok(ProposalState::Defeated);
        }

        let Some(operation) = proposal.operation else {
            return Ok(ProposalState::Succeeded);
        };
        Ok(match timelock.operation_state(ctx, &operation) {
            OperationState::Executed => ProposalState::Executed,
            OperationState::Scheduled | OperationState::Ready => ProposalState::Queued,
            // Cancelled directly in the timelock
            OperationState::Unset | OperationState::Cancelled => ProposalState::Canceled,
        })
    }

    /// Create a proposal.
    ///
    /// # Errors
    /// - `InvalidProposalLength` for empty or mismatched actions
    /// - `InsufficientProposerVotes` if the proposer is below the threshold
    /// - `DuplicateProposal` if the same content was proposed before
    pub fn propose(
        &mut self,
        ctx: &BlockContext,
        votes: &impl Votes,
        proposer: Address,
        actions: &ProposalActions,
        description: &str,
    ) -> Result<Hash, GovernorError> {
        actions.validate()?;

        let threshold = self.settings.proposal_threshold;
        let proposer_votes = settled_votes(ctx, votes, &proposer)?;
        if proposer_votes < threshold {
            return Err(GovernorError::InsufficientProposerVotes {
                proposer,
                votes: proposer_votes,
                threshold,
            });
        }

        let id = hash_proposal(actions, &description_hash(description))?;
        if self.proposals.contains_key(&id) {
            return Err(GovernorError::DuplicateProposal(id));
        }

        let vote_start = ctx
            .number
            .checked_add(self.settings.voting_delay)
            .ok_or(GovernorError::Overflow)?;
        let vote_end = vote_start
            .checked_add(self.settings.voting_period)
            .ok_or(GovernorError::Overflow)?;

        self.proposals.insert(
            id,
            ProposalCore {
                proposer,
                vote_start,
                vote_end,
                votes: ProposalVotes::default(),
                has_voted: HashSet::new(),
                operation: None,
                eta: None,
                executed: false,
                canceled: false,
            },
        );
        self.events.push(GovernorEvent::ProposalCreated {
            id,
            proposer,
            targets: actions.targets.clone(),
            values: actions.values.clone(),
            calldatas: actions.calldatas.clone(),
            vote_start,
            vote_end,
            description: description.to_string(),
        });

        tracing::info!(
            "Proposal {} created by {}, voting blocks {}..{}",
            id,
            proposer,
            vote_start,
            vote_end
        );
        Ok(id)
    }

    pub fn cast_vote(
        &mut self,
        ctx: &BlockContext,
        votes: &impl Votes,
        timelock: &Timelock,
        voter: Address,
        id: &Hash,
        support: u8,
    ) -> Result<Amount, GovernorError> {
        self.cast_vote_with_reason(ctx, votes, timelock, voter, id, support, "")
    }

    /// Vote on an active proposal with the voter's snapshot power.
    /// Returns the weight counted.
    #[allow(clippy::too_many_arguments)]
    pub fn cast_vote_with_reason(
        &mut self,
        ctx: &BlockContext,
        votes: &impl Votes,
        timelock: &Timelock,
        voter: Address,
        id: &Hash,
        support: u8,
        reason: &str,
    ) -> Result<Amount, GovernorError> {
        let state = self.state(ctx, votes, timelock, id)?;
        if state != ProposalState::Active {
            return Err(GovernorError::GovernorUnexpectedProposalState { id: *id, state });
        }
        let vote_type = VoteType::try_from(support)?;

        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(GovernorError::NonexistentProposal(*id))?;
        if proposal.has_voted.contains(&voter) {
            return Err(GovernorError::GovernorAlreadyCastVote { id: *id, voter });
        }

        let weight = votes.past_votes(ctx, &voter, proposal.vote_start)?;
        proposal.votes.add(vote_type, weight)?;
        proposal.has_voted.insert(voter);

        self.events.push(GovernorEvent::VoteCast {
            voter,
            id: *id,
            support,
            weight,
            reason: reason.to_string(),
        });
        tracing::debug!("{} voted {:?} on {} with weight {}", voter, vote_type, id, weight);
        Ok(weight)
    }

    /// Schedule a succeeded proposal in the timelock with its minimum delay.
    pub fn queue(
        &mut self,
        ctx: &BlockContext,
        votes: &impl Votes,
        timelock: &mut Timelock,
        actions: &ProposalActions,
        description_hash: &Hash,
    ) -> Result<Hash, GovernorError> {
        let id = hash_proposal(actions, description_hash)?;
        let state = self.state(ctx, votes, timelock, &id)?;
        if state != ProposalState::Succeeded {
            return Err(GovernorError::GovernorUnexpectedProposalState { id, state });
        }

        let batch = self.timelock_batch(actions, description_hash);
        let operation = timelock.schedule(ctx, self.address, &batch, timelock.min_delay())?;
        let eta = timelock.timestamp_of(&operation);

        if let Some(proposal) = self.proposals.get_mut(&id) {
            proposal.operation = Some(operation);
            proposal.eta = eta;
        }
        let eta = eta.unwrap_or_default();
        self.events.push(GovernorEvent::ProposalQueued { id, eta });

        tracing::info!("Proposal {} queued as operation {}, eta {}", id, operation, eta);
        Ok(id)
    }

    /// Execute a queued proposal through the timelock.
    ///
    /// A failing call leaves the proposal Queued.
    pub fn execute(
        &mut self,
        ctx: &BlockContext,
        votes: &impl Votes,
        timelock: &mut Timelock,
        targets: &mut Targets,
        actions: &ProposalActions,
        description_hash: &Hash,
    ) -> Result<Hash, GovernorError> {
        let id = hash_proposal(actions, description_hash)?;
        let state = self.state(ctx, votes, timelock, &id)?;
        if state != ProposalState::Queued {
            return Err(GovernorError::GovernorUnexpectedProposalState { id, state });
        }

        let batch = self.timelock_batch(actions, description_hash);
        timelock.execute(ctx, self.address, &batch, targets)?;

        if let Some(proposal) = self.proposals.get_mut(&id) {
            proposal.executed = true;
        }
        self.events.push(GovernorEvent::ProposalExecuted { id });

        tracing::info!("Proposal {} executed", id);
        Ok(id)
    }

    /// Cancel a proposal.
    ///
    /// Before queuing, the proposer or the guardian may cancel. Once queued,
    /// the guardian may cancel, and the proposer only after falling below
    /// the proposal threshold; the timelock operation is cancelled too.
    ///
    /// # Errors
    /// - `GovernorOnlyProposer` for any other caller
    /// - `GovernorUnableToCancel` for a queued proposal whose proposer still
    ///   meets the threshold
    /// - `GovernorUnexpectedProposalState` once the proposal is final
    pub fn cancel(
        &mut self,
        ctx: &BlockContext,
        votes: &impl Votes,
        timelock: &mut Timelock,
        caller: Address,
        actions: &ProposalActions,
        description_hash: &Hash,
    ) -> Result<Hash, GovernorError> {
        let id = hash_proposal(actions, description_hash)?;
        let state = self.state(ctx, votes, timelock, &id)?;
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(GovernorError::NonexistentProposal(id))?;
        let is_guardian = self.guardian == Some(caller);
        let is_proposer = caller == proposal.proposer;

        match state {
            ProposalState::Pending | ProposalState::Active | ProposalState::Succeeded => {
                if !is_proposer && !is_guardian {
                    return Err(GovernorError::GovernorOnlyProposer(caller));
                }
            }
            ProposalState::Queued => {
                if !is_guardian {
                    if !is_proposer {
                        return Err(GovernorError::GovernorOnlyProposer(caller));
                    }
                    let proposer_votes = settled_votes(ctx, votes, &proposal.proposer)?;
                    if proposer_votes >= self.settings.proposal_threshold {
                        return Err(GovernorError::GovernorUnableToCancel {
                            id,
                            proposer: proposal.proposer,
                        });
                    }
                }
                if let Some(operation) = proposal.operation {
                    timelock.cancel(ctx, self.address, &operation)?;
                }
            }
            ProposalState::Canceled | ProposalState::Defeated | ProposalState::Executed => {
                return Err(GovernorError::GovernorUnexpectedProposalState { id, state });
            }
        }

        if let Some(proposal) = self.proposals.get_mut(&id) {
            proposal.canceled = true;
        }
        self.events.push(GovernorEvent::ProposalCanceled { id });

        tracing::info!("Proposal {} canceled by {}", id, caller);
        Ok(id)
    }

    /// Salt binding the timelock operation to this governor and description.
    fn timelock_salt(&self, description_hash: &Hash) -> Hash {
        Hash::compute_multi(&[self.address.as_bytes(), description_hash.as_bytes()])
    }

    fn timelock_batch(&self, actions: &ProposalActions, description_hash: &Hash) -> OperationBatch {
        actions.to_batch(Hash::ZERO, self.timelock_salt(description_hash))
    }
}

/// Voting power of `account` at the last closed block, 0 at genesis.
fn settled_votes(
    ctx: &BlockContext,
    votes: &impl Votes,
    account: &Address,
) -> Result<Amount, GovernorError> {
    match ctx.number.checked_sub(1) {
        Some(timepoint) => Ok(votes.past_votes(ctx, account, timepoint)?),
        None => Ok(0),
    }
}
