//! Scripted governance run: propose storing a value in the box, vote it
//! through with the deployer, queue, wait out the delay and execute.

use tessera_governance::{ProposalState, VoteType};
use tessera_types::Hash;

use crate::devnet::Devnet;
use crate::error::DevnetError;

pub const NEW_STORE_VALUE: u64 = 77;
pub const PROPOSAL_DESCRIPTION: &str = "Proposal #1: Store 77 in the Box!";
pub const VOTE_REASON: &str = "I support storing 77 in the Box!";

/// What a completed lifecycle run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    pub proposal_id: Hash,
    pub final_state: ProposalState,
    pub box_value: u64,
}

/// Drive one proposal from creation to execution.
pub fn run_lifecycle(devnet: &mut Devnet, value: u64, description: &str) -> Result<LifecycleReport, DevnetError> {
    let deployer = devnet.deployer()?;
    let voting_delay = devnet.governor().voting_delay();
    let voting_period = devnet.governor().voting_period();
    let min_delay = devnet.timelock().min_delay();

    let actions = devnet.store_actions(value)?;
    let proposal_id = devnet.propose(deployer, &actions, description)?.proposal_id()?;
    tracing::info!("Proposed {}: {}", proposal_id, description);

    devnet.mine_blocks(voting_delay + 1);
    devnet.cast_vote_with_reason(deployer, &proposal_id, VoteType::For as u8, VOTE_REASON)?;

    devnet.mine_blocks(voting_period + 1);
    devnet.queue(&actions, description)?;

    devnet.increase_time(min_delay + 1);
    devnet.execute(&actions, description)?;

    let report = LifecycleReport {
        proposal_id,
        final_state: devnet.state(&proposal_id)?,
        box_value: devnet.box_value()?,
    };
    tracing::info!("Lifecycle complete, box value {}", report.box_value);
    Ok(report)
}
