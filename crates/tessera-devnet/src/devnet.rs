//! The local network.
//!
//! A `Devnet` owns one instance of every component and a block clock.
//! Transactions are admitted one at a time into the current block; the
//! chain only advances through `mine_blocks` and `increase_time`. A failed
//! transaction leaves every component unchanged and produces no receipt.

use tessera_airdrop::{AirdropTree, MerkleAirdrop};
use tessera_crypto::Keypair;
use tessera_governance::{
    description_hash, Governor, ProposalActions, ProposalState, ProposalVotes, Targets, Timelock,
};
use tessera_token::{Permit, SignedPermit, VotingPowerLedger};
use tessera_types::{Address, Amount, BlockContext, Hash, Timepoint};

use crate::deployments::DeploymentRegistry;
use crate::error::DevnetError;
use crate::events::{Log, Receipt};
use crate::value_box::{BoxCall, ValueBox};

#[derive(Debug)]
pub struct Devnet {
    pub(crate) network: String,
    pub(crate) ctx: BlockContext,
    pub(crate) block_time: u64,
    pub(crate) signers: Vec<Keypair>,
    pub(crate) token: VotingPowerLedger,
    pub(crate) timelock: Timelock,
    pub(crate) governor: Governor,
    pub(crate) targets: Targets,
    pub(crate) box_address: Address,
    pub(crate) airdrop: MerkleAirdrop,
    pub(crate) airdrop_tree: AirdropTree,
}

impl Devnet {
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Current block.
    pub fn block(&self) -> BlockContext {
        self.ctx
    }

    pub fn block_number(&self) -> Timepoint {
        self.ctx.number
    }

    pub fn timestamp(&self) -> Timepoint {
        self.ctx.timestamp
    }

    pub fn signer(&self, index: usize) -> Result<&Keypair, DevnetError> {
        self.signers.get(index).ok_or(DevnetError::UnknownAccount(index))
    }

    pub fn account(&self, index: usize) -> Result<Address, DevnetError> {
        self.signer(index).map(Keypair::address)
    }

    /// Signer 0, which deployed everything.
    pub fn deployer(&self) -> Result<Address, DevnetError> {
        self.account(0)
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.signers.iter().map(Keypair::address).collect()
    }

    pub fn token(&self) -> &VotingPowerLedger {
        &self.token
    }

    pub fn timelock(&self) -> &Timelock {
        &self.timelock
    }

    pub fn governor(&self) -> &Governor {
        &self.governor
    }

    pub fn airdrop(&self) -> &MerkleAirdrop {
        &self.airdrop
    }

    pub fn airdrop_tree(&self) -> &AirdropTree {
        &self.airdrop_tree
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn box_address(&self) -> Address {
        self.box_address
    }

    /// Value currently held by the box.
    pub fn box_value(&self) -> Result<u64, DevnetError> {
        self.targets
            .get::<ValueBox>(&self.box_address)
            .map(ValueBox::retrieve)
            .ok_or(DevnetError::MissingBox(self.box_address))
    }

    /// Mine `count` empty blocks.
    pub fn mine_blocks(&mut self, count: u64) {
        for _ in 0..count {
            self.ctx = self.ctx.next(self.block_time);
        }
        tracing::debug!("Mined {} blocks, now at {}", count, self.ctx.number);
    }

    /// Move the clock forward by `seconds` and mine one block.
    pub fn increase_time(&mut self, seconds: u64) {
        self.ctx = self.ctx.with_time_increased(seconds);
        self.mine_blocks(1);
    }

    // ---------------------------------------------------------------------
    // Token
    // ---------------------------------------------------------------------

    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<Receipt, DevnetError> {
        self.transact(|net| Ok(net.token.transfer(&net.ctx, from, to, amount)?))
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<Receipt, DevnetError> {
        self.transact(|net| {
            net.token.approve(owner, spender, amount);
            Ok(())
        })
    }

    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Receipt, DevnetError> {
        self.transact(|net| Ok(net.token.transfer_from(&net.ctx, spender, from, to, amount)?))
    }

    pub fn delegate(&mut self, account: Address, delegatee: Address) -> Result<Receipt, DevnetError> {
        self.transact(|net| Ok(net.token.delegate(&net.ctx, account, delegatee)?))
    }

    pub fn undelegate(&mut self, account: Address) -> Result<Receipt, DevnetError> {
        self.transact(|net| Ok(net.token.undelegate(&net.ctx, account)?))
    }

    /// Permit signed by signer `owner` for `spender`, using the owner's
    /// current nonce.
    pub fn sign_permit(
        &self,
        owner: usize,
        spender: Address,
        value: Amount,
        deadline: Timepoint,
    ) -> Result<SignedPermit, DevnetError> {
        let keypair = self.signer(owner)?;
        let owner = keypair.address();
        let permit = Permit {
            token: self.token.address(),
            owner,
            spender,
            value,
            nonce: self.token.nonces(&owner),
            deadline,
        };
        Ok(permit.sign(keypair))
    }

    pub fn permit(&mut self, signed: &SignedPermit) -> Result<Receipt, DevnetError> {
        self.transact(|net| Ok(net.token.permit(&net.ctx, signed)?))
    }

    // ---------------------------------------------------------------------
    // Governance
    // ---------------------------------------------------------------------

    /// Single-call proposal storing `value` in the box.
    pub fn store_actions(&self, value: u64) -> Result<ProposalActions, DevnetError> {
        let payload = BoxCall::Store { value }.encode()?;
        Ok(ProposalActions::single(self.box_address, 0, payload))
    }

    /// Create a proposal. The id is in the receipt's `ProposalCreated` event.
    pub fn propose(
        &mut self,
        proposer: Address,
        actions: &ProposalActions,
        description: &str,
    ) -> Result<Receipt, DevnetError> {
        self.transact(|net| {
            net.governor
                .propose(&net.ctx, &net.token, proposer, actions, description)?;
            Ok(())
        })
    }

    pub fn cast_vote(&mut self, voter: Address, id: &Hash, support: u8) -> Result<Receipt, DevnetError> {
        self.cast_vote_with_reason(voter, id, support, "")
    }

    pub fn cast_vote_with_reason(
        &mut self,
        voter: Address,
        id: &Hash,
        support: u8,
        reason: &str,
    ) -> Result<Receipt, DevnetError> {
        self.transact(|net| {
            net.governor.cast_vote_with_reason(
                &net.ctx,
                &net.token,
                &net.timelock,
                voter,
                id,
                support,
                reason,
            )?;
            Ok(())
        })
    }

    pub fn queue(&mut self, actions: &ProposalActions, description: &str) -> Result<Receipt, DevnetError> {
        let hash = description_hash(description);
        self.transact(|net| {
            net.governor
                .queue(&net.ctx, &net.token, &mut net.timelock, actions, &hash)?;
            Ok(())
        })
    }

    pub fn execute(&mut self, actions: &ProposalActions, description: &str) -> Result<Receipt, DevnetError> {
        let hash = description_hash(description);
        self.transact(|net| {
            net.governor.execute(
                &net.ctx,
                &net.token,
                &mut net.timelock,
                &mut net.targets,
                actions,
                &hash,
            )?;
            Ok(())
        })
    }

    pub fn cancel(
        &mut self,
        caller: Address,
        actions: &ProposalActions,
        description: &str,
    ) -> Result<Receipt, DevnetError> {
        let hash = description_hash(description);
        self.transact(|net| {
            net.governor
                .cancel(&net.ctx, &net.token, &mut net.timelock, caller, actions, &hash)?;
            Ok(())
        })
    }

    pub fn state(&self, id: &Hash) -> Result<ProposalState, DevnetError> {
        Ok(self.governor.state(&self.ctx, &self.token, &self.timelock, id)?)
    }

    pub fn proposal_votes(&self, id: &Hash) -> Option<ProposalVotes> {
        self.governor.proposal_votes(id)
    }

    /// Quorum for a snapshot block.
    pub fn quorum(&self, timepoint: Timepoint) -> Result<Amount, DevnetError> {
        Ok(self.governor.quorum(&self.ctx, &self.token, timepoint)?)
    }

    /// Call the box directly, bypassing governance.
    pub fn store_in_box(&mut self, caller: Address, value: u64) -> Result<Receipt, DevnetError> {
        let box_address = self.box_address;
        self.transact(|net| {
            let value_box = net
                .targets
                .get_mut::<ValueBox>(&box_address)
                .ok_or(DevnetError::MissingBox(box_address))?;
            value_box.store(caller, value)?;
            Ok(())
        })
    }

    // ---------------------------------------------------------------------
    // Airdrop
    // ---------------------------------------------------------------------

    pub fn claim(&mut self, account: Address, amount: Amount, proof: &[Hash]) -> Result<Receipt, DevnetError> {
        self.transact(|net| {
            net.airdrop
                .claim(&net.ctx, &mut net.token, account, amount, proof)?;
            Ok(())
        })
    }

    /// Claim `account`'s allocation with the proof from the deployed tree.
    /// Accounts without an allocation submit an empty claim and are
    /// rejected by the airdrop.
    pub fn claim_allocation(&mut self, account: Address) -> Result<Receipt, DevnetError> {
        let (amount, proof) = self.airdrop_tree.claim_for(&account).unwrap_or_default();
        self.claim(account, amount, &proof)
    }

    /// Record every component address in `registry`.
    pub fn record_deployments(&self, registry: &DeploymentRegistry) -> anyhow::Result<()> {
        registry.save_deployment("GovernanceToken", &self.token.address().to_string())?;
        registry.save_deployment("TimeLock", &self.timelock.address().to_string())?;
        registry.save_deployment("GovernorContract", &self.governor.address().to_string())?;
        registry.save_deployment("Box", &self.box_address.to_string())?;
        registry.save_deployment("MerkleAirdrop", &self.airdrop.address().to_string())?;
        registry.save_deployment("MerkleRoot", &self.airdrop.merkle_root().to_hex())?;
        tracing::info!("Recorded deployments for {} in {}", self.network, registry.path().display());
        Ok(())
    }

    /// Run `op` as one transaction in the current block.
    fn transact<F>(&mut self, op: F) -> Result<Receipt, DevnetError>
    where
        F: FnOnce(&mut Self) -> Result<(), DevnetError>,
    {
        let result = op(self);
        let logs = self.drain_logs();
        match result {
            Ok(()) => Ok(Receipt {
                block: self.ctx,
                logs,
            }),
            Err(e) => {
                tracing::debug!("Transaction reverted at block {}: {}", self.ctx.number, e);
                Err(e)
            }
        }
    }

    pub(crate) fn drain_logs(&mut self) -> Vec<Log> {
        let mut logs: Vec<Log> = self.token.take_events().into_iter().map(Log::Token).collect();
        logs.extend(self.timelock.take_events().into_iter().map(Log::Timelock));
        logs.extend(self.governor.take_events().into_iter().map(Log::Governor));
        logs.extend(self.airdrop.take_events().into_iter().map(Log::Airdrop));
        if let Some(value_box) = self.targets.get_mut::<ValueBox>(&self.box_address) {
            logs.extend(value_box.take_events().into_iter().map(Log::Box));
        }
        logs
    }
}
