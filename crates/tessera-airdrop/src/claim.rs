//! The claim ledger.
//!
//! Holds the token allocation at its own address on the ledger and pays
//! each `(account, amount)` committed in the root at most once.

use std::collections::HashSet;

use tessera_crypto::verify_proof;
use tessera_token::VotingPowerLedger;
use tessera_types::{Address, Amount, BlockContext, Hash};

use crate::error::AirdropError;
use crate::events::AirdropEvent;
use crate::tree::leaf_hash;

/// Merkle airdrop over a fixed root.
#[derive(Debug, Clone)]
pub struct MerkleAirdrop {
    address: Address,
    token: Address,
    root: Hash,
    claimed: HashSet<Address>,
    events: Vec<AirdropEvent>,
}

impl MerkleAirdrop {
    pub fn new(address: Address, token: Address, root: Hash) -> Self {
        tracing::info!("Airdrop deployed at {} with root {}", address, root);
        Self {
            address,
            token,
            root,
            claimed: HashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn merkle_root(&self) -> Hash {
        self.root
    }

    pub fn has_claimed(&self, account: &Address) -> bool {
        self.claimed.contains(account)
    }

    /// Tokens still held for unclaimed allocations.
    pub fn remaining(&self, ledger: &VotingPowerLedger) -> Amount {
        ledger.balance_of(&self.address)
    }

    pub fn events(&self) -> &[AirdropEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<AirdropEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pay `amount` to `account` if `proof` places the pair under the root.
    ///
    /// Anyone may submit a claim; tokens always go to `account`.
    ///
    /// # Errors
    /// - `AlreadyClaimed` if `account` was paid before
    /// - `InvalidProof` if the proof does not verify
    /// - `Token` if the ledger transfer fails (e.g. the airdrop is underfunded)
    pub fn claim(
        &mut self,
        ctx: &BlockContext,
        ledger: &mut VotingPowerLedger,
        account: Address,
        amount: Amount,
        proof: &[Hash],
    ) -> Result<(), AirdropError> {
        if ledger.address() != self.token {
            return Err(AirdropError::WrongToken {
                expected: self.token,
                got: ledger.address(),
            });
        }
        if self.claimed.contains(&account) {
            return Err(AirdropError::AlreadyClaimed(account));
        }
        if !verify_proof(proof, &self.root, &leaf_hash(&account, amount)) {
            return Err(AirdropError::InvalidProof(account));
        }

        ledger.transfer(ctx, self.address, account, amount)?;
        self.claimed.insert(account);
        self.events.push(AirdropEvent::Claimed { account, amount });

        tracing::info!("Airdrop paid {} to {}", amount, account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::AirdropTree;
    use tessera_types::{tokens, ErrorKind};

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn setup(fund: Amount) -> (BlockContext, VotingPowerLedger, MerkleAirdrop, AirdropTree) {
        let ctx = BlockContext::new(1, 1_000);
        let deployer = addr(0xde);
        let mut ledger = VotingPowerLedger::with_initial_supply(
            &ctx,
            "GovernanceToken",
            "GT",
            addr(0xe0),
            deployer,
            tokens(1_000_000),
        )
        .unwrap();

        let tree = AirdropTree::from_allocations(&[
            (addr(1), tokens(1_000)),
            (addr(2), tokens(2_000)),
            (addr(3), tokens(500)),
        ])
        .unwrap();
        let airdrop = MerkleAirdrop::new(addr(0xa1), ledger.address(), tree.root());
        ledger.transfer(&ctx, deployer, airdrop.address(), fund).unwrap();

        (ctx, ledger, airdrop, tree)
    }

    #[test]
    fn test_valid_claim_pays_once() {
        let (ctx, mut ledger, mut airdrop, tree) = setup(tokens(3_500));
        let (amount, proof) = tree.claim_for(&addr(1)).unwrap();

        airdrop.claim(&ctx, &mut ledger, addr(1), amount, &proof).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), tokens(1_000));
        assert!(airdrop.has_claimed(&addr(1)));

        let err = airdrop
            .claim(&ctx, &mut ledger, addr(1), amount, &proof)
            .unwrap_err();
        assert_eq!(err, AirdropError::AlreadyClaimed(addr(1)));
        assert_eq!(err.kind(), ErrorKind::Replay);
        assert_eq!(ledger.balance_of(&addr(1)), tokens(1_000));
    }

    #[test]
    fn test_wrong_proof_rejected() {
        let (ctx, mut ledger, mut airdrop, tree) = setup(tokens(3_500));
        let (_, wrong_proof) = tree.claim_for(&addr(2)).unwrap();

        let err = airdrop
            .claim(&ctx, &mut ledger, addr(1), tokens(1_000), &wrong_proof)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!airdrop.has_claimed(&addr(1)));
    }

    #[test]
    fn test_inflated_amount_rejected() {
        let (ctx, mut ledger, mut airdrop, tree) = setup(tokens(3_500));
        let (_, proof) = tree.claim_for(&addr(3)).unwrap();

        assert_eq!(
            airdrop
                .claim(&ctx, &mut ledger, addr(3), tokens(501), &proof)
                .unwrap_err(),
            AirdropError::InvalidProof(addr(3))
        );
    }

    #[test]
    fn test_underfunded_claim_leaves_flag_unset() {
        let (ctx, mut ledger, mut airdrop, tree) = setup(tokens(100));
        let (amount, proof) = tree.claim_for(&addr(2)).unwrap();

        let err = airdrop
            .claim(&ctx, &mut ledger, addr(2), amount, &proof)
            .unwrap_err();
        assert!(matches!(err, AirdropError::Token(_)));
        assert!(!airdrop.has_claimed(&addr(2)));
        assert_eq!(airdrop.remaining(&ledger), tokens(100));
    }

    #[test]
    fn test_wrong_ledger_rejected() {
        let (ctx, _, mut airdrop, tree) = setup(tokens(3_500));
        let mut other = VotingPowerLedger::new("Other", "OT", addr(0x0f));
        let (amount, proof) = tree.claim_for(&addr(1)).unwrap();

        assert!(matches!(
            airdrop.claim(&ctx, &mut other, addr(1), amount, &proof),
            Err(AirdropError::WrongToken { .. })
        ));
    }
}
