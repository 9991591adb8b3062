//! Claim ledger behaviour across many recipients.

use proptest::prelude::*;
use tessera_airdrop::{AirdropError, AirdropTree, MerkleAirdrop};
use tessera_token::VotingPowerLedger;
use tessera_types::{tokens, Address, Amount, BlockContext, Event};

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 20])
}

fn deploy(
    allocations: &[(Address, Amount)],
) -> (BlockContext, VotingPowerLedger, MerkleAirdrop, AirdropTree) {
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
    let tree = AirdropTree::from_allocations(allocations).unwrap();
    let airdrop = MerkleAirdrop::new(addr(0xa1), ledger.address(), tree.root());
    ledger
        .transfer(&ctx, deployer, airdrop.address(), tree.total().unwrap())
        .unwrap();
    (ctx, ledger, airdrop, tree)
}

#[test]
fn test_all_claims_drain_the_airdrop() {
    let allocations = [
        (addr(1), tokens(1_000)),
        (addr(2), tokens(2_000)),
        (addr(3), tokens(500)),
    ];
    let (ctx, mut ledger, mut airdrop, tree) = deploy(&allocations);
    assert_eq!(airdrop.remaining(&ledger), tokens(3_500));

    for (account, expected) in &allocations {
        let (amount, proof) = tree.claim_for(account).unwrap();
        airdrop.claim(&ctx, &mut ledger, *account, amount, &proof).unwrap();
        assert_eq!(ledger.balance_of(account), *expected);
    }

    assert_eq!(airdrop.remaining(&ledger), 0);
    let names: Vec<_> = airdrop.events().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Claimed"; 3]);
}

#[test]
fn test_claims_are_independent() {
    let allocations = [(addr(1), 10), (addr(2), 20)];
    let (ctx, mut ledger, mut airdrop, tree) = deploy(&allocations);

    let (amount, proof) = tree.claim_for(&addr(2)).unwrap();
    airdrop.claim(&ctx, &mut ledger, addr(2), amount, &proof).unwrap();
    assert!(!airdrop.has_claimed(&addr(1)));

    let (amount, proof) = tree.claim_for(&addr(1)).unwrap();
    airdrop.claim(&ctx, &mut ledger, addr(1), amount, &proof).unwrap();
    assert!(matches!(
        airdrop.claim(&ctx, &mut ledger, addr(1), amount, &proof),
        Err(AirdropError::AlreadyClaimed(_))
    ));
}

proptest! {
    #[test]
    fn prop_every_recipient_claims_exactly_once(
        amounts in proptest::collection::vec(1u128..1_000_000, 1..24),
    ) {
        let allocations: Vec<(Address, Amount)> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| (addr(i as u8 + 1), *amount))
            .collect();
        let (ctx, mut ledger, mut airdrop, tree) = deploy(&allocations);

        for (account, amount) in &allocations {
            let (claimed, proof) = tree.claim_for(account).unwrap();
            prop_assert_eq!(claimed, *amount);
            prop_assert!(airdrop.claim(&ctx, &mut ledger, *account, claimed, &proof).is_ok());
            prop_assert!(airdrop.claim(&ctx, &mut ledger, *account, claimed, &proof).is_err());
        }
        prop_assert_eq!(airdrop.remaining(&ledger), 0);
    }
}
