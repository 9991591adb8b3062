//! Allowlist trees.
//!
//! A leaf commits to `(account, amount)` by hashing the encoding twice, so
//! no leaf can be confused with an interior node.

use std::collections::HashMap;

use tessera_crypto::{hash, hash_multi, MerkleTree};
use tessera_types::{Address, Amount, Hash};

use crate::error::AirdropError;

/// Leaf for an allocation: `H(H(account || amount_be))`.
pub fn leaf_hash(account: &Address, amount: Amount) -> Hash {
    let inner = hash_multi(&[account.as_bytes(), &amount.to_be_bytes()]);
    hash(inner.as_bytes())
}

/// The full allocation list and its tree.
#[derive(Debug, Clone)]
pub struct AirdropTree {
    allocations: HashMap<Address, Amount>,
    tree: MerkleTree,
}

impl AirdropTree {
    /// Build the tree. Each account may appear once.
    pub fn from_allocations(allocations: &[(Address, Amount)]) -> Result<Self, AirdropError> {
        let mut by_account = HashMap::with_capacity(allocations.len());
        for (account, amount) in allocations {
            if by_account.insert(*account, *amount).is_some() {
                return Err(AirdropError::DuplicateAllocation(*account));
            }
        }

        let leaves: Vec<Hash> = allocations
            .iter()
            .map(|(account, amount)| leaf_hash(account, *amount))
            .collect();

        Ok(Self {
            allocations: by_account,
            tree: MerkleTree::from_leaves(&leaves),
        })
    }

    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    pub fn amount_of(&self, account: &Address) -> Option<Amount> {
        self.allocations.get(account).copied()
    }

    /// Allocation and proof for `account`.
    pub fn claim_for(&self, account: &Address) -> Option<(Amount, Vec<Hash>)> {
        let amount = self.amount_of(account)?;
        let proof = self.tree.proof(&leaf_hash(account, amount))?;
        Some((amount, proof))
    }

    /// Sum of all allocations, `None` on overflow.
    pub fn total(&self) -> Option<Amount> {
        self.allocations
            .values()
            .try_fold(0 as Amount, |acc, amount| acc.checked_add(*amount))
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}
