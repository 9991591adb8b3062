//! Tessera Airdrop - one-time token claims against a published Merkle root.
//!
//! This crate provides:
//! - Leaf encoding for `(account, amount)` allocations
//! - An allowlist tree builder producing the root and per-recipient proofs
//! - The claim ledger paying each allocation at most once

pub mod tree;
pub mod claim;
pub mod events;
pub mod error;

pub use tree::{leaf_hash, AirdropTree};
pub use claim::MerkleAirdrop;
pub use events::AirdropEvent;
pub use error::AirdropError;
