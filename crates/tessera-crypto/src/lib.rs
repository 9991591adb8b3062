//! Tessera Crypto - Cryptographic primitives for Tessera.
//!
//! This crate provides:
//! - Blake3 hashing helpers (pair, sorted pair, domain separated)
//! - Sorted-pair Merkle trees and membership proofs
//! - Ed25519 keypairs and signature verification

pub mod hash;
pub mod merkle;
pub mod ed25519;
pub mod error;

pub use hash::{hash, hash_multi, hash_pair, hash_sorted_pair, hash_with_domain};
pub use merkle::{MerkleTree, verify_proof, process_proof};
pub use ed25519::{Keypair, PublicKey, Signature, verify};
pub use error::CryptoError;
