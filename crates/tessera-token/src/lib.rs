//! Tessera Token - the governance token and its voting-power ledger.
//!
//! This crate provides:
//! - Balance and allowance bookkeeping
//! - Single-hop delegation of voting power
//! - Per-account checkpoint histories with point-in-time lookups
//! - Signed approvals (permits) with per-owner nonces

pub mod checkpoints;
pub mod ledger;
pub mod permit;
pub mod events;
pub mod error;

pub use checkpoints::{Checkpoint, Checkpoints};
pub use ledger::VotingPowerLedger;
pub use permit::{Permit, SignedPermit};
pub use events::TokenEvent;
pub use error::TokenError;
