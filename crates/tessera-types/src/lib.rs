//! Tessera Types - Core type definitions shared by every Tessera crate.
//!
//! This crate provides:
//! - Addresses (20-byte, Bech32m encoded)
//! - Hashes (32-byte, blake3 digests)
//! - Token amounts
//! - Block context (block number + timestamp clock)
//! - The `Event` trait implemented by every component's event enum
//! - The error taxonomy shared by all components

pub mod address;
pub mod hash;
pub mod amount;
pub mod block;
pub mod event;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use hash::Hash;
pub use amount::{Amount, TOKEN_UNIT, tokens};
pub use block::{BlockContext, Timepoint};
pub use event::Event;
pub use error::{ErrorKind, TypesError};

#[cfg(feature = "serde")]
pub use serialization::amount_string;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Address, Amount, BlockContext, ErrorKind, Event, Hash, Timepoint, TypesError};
}
