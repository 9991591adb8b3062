//! Tessera Devnet - a local network hosting the whole protocol.
//!
//! This crate provides:
//! - `Devnet`: every component plus a block clock, with mining and time travel
//! - Full-system deployment and role wiring
//! - The `ValueBox` demo target owned by the timelock
//! - Transaction receipts and event lookup by name
//! - The per-network deployment registry
//! - TOML configuration and logging setup
//! - `SharedDevnet` for serialized multi-threaded access

pub mod config;
pub mod deploy;
pub mod deployments;
pub mod devnet;
pub mod events;
pub mod scenario;
pub mod shared;
pub mod telemetry;
pub mod value_box;
pub mod error;

pub use config::{AirdropConfig, DevnetConfig, LoggingConfig, TokenConfig};
pub use deploy::signer_keypair;
pub use deployments::{DeploymentRegistry, Deployments};
pub use devnet::Devnet;
pub use events::{find_event, Log, Receipt};
pub use scenario::{run_lifecycle, LifecycleReport};
pub use shared::SharedDevnet;
pub use telemetry::init_telemetry;
pub use value_box::{BoxCall, BoxEvent, ValueBox, ValueBoxError};
pub use error::DevnetError;
