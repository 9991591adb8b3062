//! Demo target governed through the timelock.
//!
//! Holds a single value that only its owner may change. Deployed with the
//! timelock as owner, so the value moves only through executed proposals.

use std::any::Any;

use borsh::{BorshDeserialize, BorshSerialize};
use tessera_governance::{CallFrame, Revert, Target};
use tessera_types::{Address, ErrorKind, Event};
use thiserror::Error;

/// Errors returned by the box.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueBoxError {
    #[error("Ownable unauthorized account: {0}")]
    OwnableUnauthorizedAccount(Address),

    #[error("Invalid call data: {0}")]
    InvalidCall(String),
}

impl ValueBoxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValueBoxError::OwnableUnauthorizedAccount(_) => ErrorKind::Authorization,
            ValueBoxError::InvalidCall(_) => ErrorKind::Validation,
        }
    }
}

/// Calls accepted by the box.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum BoxCall {
    Store { value: u64 },
}

impl BoxCall {
    pub fn encode(&self) -> Result<Vec<u8>, ValueBoxError> {
        borsh::to_vec(self).map_err(|e| ValueBoxError::InvalidCall(e.to_string()))
    }

    pub fn decode(payload: &[u8]) -> Result<Self, ValueBoxError> {
        borsh::from_slice(payload).map_err(|e| ValueBoxError::InvalidCall(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxEvent {
    ValueChanged { value: u64 },
}

impl Event for BoxEvent {
    fn name(&self) -> &'static str {
        match self {
            BoxEvent::ValueChanged { .. } => "ValueChanged",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValueBox {
    owner: Address,
    value: u64,
    events: Vec<BoxEvent>,
}

impl ValueBox {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            value: 0,
            events: Vec::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn retrieve(&self) -> u64 {
        self.value
    }

    /// Set the value. Only the owner may call this.
    pub fn store(&mut self, caller: Address, value: u64) -> Result<(), ValueBoxError> {
        if caller != self.owner {
            return Err(ValueBoxError::OwnableUnauthorizedAccount(caller));
        }
        self.value = value;
        self.events.push(BoxEvent::ValueChanged { value });
        tracing::info!("Box value changed to {}", value);
        Ok(())
    }

    pub fn events(&self) -> &[BoxEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<BoxEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Target for ValueBox {
    fn call(&mut self, frame: &CallFrame) -> Result<(), Revert> {
        let call = BoxCall::decode(&frame.payload).map_err(|e| Revert::new(e.to_string()))?;
        match call {
            BoxCall::Store { value } => self
                .store(frame.caller, value)
                .map_err(|e| Revert::new(e.to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn Target> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
