//! Call targets.
//!
//! Anything the timelock can call implements `Target`. Targets live in a
//! `Targets` registry keyed by address; the registry is cloneable so a batch
//! of calls can run against a staged copy and be committed only if every
//! call succeeds.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use tessera_types::{Address, Amount};
use thiserror::Error;

/// A single call as seen by the callee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// Address making the call
    pub caller: Address,
    /// Native value transferred with the call
    pub value: Amount,
    /// Encoded call data
    pub payload: Vec<u8>,
}

/// A target refused or failed a call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct Revert {
    pub reason: String,
}

impl Revert {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A callable component.
pub trait Target: fmt::Debug + Send {
    /// Handle a call. An error leaves no effects once the batch is rolled back.
    fn call(&mut self, frame: &CallFrame) -> Result<(), Revert>;

    fn clone_box(&self) -> Box<dyn Target>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Target> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Deployed targets and the native balances of every address.
#[derive(Debug, Clone, Default)]
pub struct Targets {
    contracts: HashMap<Address, Box<dyn Target>>,
    balances: HashMap<Address, Amount>,
}

impl Targets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `target` at `address`, replacing anything already there.
    pub fn deploy<T: Target + 'static>(&mut self, address: Address, target: T) {
        self.contracts.insert(address, Box::new(target));
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    /// Typed view of the target at `address`.
    pub fn get<T: Target + 'static>(&self, address: &Address) -> Option<&T> {
        self.contracts
            .get(address)
            .and_then(|target| target.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Target + 'static>(&mut self, address: &Address) -> Option<&mut T> {
        self.contracts
            .get_mut(address)
            .and_then(|target| target.as_any_mut().downcast_mut::<T>())
    }

    /// Native value received by `address` through calls.
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Deliver `frame` to `address`.
    ///
    /// Plain value transfers to addresses without a target succeed; a
    /// payload sent to such an address reverts.
    pub fn call(&mut self, address: Address, frame: &CallFrame) -> Result<(), Revert> {
        if frame.value > 0 {
            let balance = self
                .balance_of(&address)
                .checked_add(frame.value)
                .ok_or_else(|| Revert::new("balance overflow"))?;
            self.balances.insert(address, balance);
        }

        match self.contracts.get_mut(&address) {
            Some(target) => target.call(frame),
            None if frame.payload.is_empty() => Ok(()),
            None => Err(Revert::new(format!("no target at {}", address))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        hits: u32,
    }

    impl Target for Counter {
        fn call(&mut self, frame: &CallFrame) -> Result<(), Revert> {
            if frame.payload == b"fail" {
                return Err(Revert::new("counter refused"));
            }
            self.hits += 1;
            Ok(())
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

    fn frame(payload: &[u8], value: Amount) -> CallFrame {
        CallFrame {
            caller: Address::from_bytes([1u8; 20]),
            value,
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_call_reaches_target() {
        let addr = Address::from_bytes([9u8; 20]);
        let mut targets = Targets::new();
        targets.deploy(addr, Counter::default());

        targets.call(addr, &frame(b"hit", 0)).unwrap();
        targets.call(addr, &frame(b"hit", 0)).unwrap();
        assert_eq!(targets.get::<Counter>(&addr).unwrap().hits, 2);

        let err = targets.call(addr, &frame(b"fail", 0)).unwrap_err();
        assert_eq!(err.reason, "counter refused");
    }

    #[test]
    fn test_value_transfer_to_plain_address() {
        let addr = Address::from_bytes([4u8; 20]);
        let mut targets = Targets::new();

        targets.call(addr, &frame(&[], 50)).unwrap();
        assert_eq!(targets.balance_of(&addr), 50);
        assert!(targets.call(addr, &frame(b"data", 0)).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let addr = Address::from_bytes([9u8; 20]);
        let mut targets = Targets::new();
        targets.deploy(addr, Counter::default());

        let mut staged = targets.clone();
        staged.call(addr, &frame(b"hit", 0)).unwrap();

        assert_eq!(targets.get::<Counter>(&addr).unwrap().hits, 0);
        assert_eq!(staged.get::<Counter>(&addr).unwrap().hits, 1);
    }
}
