//! Capability roles.
//!
//! Each principal holds a set of roles. Every role is administered by
//! `Admin`: only an Admin holder may grant or revoke it.

use std::collections::{HashMap, HashSet};

use borsh::{BorshDeserialize, BorshSerialize};
use tessera_types::Address;

use crate::error::TimelockError;

/// Capabilities recognised by the timelock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub enum Role {
    /// Administers every role
    Admin,
    /// May schedule operations
    Proposer,
    /// May execute ready operations
    Executor,
    /// May cancel pending operations
    Canceller,
}

impl Role {
    /// Role whose holders may grant and revoke this role.
    pub fn admin_role(&self) -> Role {
        Role::Admin
    }
}

/// Role membership per principal.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    members: HashMap<Address, HashSet<Role>>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.members
            .get(account)
            .is_some_and(|roles| roles.contains(&role))
    }

    /// Fail with `MissingRole` unless `account` holds `role`.
    pub fn check_role(&self, role: Role, account: &Address) -> Result<(), TimelockError> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(TimelockError::MissingRole {
                role,
                account: *account,
            })
        }
    }

    /// Add `role` to `account`. Returns false if it was already held.
    pub fn grant(&mut self, role: Role, account: Address) -> bool {
        self.members.entry(account).or_default().insert(role)
    }

    /// Remove `role` from `account`. Returns false if it was not held.
    pub fn revoke(&mut self, role: Role, account: &Address) -> bool {
        let Some(roles) = self.members.get_mut(account) else {
            return false;
        };
        let removed = roles.remove(&role);
        if roles.is_empty() {
            self.members.remove(account);
        }
        removed
    }

    /// Accounts holding `role`, in no particular order.
    pub fn members_of(&self, role: Role) -> impl Iterator<Item = &Address> {
        self.members
            .iter()
            .filter(move |(_, roles)| roles.contains(&role))
            .map(|(account, _)| account)
    }
}
