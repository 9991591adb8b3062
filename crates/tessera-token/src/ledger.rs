//! The governance token ledger.
//!
//! Tracks balances and allowances, and maintains voting power as a function
//! of time: every balance or delegation change appends a checkpoint for the
//! affected delegates, and a total-supply history is kept for quorum math.
//! Undelegated balances carry no voting power.

use std::collections::HashMap;

use tessera_types::{Address, Amount, BlockContext, Timepoint};

use crate::checkpoints::Checkpoints;
use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::permit::SignedPermit;

/// Balances, delegation and checkpointed voting power.
#[derive(Debug, Clone)]
pub struct VotingPowerLedger {
    name: String,
    symbol: String,
    decimals: u8,
    /// Address the ledger is deployed at (permit domain)
    address: Address,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    /// delegator -> delegatee
    delegates: HashMap<Address, Address>,
    /// delegatee -> voting power history
    vote_checkpoints: HashMap<Address, Checkpoints>,
    supply_checkpoints: Checkpoints,
    /// Block of the most recent checkpoint write
    last_write: Timepoint,
    nonces: HashMap<Address, u64>,
    events: Vec<TokenEvent>,
}

/// A pending checkpoint write for one delegate.
#[derive(Debug, Clone, Copy)]
struct VoteMove {
    delegate: Address,
    previous: Amount,
    new: Amount,
}

impl VotingPowerLedger {
    /// Create an empty ledger.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: 18,
            address,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            delegates: HashMap::new(),
            vote_checkpoints: HashMap::new(),
            supply_checkpoints: Checkpoints::new(),
            last_write: 0,
            nonces: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Create a ledger whose entire fixed supply is minted to `holder`.
    pub fn with_initial_supply(
        ctx: &BlockContext,
        name: impl Into<String>,
        symbol: impl Into<String>,
        address: Address,
        holder: Address,
        supply: Amount,
    ) -> Result<Self, TokenError> {
        if holder.is_zero() {
            return Err(TokenError::InvalidReceiver(holder));
        }

        let mut ledger = Self::new(name, symbol, address);
        ledger.balances.insert(holder, supply);
        ledger.total_supply = supply;
        ledger.supply_checkpoints.push(ctx.number, supply)?;
        ledger.last_write = ctx.number;
        ledger.events.push(TokenEvent::Transfer {
            from: Address::ZERO,
            to: holder,
            value: supply,
        });

        tracing::info!(
            "Minted {} {} to {} at block {}",
            supply,
            ledger.symbol,
            holder,
            ctx.number
        );
        Ok(ledger)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Current delegatee of `account`, if any.
    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.delegates.get(account).copied()
    }

    /// Current voting power of `account`.
    pub fn votes(&self, account: &Address) -> Amount {
        self.vote_checkpoints.get(account).map_or(0, Checkpoints::latest)
    }

    /// Voting power of `account` at the end of block `timepoint`.
    ///
    /// Only closed blocks can be read: the current block's checkpoints may
    /// still change.
    ///
    /// # Errors
    /// `FutureLookup` if `timepoint` is the current block or later.
    pub fn past_votes(
        &self,
        ctx: &BlockContext,
        account: &Address,
        timepoint: Timepoint,
    ) -> Result<Amount, TokenError> {
        Self::check_past(ctx, timepoint)?;
        Ok(self
            .vote_checkpoints
            .get(account)
            .map_or(0, |cps| cps.upper_lookup(timepoint)))
    }

    /// Total supply at the end of block `timepoint`.
    ///
    /// # Errors
    /// `FutureLookup` if `timepoint` is the current block or later.
    pub fn past_total_supply(
        &self,
        ctx: &BlockContext,
        timepoint: Timepoint,
    ) -> Result<Amount, TokenError> {
        Self::check_past(ctx, timepoint)?;
        Ok(self.supply_checkpoints.upper_lookup(timepoint))
    }

    /// Voting power history of `account`.
    pub fn checkpoints(&self, account: &Address) -> Option<&Checkpoints> {
        self.vote_checkpoints.get(account)
    }

    pub fn nonces(&self, owner: &Address) -> u64 {
        self.nonces.get(owner).copied().unwrap_or(0)
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Drain emitted events.
    pub fn take_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// - `InvalidReceiver` for the zero address
    /// - `InsufficientBalance` if `from` holds less than `amount`
    pub fn transfer(
        &mut self,
        ctx: &BlockContext,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(to));
        }

        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }
        let to_balance = if from == to {
            from_balance
        } else {
            self.balance_of(&to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?
        };
        let moves = self.vote_moves(self.delegates(&from), self.delegates(&to), amount)?;
        self.advance_clock(ctx)?;

        if from != to {
            self.balances.insert(from, from_balance - amount);
            self.balances.insert(to, to_balance);
        }
        self.events.push(TokenEvent::Transfer {
            from,
            to,
            value: amount,
        });
        self.write_votes(ctx, moves)?;

        tracing::debug!("Transfer {} from {} to {}", amount, from, to);
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s tokens.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
        self.events.push(TokenEvent::Approval {
            owner,
            spender,
            value: amount,
        });
    }

    /// Spend `spender`'s allowance to move `amount` from `from` to `to`.
    pub fn transfer_from(
        &mut self,
        ctx: &BlockContext,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(&from, &spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                have: allowance,
                need: amount,
            });
        }

        self.transfer(ctx, from, to, amount)?;
        if allowance != Amount::MAX {
            self.allowances.insert((from, spender), allowance - amount);
        }
        Ok(())
    }

    /// Delegate `account`'s voting power to `delegatee` (may be `account`
    /// itself). Takes effect from the current block on.
    ///
    /// # Errors
    /// `InvalidDelegatee` for the zero address; use `undelegate` instead.
    pub fn delegate(
        &mut self,
        ctx: &BlockContext,
        account: Address,
        delegatee: Address,
    ) -> Result<(), TokenError> {
        if delegatee.is_zero() {
            return Err(TokenError::InvalidDelegatee(delegatee));
        }
        self.set_delegate(ctx, account, Some(delegatee))
    }

    /// Withdraw `account`'s voting power from its current delegatee.
    pub fn undelegate(&mut self, ctx: &BlockContext, account: Address) -> Result<(), TokenError> {
        self.set_delegate(ctx, account, None)
    }

    fn set_delegate(
        &mut self,
        ctx: &BlockContext,
        account: Address,
        delegatee: Option<Address>,
    ) -> Result<(), TokenError> {
        let current = self.delegates(&account);
        let balance = self.balance_of(&account);
        let moves = self.vote_moves(current, delegatee, balance)?;
        self.advance_clock(ctx)?;

        let previous = match delegatee {
            Some(d) => self.delegates.insert(account, d),
            None => self.delegates.remove(&account),
        };
        self.events.push(TokenEvent::DelegateChanged {
            delegator: account,
            from_delegate: previous,
            to_delegate: delegatee,
        });
        self.write_votes(ctx, moves)?;

        tracing::debug!(
            "Delegation of {} changed from {:?} to {:?}",
            account,
            previous,
            delegatee
        );
        Ok(())
    }

    /// Consume a signed approval.
    ///
    /// # Errors
    /// - `ExpiredSignature` if the block timestamp is past the deadline
    /// - `InvalidSigner` if the key does not belong to the owner, the permit
    ///   targets another token, or the signature does not verify
    /// - `InvalidNonce` if the permit's nonce was already consumed
    pub fn permit(&mut self, ctx: &BlockContext, signed: &SignedPermit) -> Result<(), TokenError> {
        let permit = &signed.permit;

        if ctx.timestamp > permit.deadline {
            return Err(TokenError::ExpiredSignature {
                deadline: permit.deadline,
                now: ctx.timestamp,
            });
        }
        if permit.token != self.address || signed.public_key.to_address() != permit.owner {
            return Err(TokenError::InvalidSigner(permit.owner));
        }

        let expected = self.nonces(&permit.owner);
        if permit.nonce != expected {
            return Err(TokenError::InvalidNonce {
                expected,
                got: permit.nonce,
            });
        }

        tessera_crypto::verify(
            &signed.public_key,
            &permit.signing_message(),
            &signed.signature,
        )
        .map_err(|_| TokenError::InvalidSigner(permit.owner))?;

        self.nonces.insert(permit.owner, expected + 1);
        self.approve(permit.owner, permit.spender, permit.value);

        tracing::debug!(
            "Permit {} consumed for {} -> {}",
            permit.nonce,
            permit.owner,
            permit.spender
        );
        Ok(())
    }

    /// Voting power writes needed to shift `amount` from one delegate to
    /// another, computed before anything is changed.
    ///
    /// Voting power of a delegate always covers the balances delegated to
    /// it, so the subtraction only fails if that invariant is broken.
    fn vote_moves(
        &self,
        from: Option<Address>,
        to: Option<Address>,
        amount: Amount,
    ) -> Result<Vec<VoteMove>, TokenError> {
        let mut moves = Vec::with_capacity(2);
        if from == to || amount == 0 {
            return Ok(moves);
        }

        if let Some(delegate) = from {
            let previous = self.votes(&delegate);
            let new = previous.checked_sub(amount).ok_or(TokenError::Overflow)?;
            moves.push(VoteMove { delegate, previous, new });
        }
        if let Some(delegate) = to {
            let previous = self.votes(&delegate);
            let new = previous.checked_add(amount).ok_or(TokenError::Overflow)?;
            moves.push(VoteMove { delegate, previous, new });
        }
        Ok(moves)
    }

    /// Checkpoint each move at the current block.
    fn write_votes(&mut self, ctx: &BlockContext, moves: Vec<VoteMove>) -> Result<(), TokenError> {
        for VoteMove { delegate, previous, new } in moves {
            self.vote_checkpoints
                .entry(delegate)
                .or_default()
                .push(ctx.number, new)?;
            self.events.push(TokenEvent::DelegateVotesChanged {
                delegate,
                previous_votes: previous,
                new_votes: new,
            });
        }
        Ok(())
    }

    /// Move the write clock to the current block, rejecting blocks older
    /// than the last write. Every checkpoint is at or before `last_write`,
    /// so pushes at the current block cannot fail afterwards.
    fn advance_clock(&mut self, ctx: &BlockContext) -> Result<(), TokenError> {
        if self.last_write > ctx.number {
            return Err(TokenError::StaleTimepoint {
                timepoint: ctx.number,
                latest: self.last_write,
            });
        }
        self.last_write = ctx.number;
        Ok(())
    }

    fn check_past(ctx: &BlockContext, timepoint: Timepoint) -> Result<(), TokenError> {
        if timepoint >= ctx.number {
            return Err(TokenError::FutureLookup {
                timepoint,
                current: ctx.number,
            });
        }
        Ok(())
    }
}
