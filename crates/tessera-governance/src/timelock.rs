//! Timelock-gated execution queue.
//!
//! Operations are batches of calls identified by the hash of their canonical
//! encoding. A scheduled operation becomes ready once its delay has elapsed
//! (block timestamps, seconds) and then executes at most once, all calls or
//! none. The timelock administers itself: changing the delay or the roles
//! after setup requires an operation that calls the timelock's own address.

use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use tessera_types::{Address, Amount, BlockContext, Hash, Timepoint};

use crate::access::{AccessControl, Role};
use crate::error::TimelockError;
use crate::events::TimelockEvent;
use crate::target::{CallFrame, Revert, Targets};

/// A batch of calls as scheduled in the timelock.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OperationBatch {
    pub targets: Vec<Address>,
    pub values: Vec<Amount>,
    pub payloads: Vec<Vec<u8>>,
    /// Operation that must be executed first, `Hash::ZERO` for none
    pub predecessor: Hash,
    pub salt: Hash,
}

impl OperationBatch {
    /// Batch with a single call.
    pub fn single(
        target: Address,
        value: Amount,
        payload: Vec<u8>,
        predecessor: Hash,
        salt: Hash,
    ) -> Self {
        Self {
            targets: vec![target],
            values: vec![value],
            payloads: vec![payload],
            predecessor,
            salt,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets, values and payloads must line up.
    pub fn validate(&self) -> Result<(), TimelockError> {
        if self.targets.len() != self.values.len() || self.targets.len() != self.payloads.len() {
            return Err(TimelockError::InvalidOperationLength {
                targets: self.targets.len(),
                values: self.values.len(),
                payloads: self.payloads.len(),
            });
        }
        Ok(())
    }

    /// Operation id: hash of the borsh encoding.
    pub fn id(&self) -> Result<Hash, TimelockError> {
        let bytes = borsh::to_vec(self).map_err(|e| TimelockError::Encoding(e.to_string()))?;
        Ok(Hash::compute(&bytes))
    }
}

/// Lifecycle state of an operation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    /// Never scheduled
    Unset,
    /// Scheduled, delay not yet elapsed
    Scheduled,
    /// Scheduled and executable
    Ready,
    Executed,
    /// Cancelled before execution; the id may be scheduled again
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationStatus {
    Pending,
    Executed,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct OperationRecord {
    ready_at: Timepoint,
    status: OperationStatus,
}

/// Calls the timelock accepts from itself.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum TimelockCall {
    UpdateDelay { new_delay: u64 },
    GrantRole { role: Role, account: Address },
    RevokeRole { role: Role, account: Address },
}

impl TimelockCall {
    pub fn encode(&self) -> Result<Vec<u8>, TimelockError> {
        borsh::to_vec(self).map_err(|e| TimelockError::Encoding(e.to_string()))
    }

    pub fn decode(payload: &[u8]) -> Result<Self, TimelockError> {
        borsh::from_slice(payload).map_err(|e| TimelockError::Encoding(e.to_string()))
    }
}

/// The timelock queue.
#[derive(Debug, Clone)]
pub struct Timelock {
    address: Address,
    min_delay: u64,
    roles: AccessControl,
    operations: HashMap<Hash, OperationRecord>,
    /// Native value available to scheduled calls
    balance: Amount,
    events: Vec<TimelockEvent>,
}

impl Timelock {
    /// Create a timelock at `address`.
    ///
    /// The timelock administers itself. Proposers also become cancellers.
    /// Granting Executor to the zero address lets anyone execute. An
    /// optional external `admin` may configure roles during setup and
    /// should renounce afterwards.
    pub fn new(
        address: Address,
        min_delay: u64,
        proposers: &[Address],
        executors: &[Address],
        admin: Option<Address>,
    ) -> Self {
        let mut timelock = Self {
            address,
            min_delay,
            roles: AccessControl::new(),
            operations: HashMap::new(),
            balance: 0,
            events: Vec::new(),
        };

        timelock.grant_internal(Role::Admin, address, address);
        if let Some(admin) = admin {
            timelock.grant_internal(Role::Admin, admin, address);
        }
        for proposer in proposers {
            timelock.grant_internal(Role::Proposer, *proposer, address);
            timelock.grant_internal(Role::Canceller, *proposer, address);
        }
        for executor in executors {
            timelock.grant_internal(Role::Executor, *executor, address);
        }

        timelock.events.push(TimelockEvent::MinDelayChange {
            old_delay: 0,
            new_delay: min_delay,
        });
        tracing::info!("Timelock deployed at {} with min delay {}s", address, min_delay);
        timelock
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Minimum delay in seconds.
    pub fn min_delay(&self) -> u64 {
        self.min_delay
    }

    /// Native value held by the timelock.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Fund the timelock with native value.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), TimelockError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(TimelockError::Overflow)?;
        Ok(())
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    pub fn roles(&self) -> &AccessControl {
        &self.roles
    }

    pub fn events(&self) -> &[TimelockEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<TimelockEvent> {
        std::mem::take(&mut self.events)
    }

    /// Id `batch` is scheduled under.
    pub fn hash_operation(&self, batch: &OperationBatch) -> Result<Hash, TimelockError> {
        batch.id()
    }

    pub fn operation_state(&self, ctx: &BlockContext, id: &Hash) -> OperationState {
        match self.operations.get(id) {
            None => OperationState::Unset,
            Some(record) => match record.status {
                OperationStatus::Executed => OperationState::Executed,
                OperationStatus::Cancelled => OperationState::Cancelled,
                OperationStatus::Pending if ctx.timestamp >= record.ready_at => OperationState::Ready,
                OperationStatus::Pending => OperationState::Scheduled,
            },
        }
    }

    /// Whether `id` is scheduled, ready or executed.
    pub fn is_operation(&self, id: &Hash) -> bool {
        self.operations
            .get(id)
            .is_some_and(|r| r.status != OperationStatus::Cancelled)
    }

    /// Whether `id` is scheduled or ready.
    pub fn is_operation_pending(&self, id: &Hash) -> bool {
        self.operations
            .get(id)
            .is_some_and(|r| r.status == OperationStatus::Pending)
    }

    pub fn is_operation_ready(&self, ctx: &BlockContext, id: &Hash) -> bool {
        self.operation_state(ctx, id) == OperationState::Ready
    }

    pub fn is_operation_done(&self, id: &Hash) -> bool {
        self.operations
            .get(id)
            .is_some_and(|r| r.status == OperationStatus::Executed)
    }

    /// Timestamp at which `id` becomes ready, if it is scheduled or executed.
    pub fn timestamp_of(&self, id: &Hash) -> Option<Timepoint> {
        self.operations
            .get(id)
            .filter(|r| r.status != OperationStatus::Cancelled)
            .map(|r| r.ready_at)
    }

    /// Schedule `batch` to become executable `delay` seconds from now.
    ///
    /// # Errors
    /// - `MissingRole` unless `caller` is a proposer
    /// - `InsufficientDelay` if `delay` is below the minimum
    /// - `OperationAlreadyScheduled` if the id is live
    pub fn schedule(
        &mut self,
        ctx: &BlockContext,
        caller: Address,
        batch: &OperationBatch,
        delay: u64,
    ) -> Result<Hash, TimelockError> {
        self.roles.check_role(Role::Proposer, &caller)?;
        batch.validate()?;
        if delay < self.min_delay {
            return Err(TimelockError::InsufficientDelay {
                delay,
                min_delay: self.min_delay,
            });
        }

        let id = batch.id()?;
        if self.is_operation(&id) {
            return Err(TimelockError::OperationAlreadyScheduled(id));
        }
        let ready_at = ctx
            .timestamp
            .checked_add(delay)
            .ok_or(TimelockError::Overflow)?;

        self.operations.insert(
            id,
            OperationRecord {
                ready_at,
                status: OperationStatus::Pending,
            },
        );
        for (index, ((target, value), payload)) in batch
            .targets
            .iter()
            .zip(&batch.values)
            .zip(&batch.payloads)
            .enumerate()
        {
            self.events.push(TimelockEvent::CallScheduled {
                id,
                index,
                target: *target,
                value: *value,
                payload: payload.clone(),
                predecessor: batch.predecessor,
                delay,
            });
        }
        if !batch.salt.is_zero() {
            self.events.push(TimelockEvent::CallSalt { id, salt: batch.salt });
        }

        tracing::info!(
            "Scheduled operation {} ({} calls), ready at {}",
            id,
            batch.len(),
            ready_at
        );
        Ok(id)
    }

    /// Execute a ready operation.
    ///
    /// Calls run in order against staged copies of the timelock and the
    /// targets; both are committed only if every call succeeds.
    ///
    /// # Errors
    /// - `MissingRole` unless `caller` (or everyone) holds Executor
    /// - `OperationNotReady` unless the operation is Ready
    /// - `PredecessorNotExecuted` if the declared predecessor is not done
    /// - `UnderlyingCallReverted` if any call fails
    pub fn execute(
        &mut self,
        ctx: &BlockContext,
        caller: Address,
        batch: &OperationBatch,
        targets: &mut Targets,
    ) -> Result<Hash, TimelockError> {
        self.check_role_or_open(Role::Executor, &caller)?;
        batch.validate()?;

        let id = batch.id()?;
        let state = self.operation_state(ctx, &id);
        if state != OperationState::Ready {
            return Err(TimelockError::OperationNotReady { id, state });
        }
        if !batch.predecessor.is_zero() && !self.is_operation_done(&batch.predecessor) {
            return Err(TimelockError::PredecessorNotExecuted(batch.predecessor));
        }

        let mut staged = self.clone();
        let mut staged_targets = targets.clone();
        for (index, ((target, value), payload)) in batch
            .targets
            .iter()
            .zip(&batch.values)
            .zip(&batch.payloads)
            .enumerate()
        {
            let frame = CallFrame {
                caller: self.address,
                value: *value,
                payload: payload.clone(),
            };
            if let Err(revert) = staged.dispatch(&mut staged_targets, *target, &frame) {
                tracing::warn!(
                    "Operation {} reverted at call {} to {}: {}",
                    id,
                    index,
                    target,
                    revert
                );
                return Err(TimelockError::UnderlyingCallReverted {
                    index,
                    reason: revert.reason,
                });
            }
            staged.events.push(TimelockEvent::CallExecuted {
                id,
                index,
                target: *target,
                value: *value,
                payload: payload.clone(),
            });
        }

        if let Some(record) = staged.operations.get_mut(&id) {
            record.status = OperationStatus::Executed;
        }
        *self = staged;
        *targets = staged_targets;

        tracing::info!("Executed operation {}", id);
        Ok(id)
    }

    /// Cancel a scheduled or ready operation.
    pub fn cancel(
        &mut self,
        ctx: &BlockContext,
        caller: Address,
        id: &Hash,
    ) -> Result<(), TimelockError> {
        self.roles.check_role(Role::Canceller, &caller)?;

        let state = self.operation_state(ctx, id);
        if !matches!(state, OperationState::Scheduled | OperationState::Ready) {
            return Err(TimelockError::UnexpectedOperationState { id: *id, state });
        }
        if let Some(record) = self.operations.get_mut(id) {
            record.status = OperationStatus::Cancelled;
        }
        self.events.push(TimelockEvent::Cancelled { id: *id });

        tracing::info!("Cancelled operation {}", id);
        Ok(())
    }

    /// Change the minimum delay. Only the timelock itself may call this.
    pub fn update_delay(&mut self, caller: Address, new_delay: u64) -> Result<(), TimelockError> {
        if caller != self.address {
            return Err(TimelockError::UnauthorizedCaller(caller));
        }
        self.events.push(TimelockEvent::MinDelayChange {
            old_delay: self.min_delay,
            new_delay,
        });
        tracing::info!("Min delay changed from {}s to {}s", self.min_delay, new_delay);
        self.min_delay = new_delay;
        Ok(())
    }

    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), TimelockError> {
        self.roles.check_role(role.admin_role(), &caller)?;
        self.grant_internal(role, account, caller);
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), TimelockError> {
        self.roles.check_role(role.admin_role(), &caller)?;
        self.revoke_internal(role, account, caller);
        Ok(())
    }

    /// Give up `role`. `confirmation` must be the caller's own address.
    pub fn renounce_role(
        &mut self,
        caller: Address,
        role: Role,
        confirmation: Address,
    ) -> Result<(), TimelockError> {
        if caller != confirmation {
            return Err(TimelockError::BadConfirmation);
        }
        self.revoke_internal(role, caller, caller);
        Ok(())
    }

    fn grant_internal(&mut self, role: Role, account: Address, sender: Address) {
        if self.roles.grant(role, account) {
            self.events.push(TimelockEvent::RoleGranted {
                role,
                account,
                sender,
            });
            tracing::info!("Granted {:?} to {}", role, account);
        }
    }

    fn revoke_internal(&mut self, role: Role, account: Address, sender: Address) {
        if self.roles.revoke(role, &account) {
            self.events.push(TimelockEvent::RoleRevoked {
                role,
                account,
                sender,
            });
            tracing::info!("Revoked {:?} from {}", role, account);
        }
    }

    /// Role check where a grant to the zero address opens the role.
    fn check_role_or_open(&self, role: Role, account: &Address) -> Result<(), TimelockError> {
        if self.roles.has_role(role, &Address::ZERO) {
            return Ok(());
        }
        self.roles.check_role(role, account)
    }

    fn dispatch(
        &mut self,
        targets: &mut Targets,
        target: Address,
        frame: &CallFrame,
    ) -> Result<(), Revert> {
        if target == self.address {
            return self.handle_self_call(frame);
        }
        if frame.value > 0 {
            self.balance = self.balance.checked_sub(frame.value).ok_or_else(|| {
                Revert::new(format!(
                    "insufficient balance: have {}, need {}",
                    self.balance, frame.value
                ))
            })?;
        }
        targets.call(target, frame)
    }

    fn handle_self_call(&mut self, frame: &CallFrame) -> Result<(), Revert> {
        let call = TimelockCall::decode(&frame.payload).map_err(|e| Revert::new(e.to_string()))?;
        let result = match call {
            TimelockCall::UpdateDelay { new_delay } => self.update_delay(frame.caller, new_delay),
            TimelockCall::GrantRole { role, account } => self.grant_role(frame.caller, role, account),
            TimelockCall::RevokeRole { role, account } => {
                self.revoke_role(frame.caller, role, account)
            }
        };
        result.map_err(|e| Revert::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use std::any::Any;
    use tessera_types::ErrorKind;

    #[derive(Debug, Clone, Default)]
    struct Recorder {
        calls: Vec<Vec<u8>>,
    }

    impl Target for Recorder {
        fn call(&mut self, frame: &CallFrame) -> Result<(), Revert> {
            if frame.payload == b"fail" {
                return Err(Revert::new("recorder refused"));
            }
            self.calls.push(frame.payload.clone());
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

    const MIN_DELAY: u64 = 3_600;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn proposer() -> Address {
        addr(1)
    }

    fn executor() -> Address {
        addr(2)
    }

    fn recorder() -> Address {
        addr(0xaa)
    }

    fn setup() -> (Timelock, Targets) {
        let timelock = Timelock::new(addr(0xdd), MIN_DELAY, &[proposer()], &[executor()], None);
        let mut targets = Targets::new();
        targets.deploy(recorder(), Recorder::default());
        (timelock, targets)
    }

    fn batch(payload: &[u8]) -> OperationBatch {
        OperationBatch::single(recorder(), 0, payload.to_vec(), Hash::ZERO, Hash::ZERO)
    }

    fn at(timestamp: u64) -> BlockContext {
        BlockContext::new(1, timestamp)
    }

    fn recorded(targets: &Targets) -> usize {
        targets.get::<Recorder>(&recorder()).unwrap().calls.len()
    }

    #[test]
    fn test_roles_after_construction() {
        let (timelock, _) = setup();
        assert!(timelock.has_role(Role::Admin, &timelock.address()));
        assert!(timelock.has_role(Role::Proposer, &proposer()));
        assert!(timelock.has_role(Role::Canceller, &proposer()));
        assert!(timelock.has_role(Role::Executor, &executor()));
        assert!(!timelock.has_role(Role::Proposer, &executor()));
    }

    #[test]
    fn test_schedule_requires_proposer() {
        let (mut timelock, _) = setup();
        let err = timelock
            .schedule(&at(0), executor(), &batch(b"x"), MIN_DELAY)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_schedule_rejects_short_delay() {
        let (mut timelock, _) = setup();
        let err = timelock
            .schedule(&at(0), proposer(), &batch(b"x"), MIN_DELAY - 1)
            .unwrap_err();
        assert_eq!(
            err,
            TimelockError::InsufficientDelay {
                delay: MIN_DELAY - 1,
                min_delay: MIN_DELAY
            }
        );
    }

    #[test]
    fn test_schedule_twice_is_replay() {
        let (mut timelock, _) = setup();
        let id = timelock
            .schedule(&at(0), proposer(), &batch(b"x"), MIN_DELAY)
            .unwrap();
        assert_eq!(timelock.operation_state(&at(0), &id), OperationState::Scheduled);
        assert_eq!(timelock.timestamp_of(&id), Some(MIN_DELAY));

        let err = timelock
            .schedule(&at(5), proposer(), &batch(b"x"), MIN_DELAY)
            .unwrap_err();
        assert_eq!(err, TimelockError::OperationAlreadyScheduled(id));
        assert_eq!(err.kind(), ErrorKind::Replay);
    }

    #[test]
    fn test_cancelled_id_can_be_rescheduled() {
        let (mut timelock, _) = setup();
        let id = timelock
            .schedule(&at(0), proposer(), &batch(b"x"), MIN_DELAY)
            .unwrap();
        timelock.cancel(&at(1), proposer(), &id).unwrap();
        assert_eq!(timelock.operation_state(&at(1), &id), OperationState::Cancelled);
        assert!(!timelock.is_operation(&id));

        // Cancelling again is a state error
        assert!(matches!(
            timelock.cancel(&at(2), proposer(), &id),
            Err(TimelockError::UnexpectedOperationState { .. })
        ));

        let again = timelock
            .schedule(&at(10), proposer(), &batch(b"x"), MIN_DELAY)
            .unwrap();
        assert_eq!(again, id);
        assert_eq!(timelock.timestamp_of(&id), Some(10 + MIN_DELAY));
    }

    #[test]
    fn test_execute_only_when_ready_and_once() {
        let (mut timelock, mut targets) = setup();
        let op = batch(b"store");
        let id = timelock.schedule(&at(0), proposer(), &op, MIN_DELAY).unwrap();

        let err = timelock
            .execute(&at(MIN_DELAY - 1), executor(), &op, &mut targets)
            .unwrap_err();
        assert_eq!(
            err,
            TimelockError::OperationNotReady {
                id,
                state: OperationState::Scheduled
            }
        );
        assert_eq!(recorded(&targets), 0);

        timelock
            .execute(&at(MIN_DELAY), executor(), &op, &mut targets)
            .unwrap();
        assert_eq!(recorded(&targets), 1);
        assert!(timelock.is_operation_done(&id));

        let err = timelock
            .execute(&at(MIN_DELAY + 1), executor(), &op, &mut targets)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(recorded(&targets), 1);
    }

    #[test]
    fn test_execute_requires_executor_unless_open() {
        let (mut timelock, mut targets) = setup();
        let op = batch(b"store");
        timelock.schedule(&at(0), proposer(), &op, MIN_DELAY).unwrap();

        let stranger = addr(0x55);
        assert!(matches!(
            timelock.execute(&at(MIN_DELAY), stranger, &op, &mut targets),
            Err(TimelockError::MissingRole { role: Role::Executor, .. })
        ));

        let mut open = Timelock::new(addr(0xdd), MIN_DELAY, &[proposer()], &[Address::ZERO], None);
        open.schedule(&at(0), proposer(), &op, MIN_DELAY).unwrap();
        open.execute(&at(MIN_DELAY), stranger, &op, &mut targets).unwrap();
        assert_eq!(recorded(&targets), 1);
    }

    #[test]
    fn test_batch_is_atomic() {
        let (mut timelock, mut targets) = setup();
        let op = OperationBatch {
            targets: vec![recorder(), recorder()],
            values: vec![0, 0],
            payloads: vec![b"first".to_vec(), b"fail".to_vec()],
            predecessor: Hash::ZERO,
            salt: Hash::ZERO,
        };
        let id = timelock.schedule(&at(0), proposer(), &op, MIN_DELAY).unwrap();

        let err = timelock
            .execute(&at(MIN_DELAY), executor(), &op, &mut targets)
            .unwrap_err();
        assert_eq!(
            err,
            TimelockError::UnderlyingCallReverted {
                index: 1,
                reason: "recorder refused".to_string()
            }
        );
        assert_eq!(err.kind(), ErrorKind::Dependency);
        // First call rolled back, operation still ready
        assert_eq!(recorded(&targets), 0);
        assert_eq!(timelock.operation_state(&at(MIN_DELAY), &id), OperationState::Ready);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let (mut timelock, _) = setup();
        let op = OperationBatch {
            targets: vec![recorder()],
            values: vec![],
            payloads: vec![vec![]],
            predecessor: Hash::ZERO,
            salt: Hash::ZERO,
        };
        assert!(matches!(
            timelock.schedule(&at(0), proposer(), &op, MIN_DELAY),
            Err(TimelockError::InvalidOperationLength { targets: 1, values: 0, payloads: 1 })
        ));
    }

    #[test]
    fn test_predecessor_must_execute_first() {
        let (mut timelock, mut targets) = setup();
        let first = batch(b"first");
        let first_id = timelock.schedule(&at(0), proposer(), &first, MIN_DELAY).unwrap();

        let second = OperationBatch::single(recorder(), 0, b"second".to_vec(), first_id, Hash::ZERO);
        timelock.schedule(&at(0), proposer(), &second, MIN_DELAY).unwrap();

        let err = timelock
            .execute(&at(MIN_DELAY), executor(), &second, &mut targets)
            .unwrap_err();
        assert_eq!(err, TimelockError::PredecessorNotExecuted(first_id));

        timelock.execute(&at(MIN_DELAY), executor(), &first, &mut targets).unwrap();
        timelock.execute(&at(MIN_DELAY), executor(), &second, &mut targets).unwrap();
        assert_eq!(recorded(&targets), 2);
    }

    #[test]
    fn test_salt_changes_id() {
        let (timelock, _) = setup();
        let plain = batch(b"x");
        let mut salted = plain.clone();
        salted.salt = Hash::compute(b"salt");
        assert_ne!(
            timelock.hash_operation(&plain).unwrap(),
            timelock.hash_operation(&salted).unwrap()
        );
    }

    #[test]
    fn test_delay_update_only_through_self_call() {
        let (mut timelock, mut targets) = setup();
        assert_eq!(
            timelock.update_delay(proposer(), 10).unwrap_err(),
            TimelockError::UnauthorizedCaller(proposer())
        );

        let payload = TimelockCall::UpdateDelay { new_delay: 60 }.encode().unwrap();
        let op = OperationBatch::single(timelock.address(), 0, payload, Hash::ZERO, Hash::ZERO);
        timelock.schedule(&at(0), proposer(), &op, MIN_DELAY).unwrap();
        timelock.execute(&at(MIN_DELAY), executor(), &op, &mut targets).unwrap();

        assert_eq!(timelock.min_delay(), 60);
    }

    #[test]
    fn test_role_admin_and_renounce() {
        let admin = addr(0x0a);
        let mut timelock = Timelock::new(addr(0xdd), MIN_DELAY, &[], &[], Some(admin));

        timelock.grant_role(admin, Role::Proposer, proposer()).unwrap();
        assert!(timelock.has_role(Role::Proposer, &proposer()));
        assert!(timelock.grant_role(proposer(), Role::Admin, proposer()).is_err());

        assert_eq!(
            timelock.renounce_role(proposer(), Role::Proposer, admin).unwrap_err(),
            TimelockError::BadConfirmation
        );
        timelock.renounce_role(proposer(), Role::Proposer, proposer()).unwrap();
        assert!(!timelock.has_role(Role::Proposer, &proposer()));

        timelock.revoke_role(admin, Role::Admin, admin).unwrap();
        assert!(!timelock.has_role(Role::Admin, &admin));
        assert!(timelock.grant_role(admin, Role::Proposer, admin).is_err());
    }

    #[test]
    fn test_value_is_debited_from_timelock() {
        let (mut timelock, mut targets) = setup();
        timelock.deposit(100).unwrap();

        let payee = addr(0x77);
        let op = OperationBatch::single(payee, 60, vec![], Hash::ZERO, Hash::ZERO);
        timelock.schedule(&at(0), proposer(), &op, MIN_DELAY).unwrap();
        timelock.execute(&at(MIN_DELAY), executor(), &op, &mut targets).unwrap();
        assert_eq!(timelock.balance(), 40);
        assert_eq!(targets.balance_of(&payee), 60);

        let too_much = OperationBatch::single(payee, 41, vec![], Hash::ZERO, Hash::ZERO);
        timelock.schedule(&at(0), proposer(), &too_much, MIN_DELAY).unwrap();
        assert!(timelock
            .execute(&at(MIN_DELAY), executor(), &too_much, &mut targets)
            .is_err());
        assert_eq!(timelock.balance(), 40);
    }
}
