//! Simulated chain
//!
//! `SimulatedChain` keeps native balances for every account plus the
//! registry's custody balance and implements `ExecutionEnv`. Each `call`
//! debits the attached value from the sender into custody, runs the
//! operation and restores every balance if the operation fails, the way a
//! reverted transaction would.
//!
//! With automine enabled every top-level call is included in a fresh block,
//! so the height a call observes is one past the last mined block.
//!
//! Accounts can carry a `ReceiveHook` that runs whenever custody pays them.
//! A hook may reject the payment or call back into the registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};
use vanity_crypto::Address;
use vanity_registry::{
    BlockHeight, CallContext, ExecutionEnv, RegistryResult, Timestamp, TransferError, Wei,
};

use crate::clock::SimulatedClock;
use crate::error::{SimulationError, SimulationResult};
use crate::hooks::ReceiveHook;

/// In-memory chain a registry runs against
pub struct SimulatedChain {
    clock: SimulatedClock,
    custody: Address,
    balances: RwLock<HashMap<Address, Wei>>,
    hooks: RwLock<HashMap<Address, Arc<dyn ReceiveHook>>>,
    automine: AtomicBool,
    depth: AtomicUsize,
}

impl SimulatedChain {
    /// Create a chain whose registry holds funds at `custody`
    pub fn new(custody: Address) -> Self {
        Self::with_clock(custody, SimulatedClock::default())
    }

    pub fn with_clock(custody: Address, clock: SimulatedClock) -> Self {
        Self {
            clock,
            custody,
            balances: RwLock::new(HashMap::new()),
            hooks: RwLock::new(HashMap::new()),
            automine: AtomicBool::new(false),
            depth: AtomicUsize::new(0),
        }
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    /// Address holding registry custody
    pub fn custody(&self) -> Address {
        self.custody
    }

    /// Include every top-level call in a newly mined block
    pub fn set_automine(&self, enabled: bool) {
        self.automine.store(enabled, Ordering::SeqCst);
    }

    /// Mine `blocks` blocks and return the new height
    pub fn mine(&self, blocks: u64) -> BlockHeight {
        self.clock.mine(blocks)
    }

    /// Advance time by `secs` seconds and return the new time
    pub fn advance(&self, secs: u64) -> Timestamp {
        self.clock.advance(std::time::Duration::from_secs(secs)).as_secs()
    }

    /// Credit `amount` to `account` out of thin air
    pub fn fund(&self, account: Address, amount: Wei) {
        let mut balances = self.balances.write();
        let balance = balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, account: &Address) -> Wei {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    /// Funds currently held by the registry
    pub fn custody_balance(&self) -> Wei {
        self.balance_of(&self.custody)
    }

    pub fn set_hook(&self, account: Address, hook: Arc<dyn ReceiveHook>) {
        self.hooks.write().insert(account, hook);
    }

    pub fn clear_hook(&self, account: &Address) {
        self.hooks.write().remove(account);
    }

    /// Execute one transaction from `sender` carrying `value`.
    ///
    /// `value` moves into custody before `op` runs. If `op` fails every
    /// balance is restored to what it was before the call.
    pub fn call<T>(
        &self,
        sender: Address,
        value: Wei,
        op: impl FnOnce(&Self, &CallContext) -> RegistryResult<T>,
    ) -> SimulationResult<T> {
        let snapshot = {
            let mut balances = self.balances.write();
            let snapshot = balances.clone();
            let balance = balances.get(&sender).copied().unwrap_or(0);
            if balance < value {
                return Err(SimulationError::InsufficientBalance {
                    account: sender,
                    balance,
                    required: value,
                });
            }
            balances.insert(sender, balance - value);
            let custody = balances.entry(self.custody).or_insert(0);
            *custody = custody.saturating_add(value);
            snapshot
        };

        let depth = self.depth.fetch_add(1, Ordering::SeqCst);
        if depth == 0 && self.automine.load(Ordering::SeqCst) {
            self.clock.mine(1);
        }

        let ctx = CallContext::new(sender).with_value(value);
        let result = op(self, &ctx);
        self.depth.fetch_sub(1, Ordering::SeqCst);

        match result {
            Ok(result) => Ok(result),
            Err(err) => {
                debug!(%sender, value, error = %err, "call reverted");
                *self.balances.write() = snapshot;
                Err(err.into())
            }
        }
    }
}

impl ExecutionEnv for SimulatedChain {
    fn block_height(&self) -> BlockHeight {
        self.clock.height()
    }

    fn timestamp(&self) -> Timestamp {
        self.clock.now().as_secs()
    }

    fn transfer(&self, to: Address, amount: Wei) -> Result<(), TransferError> {
        let snapshot = {
            let mut balances = self.balances.write();
            let custody = balances.get(&self.custody).copied().unwrap_or(0);
            if custody < amount {
                return Err(TransferError::new(to, amount, "registry custody underfunded"));
            }
            let snapshot = balances.clone();
            balances.insert(self.custody, custody - amount);
            let balance = balances.entry(to).or_insert(0);
            *balance = balance.saturating_add(amount);
            snapshot
        };
        trace!(%to, amount, "transfer out of custody");

        // Clone the hook out so no lock is held while it runs
        let hook = self.hooks.read().get(&to).cloned();
        if let Some(hook) = hook {
            if let Err(reason) = hook.on_receive(self, to, amount) {
                *self.balances.write() = snapshot;
                return Err(TransferError::new(to, amount, reason));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::RejectFunds;
    use vanity_registry::RegistryError;

    fn custody() -> Address {
        Address::repeat_byte(0xcc)
    }

    #[test]
    fn test_call_moves_value_into_custody() {
        let chain = SimulatedChain::new(custody());
        let alice = Address::repeat_byte(1);
        chain.fund(alice, 100);

        let seen = chain.call(alice, 40, |_, ctx| Ok(ctx.value)).unwrap();
        assert_eq!(seen, 40);
        assert_eq!(chain.balance_of(&alice), 60);
        assert_eq!(chain.custody_balance(), 40);
    }

    #[test]
    fn test_failed_call_restores_balances() {
        let chain = SimulatedChain::new(custody());
        let alice = Address::repeat_byte(1);
        let bob = Address::repeat_byte(2);
        chain.fund(alice, 100);

        let result: SimulationResult<()> = chain.call(alice, 40, |env, _| {
            env.transfer(bob, 10).unwrap();
            Err(RegistryError::ReentrantCall)
        });
        assert!(matches!(result, Err(SimulationError::Registry(RegistryError::ReentrantCall))));
        assert_eq!(chain.balance_of(&alice), 100);
        assert_eq!(chain.balance_of(&bob), 0);
        assert_eq!(chain.custody_balance(), 0);
    }

    #[test]
    fn test_call_requires_sender_balance() {
        let chain = SimulatedChain::new(custody());
        let alice = Address::repeat_byte(1);
        chain.fund(alice, 5);

        let result = chain.call(alice, 6, |_, _| Ok(()));
        assert!(matches!(result, Err(SimulationError::InsufficientBalance { balance: 5, required: 6, .. })));
        assert_eq!(chain.balance_of(&alice), 5);
    }

    #[test]
    fn test_rejecting_recipient_keeps_funds_in_custody() {
        let chain = SimulatedChain::new(custody());
        let alice = Address::repeat_byte(1);
        chain.fund(custody(), 50);
        chain.set_hook(alice, Arc::new(RejectFunds));

        let err = chain.transfer(alice, 20).unwrap_err();
        assert_eq!(err.to, alice);
        assert_eq!(chain.balance_of(&alice), 0);
        assert_eq!(chain.custody_balance(), 50);

        chain.clear_hook(&alice);
        chain.transfer(alice, 20).unwrap();
        assert_eq!(chain.balance_of(&alice), 20);
        assert_eq!(chain.custody_balance(), 30);
    }

    #[test]
    fn test_automine_mines_top_level_calls_only() {
        let chain = SimulatedChain::new(custody());
        let alice = Address::repeat_byte(1);
        chain.set_automine(true);
        let start = chain.block_height();

        let inner_height = chain
            .call(alice, 0, |env, _| {
                let outer = env.block_height();
                let inner = env.call(alice, 0, |env, _| Ok(env.block_height())).unwrap();
                assert_eq!(outer, inner);
                Ok(inner)
            })
            .unwrap();
        assert_eq!(inner_height, start + 1);

        chain.set_automine(false);
        chain.call(alice, 0, |_, _| Ok(())).unwrap();
        assert_eq!(chain.block_height(), start + 1);
    }

    #[test]
    fn test_transfer_cannot_overdraw_custody() {
        let chain = SimulatedChain::new(custody());
        chain.fund(custody(), 5);
        assert!(chain.transfer(Address::repeat_byte(1), 6).is_err());
        assert_eq!(chain.custody_balance(), 5);
    }
}
