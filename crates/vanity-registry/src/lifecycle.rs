//! Renewal and expiry sweeping
//!
//! An owner can renew strictly before `registered_at + lock_duration`. From
//! that instant on the record can only be swept by `unlock`, which anyone
//! may call and which returns each swept deposit to its previous owner.

use tracing::{debug, info};
use vanity_crypto::NameKey;
use vanity_error::{ensure, RegistryError, RegistryResult};

use crate::engine::NameRegistry;
use crate::env::ExecutionEnv;
use crate::events::RegistryEvent;
use crate::funds::FundRouter;
use crate::types::{CallContext, NameRecord};

impl NameRegistry {
    /// Extend ownership of `name` from now. Requires a payment of at least
    /// `fee_amount`; any excess is refunded.
    pub fn renew(
        &self,
        env: &dyn ExecutionEnv,
        ctx: &CallContext,
        name: &str,
    ) -> RegistryResult<NameRecord> {
        let _entered = self.guard.enter()?;
        let router = FundRouter::new(self.config());
        let required = self.config().renewal_cost();
        router.check_payment(ctx, required)?;

        let key = NameKey::encode(name).map_err(|e| RegistryError::invalid_input(e.to_string()))?;
        let now = env.timestamp();
        let lock_duration = self.config().lock_duration;

        self.atomically(|| {
            let record = {
                let mut state = self.state.lock();
                let index = state
                    .ledger
                    .find_by_name(&key)
                    .ok_or_else(|| RegistryError::NameNotFound(key.to_string()))?;
                let record = state
                    .ledger
                    .get_mut(index)
                    .ok_or_else(|| RegistryError::NameNotFound(key.to_string()))?;

                ensure!(
                    record.owner == ctx.sender,
                    RegistryError::NotOwner {
                        name: key.to_string(),
                        caller: ctx.sender.to_string(),
                    }
                );
                ensure!(
                    !record.is_expired(now, lock_duration),
                    RegistryError::Expired {
                        expires_at: record.expires_at(lock_duration),
                        now,
                    }
                );

                record.registered_at = now;
                let renewed = *record;
                state.events.push(RegistryEvent::NameRenewed {
                    owner: ctx.sender,
                    name: key,
                    timestamp: now,
                });
                renewed
            };

            router.settle(env, ctx, required)?;
            info!(owner = %record.owner, name = %record.name, registered_at = now, "name renewed");
            Ok(record)
        })
    }

    /// Sweep every expired record and return its deposit.
    ///
    /// All-or-nothing: if any previous owner rejects its deposit the whole
    /// sweep fails and no record is removed. Returns the swept records.
    pub fn unlock(&self, env: &dyn ExecutionEnv, ctx: &CallContext) -> RegistryResult<Vec<NameRecord>> {
        let _entered = self.guard.enter()?;
        ensure!(ctx.value == 0, RegistryError::invalid_input("unlock does not accept payment"));

        let router = FundRouter::new(self.config());
        let now = env.timestamp();
        let lock_duration = self.config().lock_duration;

        self.atomically(|| {
            let swept = self.state.lock().ledger.drain_expired(now, lock_duration);
            if swept.is_empty() {
                debug!(now, "nothing to unlock");
                return Ok(swept);
            }

            for record in &swept {
                router.return_deposit(env, record.owner)?;
                debug!(owner = %record.owner, name = %record.name, "deposit returned");
            }

            info!(count = swept.len(), caller = %ctx.sender, "expired names unlocked");
            Ok(swept)
        })
    }

    /// Number of records `unlock` would sweep right now
    pub fn expired_count(&self, env: &dyn ExecutionEnv) -> usize {
        let now = env.timestamp();
        let lock_duration = self.config().lock_duration;
        self.state
            .lock()
            .ledger
            .iter()
            .filter(|record| record.is_expired(now, lock_duration))
            .count()
    }
}
