//! Commit-reveal engine
//!
//! A claim moves `Uncommitted → Committed → Mature → Registered`. `commit`
//! records a digest of (sender, name); once more than `block_freeze` blocks
//! have passed, `register` reveals the name with a signature from the same
//! sender and turns the commitment into a ledger record.
//!
//! Every operation either completes or leaves registry state exactly as it
//! found it. State is snapshotted before mutation and restored on error;
//! the execution environment is responsible for reverting balances.

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use vanity_crypto::{
    compute_name_hash, compute_signed_hash, verify_claim, Address, NameHash, NameKey, B256,
};
use vanity_error::{ensure, RegistryError, RegistryResult};

use crate::commitments::CommitmentStore;
use crate::config::RegistryConfig;
use crate::env::ExecutionEnv;
use crate::events::RegistryEvent;
use crate::funds::FundRouter;
use crate::guard::ReentrancyGuard;
use crate::ledger::NameLedger;
use crate::types::{CallContext, ClaimState, Commitment, NameRecord, Timestamp};

/// Registry state: the two durable stores plus the notification log
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) commitments: CommitmentStore,
    pub(crate) ledger: NameLedger,
    pub(crate) events: Vec<RegistryEvent>,
}

/// Restore point for a failed operation. Events are append-only, so only
/// their length is recorded.
struct StateSnapshot {
    commitments: CommitmentStore,
    ledger: NameLedger,
    event_count: usize,
}

impl RegistryState {
    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            commitments: self.commitments.clone(),
            ledger: self.ledger.clone(),
            event_count: self.events.len(),
        }
    }

    fn restore(&mut self, snapshot: StateSnapshot) {
        self.commitments = snapshot.commitments;
        self.ledger = snapshot.ledger;
        self.events.truncate(snapshot.event_count);
    }
}

/// A single registry instance with fixed parameters
pub struct NameRegistry {
    config: RegistryConfig,
    pub(crate) state: Mutex<RegistryState>,
    pub(crate) guard: ReentrancyGuard,
}

impl NameRegistry {
    /// Create a registry after validating its parameters
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        info!(
            lock_duration = config.lock_duration,
            lock_amount = config.lock_amount,
            block_freeze = config.block_freeze,
            fee_amount = config.fee_amount,
            fee_recipient = %config.fee_recipient,
            "registry created"
        );
        Ok(Self {
            config,
            state: Mutex::new(RegistryState::default()),
            guard: ReentrancyGuard::new(),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Record a commitment at the current block height
    pub fn commit(
        &self,
        env: &dyn ExecutionEnv,
        ctx: &CallContext,
        name_hash: NameHash,
    ) -> RegistryResult<()> {
        ensure!(ctx.value == 0, RegistryError::invalid_input("commit does not accept payment"));
        ensure!(!name_hash.is_zero(), RegistryError::invalid_input("name hash must be non-zero"));

        let block_height = env.block_height();
        let mut state = self.state.lock();
        state.commitments.push(Commitment::new(name_hash, block_height));
        state.events.push(RegistryEvent::NameCommitted { name_hash, block_height });

        info!(%name_hash, block_height, sender = %ctx.sender, "commitment recorded");
        Ok(())
    }

    /// Reveal a committed name and take ownership of it.
    ///
    /// Requires a payment of at least `lock_amount + fee_amount`. The fee is
    /// forwarded, the deposit stays in custody and any excess is refunded.
    pub fn register(
        &self,
        env: &dyn ExecutionEnv,
        ctx: &CallContext,
        name: &str,
        signature: &[u8],
    ) -> RegistryResult<NameRecord> {
        let _entered = self.guard.enter()?;
        let router = FundRouter::new(&self.config);
        let required = self.config.registration_cost();
        router.check_payment(ctx, required)?;

        let key = NameKey::encode(name).map_err(|e| RegistryError::invalid_input(e.to_string()))?;
        let name_hash = compute_name_hash(&ctx.sender, name);
        let current = env.block_height();
        let now = env.timestamp();

        self.atomically(|| {
            let record = {
                let mut state = self.state.lock();
                let index = state
                    .commitments
                    .find_by_hash(&name_hash)
                    .ok_or_else(|| RegistryError::NotCommitted(name_hash.to_string()))?;
                let commitment = *state
                    .commitments
                    .get(index)
                    .ok_or_else(|| RegistryError::NotCommitted(name_hash.to_string()))?;

                ensure!(
                    commitment.is_mature(current, self.config.block_freeze),
                    RegistryError::TooEarly {
                        committed_at: commitment.committed_at,
                        current,
                        block_freeze: self.config.block_freeze,
                    }
                );

                verify_claim(&name_hash, signature, &ctx.sender)
                    .map_err(|e| RegistryError::invalid_signature(e.to_string()))?;

                ensure!(
                    state.ledger.find_by_name(&key).is_none(),
                    RegistryError::AlreadyRegistered(key.to_string())
                );

                let record = NameRecord::new(ctx.sender, key, now);
                state.ledger.insert(record)?;
                state.commitments.remove_at(index);
                state.events.push(RegistryEvent::NameRegistered {
                    owner: ctx.sender,
                    name: key,
                    timestamp: now,
                });
                record
            };

            router.settle(env, ctx, required)?;
            info!(owner = %record.owner, name = %record.name, registered_at = now, "name registered");
            Ok(record)
        })
    }

    /// Run `op`, restoring registry state if it fails
    pub(crate) fn atomically<T>(&self, op: impl FnOnce() -> RegistryResult<T>) -> RegistryResult<T> {
        let snapshot = self.state.lock().snapshot();
        let result = op();
        if let Err(err) = &result {
            warn!("Reverting registry state: {}", err);
            self.state.lock().restore(snapshot);
        }
        result
    }

    //-----------------------------------------------------------------------------
    // Views
    //-----------------------------------------------------------------------------

    /// Digest a claimant commits to before revealing `name`
    pub fn compute_name_hash(claimant: &Address, name: &str) -> NameHash {
        compute_name_hash(claimant, name)
    }

    /// Message hash the claimant signs for the reveal
    pub fn compute_signed_hash(digest: &B256) -> B256 {
        compute_signed_hash(digest)
    }

    pub fn total_names(&self) -> usize {
        self.state.lock().ledger.count()
    }

    pub fn total_commits(&self) -> usize {
        self.state.lock().commitments.len()
    }

    /// Ledger position of an active name
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        let key = NameKey::encode(name).ok()?;
        self.state.lock().ledger.find_by_name(&key)
    }

    pub fn record(&self, name: &str) -> Option<NameRecord> {
        let key = NameKey::encode(name).ok()?;
        let state = self.state.lock();
        state
            .ledger
            .find_by_name(&key)
            .and_then(|index| state.ledger.get(index).copied())
    }

    /// Instant from which the record for `name` can no longer be renewed
    pub fn expires_at(&self, name: &str) -> Option<Timestamp> {
        self.record(name)
            .map(|record| record.expires_at(self.config.lock_duration))
    }

    /// Where `claimant`'s claim on `name` stands at the current block
    pub fn claim_state(&self, env: &dyn ExecutionEnv, claimant: &Address, name: &str) -> ClaimState {
        if let Some(record) = self.record(name) {
            if record.owner == *claimant {
                return ClaimState::Registered;
            }
        }

        let name_hash = compute_name_hash(claimant, name);
        let state = self.state.lock();
        let commitment = state
            .commitments
            .find_by_hash(&name_hash)
            .and_then(|index| state.commitments.get(index));
        match commitment {
            Some(c) if c.is_mature(env.block_height(), self.config.block_freeze) => ClaimState::Mature,
            Some(_) => ClaimState::Committed,
            None => ClaimState::Uncommitted,
        }
    }

    pub fn commitments(&self) -> Vec<Commitment> {
        self.state.lock().commitments.iter().copied().collect()
    }

    pub fn records(&self) -> Vec<NameRecord> {
        self.state.lock().ledger.iter().copied().collect()
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.state.lock().events.clone()
    }

    /// Take all events emitted so far
    pub fn drain_events(&self) -> Vec<RegistryEvent> {
        let events = std::mem::take(&mut self.state.lock().events);
        debug!(count = events.len(), "events drained");
        events
    }
}
