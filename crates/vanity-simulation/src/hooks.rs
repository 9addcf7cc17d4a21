//! Receive hooks for simulated accounts
//!
//! A hook runs after custody credits an account and before the paying
//! operation continues, which is where a hostile recipient would try to
//! re-enter the registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use vanity_crypto::{Address, ClaimSignature, NameHash};
use vanity_registry::{NameRegistry, RegistryError, Wei};

use crate::chain::SimulatedChain;
use crate::error::SimulationError;

/// Code run when an account receives funds from registry custody
pub trait ReceiveHook: Send + Sync {
    /// Return `Err(reason)` to reject the payment
    fn on_receive(&self, chain: &SimulatedChain, recipient: Address, amount: Wei) -> Result<(), String>;
}

/// Rejects every incoming payment
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectFunds;

impl ReceiveHook for RejectFunds {
    fn on_receive(&self, _chain: &SimulatedChain, recipient: Address, amount: Wei) -> Result<(), String> {
        debug!(%recipient, amount, "payment rejected by recipient");
        Err("recipient rejects funds".to_string())
    }
}

/// Registry call made from inside a receive hook
#[derive(Debug, Clone)]
pub enum ReentryAction {
    Commit { name_hash: NameHash },
    Register { name: String, signature: ClaimSignature, value: Wei },
    Renew { name: String, value: Wei },
    Unlock,
}

impl ReentryAction {
    fn label(&self) -> &'static str {
        match self {
            ReentryAction::Commit { .. } => "commit",
            ReentryAction::Register { .. } => "register",
            ReentryAction::Renew { .. } => "renew",
            ReentryAction::Unlock => "unlock",
        }
    }
}

/// What a re-entrant call attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReentryOutcome {
    Succeeded,
    Rejected(RegistryError),
    Failed(String),
}

/// Calls back into the registry the first time its account is paid.
///
/// With `propagate` set, a failed re-entrant call makes the hook reject the
/// payment, so the outer operation fails too. Otherwise the failure is
/// recorded and the payment accepted.
pub struct ReenterRegistry {
    registry: Arc<NameRegistry>,
    action: ReentryAction,
    propagate: bool,
    armed: AtomicBool,
    outcomes: Mutex<Vec<ReentryOutcome>>,
}

impl ReenterRegistry {
    pub fn new(registry: Arc<NameRegistry>, action: ReentryAction) -> Self {
        Self {
            registry,
            action,
            propagate: false,
            armed: AtomicBool::new(true),
            outcomes: Mutex::new(Vec::new()),
        }
    }

    pub fn propagating(mut self) -> Self {
        self.propagate = true;
        self
    }

    /// Outcomes of every attempt so far
    pub fn outcomes(&self) -> Vec<ReentryOutcome> {
        self.outcomes.lock().clone()
    }

    fn attempt(&self, chain: &SimulatedChain, recipient: Address) -> ReentryOutcome {
        let registry = &self.registry;
        let result = match &self.action {
            ReentryAction::Commit { name_hash } => {
                chain.call(recipient, 0, |env, ctx| registry.commit(env, ctx, *name_hash))
            }
            ReentryAction::Register { name, signature, value } => chain.call(recipient, *value, |env, ctx| {
                registry.register(env, ctx, name, signature.data()).map(|_| ())
            }),
            ReentryAction::Renew { name, value } => {
                chain.call(recipient, *value, |env, ctx| registry.renew(env, ctx, name).map(|_| ()))
            }
            ReentryAction::Unlock => chain.call(recipient, 0, |env, ctx| registry.unlock(env, ctx).map(|_| ())),
        };

        match result {
            Ok(()) => ReentryOutcome::Succeeded,
            Err(SimulationError::Registry(err)) => ReentryOutcome::Rejected(err),
            Err(other) => ReentryOutcome::Failed(other.to_string()),
        }
    }
}

impl ReceiveHook for ReenterRegistry {
    fn on_receive(&self, chain: &SimulatedChain, recipient: Address, amount: Wei) -> Result<(), String> {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let outcome = self.attempt(chain, recipient);
        debug!(%recipient, amount, action = self.action.label(), ?outcome, "re-entrant call attempted");
        self.outcomes.lock().push(outcome.clone());

        match outcome {
            ReentryOutcome::Succeeded => Ok(()),
            failure if self.propagate => {
                warn!(%recipient, ?failure, "re-entrant call failed, rejecting payment");
                Err(format!("re-entrant {} failed: {:?}", self.action.label(), failure))
            }
            _ => Ok(()),
        }
    }
}
