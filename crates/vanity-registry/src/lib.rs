//! Vanity name registry
//!
//! Commit-reveal name registration with a refundable deposit per name, a
//! protocol fee on every paid operation and time-bound ownership.

pub mod commitments;
pub mod config;
pub mod engine;
pub mod env;
pub mod events;
pub mod funds;
pub mod guard;
pub mod ledger;
pub mod lifecycle;
pub mod types;
pub mod units;

#[cfg(test)]
pub(crate) mod test_utils;

pub use commitments::CommitmentStore;
pub use config::{RegistryConfig, RegistryConfigBuilder};
pub use engine::NameRegistry;
pub use env::{ExecutionEnv, TransferError};
pub use events::RegistryEvent;
pub use funds::{FundRouter, Settlement};
pub use guard::{GuardToken, ReentrancyGuard};
pub use ledger::NameLedger;
pub use types::{BlockHeight, CallContext, ClaimState, Commitment, NameRecord, Timestamp, Wei};

// Re-export the crates callers need to build inputs and match errors
pub use vanity_crypto;
pub use vanity_error::{RegistryError, RegistryResult};
