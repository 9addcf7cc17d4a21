//! Purpose: Defines the execution environment seam the registry runs against.

use thiserror::Error;
use vanity_crypto::Address;

use crate::types::{BlockHeight, Timestamp, Wei};

/// An outbound payment rejected by its recipient
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transfer of {amount} wei to {to} rejected: {reason}")]
pub struct TransferError {
    pub to: Address,
    pub amount: Wei,
    pub reason: String,
}

impl TransferError {
    pub fn new(to: Address, amount: Wei, reason: impl Into<String>) -> Self {
        Self {
            to,
            amount,
            reason: reason.into(),
        }
    }
}

/// Ambient chain state and fund movement for one call.
///
/// The environment owns the registry's custody balance. Payments attached to
/// a call are credited to custody before the operation runs, and a failed
/// operation must leave balances as they were before the call.
pub trait ExecutionEnv {
    /// Current block height
    fn block_height(&self) -> BlockHeight;

    /// Current time in seconds
    fn timestamp(&self) -> Timestamp;

    /// Pay `amount` out of registry custody. The recipient may reject it, and
    /// may call back into the registry before returning.
    fn transfer(&self, to: Address, amount: Wei) -> Result<(), TransferError>;
}
