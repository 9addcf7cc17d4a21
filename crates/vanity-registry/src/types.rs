//! Core registry types

use serde::{Deserialize, Serialize};
use vanity_crypto::{Address, NameHash, NameKey};

/// Amount in the smallest currency unit
pub type Wei = u128;

/// Block height read from the execution environment
pub type BlockHeight = u64;

/// Seconds since the epoch read from the execution environment
pub type Timestamp = u64;

/// Caller identity and attached payment for one externally triggered operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Transaction sender
    pub sender: Address,
    /// Payment attached to the call
    pub value: Wei,
}

impl CallContext {
    /// A call without payment
    pub fn new(sender: Address) -> Self {
        Self { sender, value: 0 }
    }

    pub fn with_value(mut self, value: Wei) -> Self {
        self.value = value;
        self
    }
}

/// A pending name commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Digest of claimant and name
    pub name_hash: NameHash,
    /// Block height at commit time
    pub committed_at: BlockHeight,
}

impl Commitment {
    pub fn new(name_hash: NameHash, committed_at: BlockHeight) -> Self {
        Self { name_hash, committed_at }
    }

    /// Last block height at which a reveal is still too early
    pub fn freeze_ends_at(&self, block_freeze: u64) -> BlockHeight {
        self.committed_at.saturating_add(block_freeze)
    }

    /// Mature strictly after the freeze window has elapsed
    pub fn is_mature(&self, current: BlockHeight, block_freeze: u64) -> bool {
        current > self.freeze_ends_at(block_freeze)
    }
}

/// An active name registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub owner: Address,
    pub name: NameKey,
    /// Time of the most recent registration or renewal
    pub registered_at: Timestamp,
}

impl NameRecord {
    pub fn new(owner: Address, name: NameKey, registered_at: Timestamp) -> Self {
        Self { owner, name, registered_at }
    }

    /// Absolute expiry instant
    pub fn expires_at(&self, lock_duration: u64) -> Timestamp {
        self.registered_at.saturating_add(lock_duration)
    }

    /// Expired at and after the expiry instant
    pub fn is_expired(&self, now: Timestamp, lock_duration: u64) -> bool {
        now >= self.expires_at(lock_duration)
    }
}

/// Progress of a single claim through commit-reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimState {
    /// No commitment and no record for this claimant
    Uncommitted,
    /// Commitment recorded, freeze window still running
    Committed,
    /// Commitment old enough to be revealed
    Mature,
    /// The claimant holds the active record
    Registered,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanity_crypto::B256;

    #[test]
    fn test_commitment_maturity_is_strict() {
        let commitment = Commitment::new(B256::repeat_byte(1), 100);
        assert!(!commitment.is_mature(104, 5));
        assert!(!commitment.is_mature(105, 5));
        assert!(commitment.is_mature(106, 5));
    }

    #[test]
    fn test_record_expiry_boundary() {
        let record = NameRecord::new(Address::ZERO, NameKey::encode("a").unwrap(), 1_000);
        assert_eq!(record.expires_at(86_400), 87_400);
        assert!(!record.is_expired(87_399, 86_400));
        assert!(record.is_expired(87_400, 86_400));
    }

    #[test]
    fn test_call_context_builder() {
        let ctx = CallContext::new(Address::repeat_byte(7)).with_value(42);
        assert_eq!(ctx.value, 42);
        assert_eq!(CallContext::new(Address::ZERO).value, 0);
    }
}
