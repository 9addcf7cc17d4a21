//! Commitment digests
//!
//! The commitment hash packs the claimant address ahead of the name bytes, so
//! a commitment only ever matches a reveal sent by the same address.

use alloy::primitives::{eip191_hash_message, keccak256, Address, B256};

/// Opaque 32-byte digest binding a claimant to a name
pub type NameHash = B256;

/// keccak256(claimant ‖ name), the tightly packed encoding of both values
pub fn compute_name_hash(claimant: &Address, name: &str) -> NameHash {
    let mut packed = Vec::with_capacity(20 + name.len());
    packed.extend_from_slice(claimant.as_slice());
    packed.extend_from_slice(name.as_bytes());
    keccak256(packed)
}

/// Personal-message hash of a digest ("\x19Ethereum Signed Message:\n32" prefix)
pub fn compute_signed_hash(digest: &B256) -> B256 {
    eip191_hash_message(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_name_hash_is_deterministic() {
        let claimant = address!("00000000000000000000000000000000000000a1");
        assert_eq!(
            compute_name_hash(&claimant, "hello"),
            compute_name_hash(&claimant, "hello")
        );
    }

    #[test]
    fn test_name_hash_binds_claimant() {
        let a = address!("00000000000000000000000000000000000000a1");
        let b = address!("00000000000000000000000000000000000000b2");
        assert_ne!(compute_name_hash(&a, "hello"), compute_name_hash(&b, "hello"));
    }

    #[test]
    fn test_name_hash_matches_packed_keccak() {
        let claimant = address!("00000000000000000000000000000000000000a1");
        let mut packed = claimant.to_vec();
        packed.extend_from_slice(b"hello");
        assert_eq!(compute_name_hash(&claimant, "hello"), keccak256(&packed));
    }

    #[test]
    fn test_empty_name_hash_is_not_zero() {
        assert!(!compute_name_hash(&Address::ZERO, "").is_zero());
    }

    #[test]
    fn test_signed_hash_uses_personal_message_prefix() {
        let digest = keccak256(b"digest");
        let mut prefixed = b"\x19Ethereum Signed Message:\n32".to_vec();
        prefixed.extend_from_slice(digest.as_slice());
        assert_eq!(compute_signed_hash(&digest), keccak256(&prefixed));
        assert_ne!(compute_signed_hash(&digest), digest);
    }
}
