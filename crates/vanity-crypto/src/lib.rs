//! Cryptographic primitives for the vanity registry
//!
//! This crate provides the canonical name encoding, the commitment digest
//! binding a claimant to a name, and signer recovery for reveal proofs.

pub mod hash;
pub mod name;
pub mod signature;

// Ethereum-style primitives used across the workspace
pub use alloy::primitives::{Address, B256};

pub use hash::{compute_name_hash, compute_signed_hash, NameHash};
pub use name::{NameError, NameKey, MAX_NAME_BYTES};
pub use signature::{recover_signer, verify_claim, ClaimSignature, SignatureError, SIGNATURE_LENGTH};
