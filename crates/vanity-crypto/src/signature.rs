//! Reveal signatures
//!
//! A reveal carries a 65-byte recoverable secp256k1 signature (r ‖ s ‖ v) over
//! the personal-message hash of the commitment digest.

use std::fmt;

use alloy::primitives::{Address, PrimitiveSignature, B256, U256};
use thiserror::Error;

use crate::hash::{compute_signed_hash, NameHash};

/// Length of a recoverable signature in bytes
pub const SIGNATURE_LENGTH: usize = 65;

/// Upper half of the secp256k1 group order; larger `s` values are malleable
const SECP256K1N_HALF: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Error type for signature operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Invalid signature format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Invalid signature length
    #[error("Invalid length: expected 65 bytes, got {0}")]
    InvalidLength(usize),

    /// Public key recovery failed
    #[error("Recovery failed: {0}")]
    RecoveryFailed(String),

    /// Recovered signer differs from the expected address
    #[error("Signer mismatch: expected {expected}, recovered {recovered}")]
    SignerMismatch {
        expected: Address,
        recovered: Address,
    },
}

/// Raw signature bytes attached to a reveal
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ClaimSignature {
    data: Vec<u8>,
}

impl ClaimSignature {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Get the raw signature data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Convert the signature to a hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }

    /// Create a signature from a hex string, with or without `0x`
    pub fn from_hex(hex_str: &str) -> Result<Self, SignatureError> {
        let trimmed = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let data = hex::decode(trimmed)
            .map_err(|_| SignatureError::InvalidFormat("Invalid hex format".to_string()))?;
        Ok(Self::new(data))
    }
}

impl From<Vec<u8>> for ClaimSignature {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for ClaimSignature {
    fn from(data: [u8; SIGNATURE_LENGTH]) -> Self {
        Self::new(data.to_vec())
    }
}

impl fmt::Debug for ClaimSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClaimSignature(0x{})", self.to_hex())
    }
}

/// Recover the signing address from a prehashed message.
///
/// Accepts `v` as 0/1 or 27/28 and rejects high-`s` signatures.
pub fn recover_signer(prehash: &B256, signature: &[u8]) -> Result<Address, SignatureError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::InvalidLength(signature.len()));
    }

    let r = U256::from_be_slice(&signature[..32]);
    let s = U256::from_be_slice(&signature[32..64]);
    let y_parity = match signature[64] {
        0 | 27 => false,
        1 | 28 => true,
        v => return Err(SignatureError::InvalidFormat(format!("invalid recovery id {}", v))),
    };

    if s > U256::from_be_slice(&SECP256K1N_HALF) {
        return Err(SignatureError::InvalidFormat("malleable s value".to_string()));
    }

    PrimitiveSignature::new(r, s, y_parity)
        .recover_address_from_prehash(prehash)
        .map_err(|e| SignatureError::RecoveryFailed(e.to_string()))
}

/// Check that `signature` over the personal-message hash of `name_hash` was
/// produced by `expected`
pub fn verify_claim(
    name_hash: &NameHash,
    signature: &[u8],
    expected: &Address,
) -> Result<(), SignatureError> {
    let recovered = recover_signer(&compute_signed_hash(name_hash), signature)?;
    if recovered != *expected {
        return Err(SignatureError::SignerMismatch {
            expected: *expected,
            recovered,
        });
    }
    Ok(())
}
