//! Deterministic simulation accounts
//!
//! Each account derives its secp256k1 key from its label, so a scenario file
//! names its participants and gets the same addresses on every run.

use alloy::primitives::keccak256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use vanity_crypto::{compute_name_hash, Address, ClaimSignature, NameHash};

use crate::error::{SimulationError, SimulationResult};

const KEY_DOMAIN: &str = "vanity-sim/account";

/// A labelled externally-owned account with a signing key
#[derive(Debug, Clone)]
pub struct Account {
    label: String,
    signer: PrivateKeySigner,
}

impl Account {
    /// Derive the account for `label`
    pub fn from_label(label: &str) -> SimulationResult<Self> {
        let secret = keccak256(format!("{}/{}", KEY_DOMAIN, label).as_bytes());
        let signer = PrivateKeySigner::from_bytes(&secret)
            .map_err(|e| SimulationError::Signing(format!("cannot derive key for '{}': {}", label, e)))?;
        Ok(Self {
            label: label.to_string(),
            signer,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The commitment digest this account would submit for `name`
    pub fn name_hash(&self, name: &str) -> NameHash {
        compute_name_hash(&self.address(), name)
    }

    /// Sign a commitment digest as an EIP-191 personal message
    pub fn sign_claim(&self, name_hash: &NameHash) -> SimulationResult<ClaimSignature> {
        let signature = self
            .signer
            .sign_message_sync(name_hash.as_slice())
            .map_err(|e| SimulationError::Signing(e.to_string()))?;
        Ok(ClaimSignature::from(signature.as_bytes()))
    }

    /// Commitment digest and reveal signature for `name`
    pub fn prepare_claim(&self, name: &str) -> SimulationResult<(NameHash, ClaimSignature)> {
        let name_hash = self.name_hash(name);
        let signature = self.sign_claim(&name_hash)?;
        Ok((name_hash, signature))
    }
}
