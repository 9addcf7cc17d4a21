//! Signature and commitment-hash tests against real secp256k1 keys
//!
//! Signatures are produced the way a wallet signs a personal message, then
//! checked through the same recovery path the registry uses on reveal.

use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use proptest::prelude::*;
use vanity_crypto::{
    compute_name_hash, compute_signed_hash, recover_signer, verify_claim, Address,
    ClaimSignature, SignatureError,
};

fn sign_name_hash(signer: &PrivateKeySigner, name: &str) -> Vec<u8> {
    let name_hash = compute_name_hash(&signer.address(), name);
    let signature = signer
        .sign_message_sync(name_hash.as_slice())
        .expect("signing failed");
    signature.as_bytes().to_vec()
}

#[test]
fn test_wallet_signature_recovers_signer() {
    let signer = PrivateKeySigner::random();
    let raw = sign_name_hash(&signer, "hello");
    let name_hash = compute_name_hash(&signer.address(), "hello");

    let recovered = recover_signer(&compute_signed_hash(&name_hash), &raw).unwrap();
    assert_eq!(recovered, signer.address());
    assert!(verify_claim(&name_hash, &raw, &signer.address()).is_ok());
}

#[test]
fn test_signature_from_other_key_is_rejected() {
    let owner = PrivateKeySigner::random();
    let intruder = PrivateKeySigner::random();
    let name_hash = compute_name_hash(&owner.address(), "hello");
    let raw = intruder
        .sign_message_sync(name_hash.as_slice())
        .unwrap()
        .as_bytes()
        .to_vec();

    match verify_claim(&name_hash, &raw, &owner.address()) {
        Err(SignatureError::SignerMismatch { expected, recovered }) => {
            assert_eq!(expected, owner.address());
            assert_eq!(recovered, intruder.address());
        }
        other => panic!("expected signer mismatch, got {:?}", other),
    }
}

#[test]
fn test_signature_over_raw_digest_is_rejected() {
    // Signing the digest itself instead of its personal-message hash
    let signer = PrivateKeySigner::random();
    let name_hash = compute_name_hash(&signer.address(), "hello");
    let raw = signer.sign_hash_sync(&name_hash).unwrap().as_bytes().to_vec();

    assert!(verify_claim(&name_hash, &raw, &signer.address()).is_err());
}

#[test]
fn test_zero_based_recovery_id_accepted() {
    let signer = PrivateKeySigner::random();
    let mut raw = sign_name_hash(&signer, "hello");
    raw[64] -= 27;

    let name_hash = compute_name_hash(&signer.address(), "hello");
    assert!(verify_claim(&name_hash, &raw, &signer.address()).is_ok());
}

#[test]
fn test_hex_round_trip_through_claim_signature() {
    let signer = PrivateKeySigner::random();
    let raw = sign_name_hash(&signer, "vanity");
    let parsed = ClaimSignature::from_hex(&format!("0x{}", hex::encode(&raw))).unwrap();

    let name_hash = compute_name_hash(&signer.address(), "vanity");
    assert!(verify_claim(&name_hash, parsed.data(), &signer.address()).is_ok());
}

proptest! {
    #[test]
    fn prop_name_hash_deterministic(addr in any::<[u8; 20]>(), name in "[a-z0-9]{0,32}") {
        let claimant = Address::from(addr);
        prop_assert_eq!(compute_name_hash(&claimant, &name), compute_name_hash(&claimant, &name));
    }

    #[test]
    fn prop_name_hash_distinct_names(addr in any::<[u8; 20]>(), a in "[a-z0-9]{0,32}", b in "[a-z0-9]{0,32}") {
        prop_assume!(a != b);
        let claimant = Address::from(addr);
        prop_assert_ne!(compute_name_hash(&claimant, &a), compute_name_hash(&claimant, &b));
    }

    #[test]
    fn prop_name_hash_distinct_claimants(a in any::<[u8; 20]>(), b in any::<[u8; 20]>(), name in "[a-z0-9]{0,32}") {
        prop_assume!(a != b);
        prop_assert_ne!(
            compute_name_hash(&Address::from(a), &name),
            compute_name_hash(&Address::from(b), &name)
        );
    }
}
