//! Commitment store
//!
//! Pending commitments in insertion order. The same digest may be committed
//! more than once; lookups return the earliest entry and removal preserves
//! the order of everything else.

use vanity_crypto::NameHash;

use crate::types::Commitment;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitmentStore {
    commitments: Vec<Commitment>,
}

impl CommitmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commitment
    pub fn push(&mut self, commitment: Commitment) {
        self.commitments.push(commitment);
    }

    /// Index of the first commitment with this digest
    pub fn find_by_hash(&self, name_hash: &NameHash) -> Option<usize> {
        self.commitments
            .iter()
            .position(|c| c.name_hash == *name_hash)
    }

    pub fn get(&self, index: usize) -> Option<&Commitment> {
        self.commitments.get(index)
    }

    /// Stable delete. Returns false and changes nothing when out of bounds.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.commitments.len() {
            return false;
        }
        self.commitments.remove(index);
        true
    }

    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Commitment> {
        self.commitments.iter()
    }
}
