//! Name ledger
//!
//! Active records in registration order with a name → slot index kept in
//! step with the list, so uniqueness checks and lookups do not scan.

use std::collections::HashMap;

use vanity_crypto::NameKey;
use vanity_error::{RegistryError, RegistryResult};

use crate::types::{NameRecord, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameLedger {
    records: Vec<NameRecord>,
    slots: HashMap<NameKey, usize>,
}

impl NameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; the name must not already be active
    pub fn insert(&mut self, record: NameRecord) -> RegistryResult<usize> {
        if self.slots.contains_key(&record.name) {
            return Err(RegistryError::AlreadyRegistered(record.name.to_string()));
        }
        let index = self.records.len();
        self.slots.insert(record.name, index);
        self.records.push(record);
        Ok(index)
    }

    pub fn find_by_name(&self, name: &NameKey) -> Option<usize> {
        self.slots.get(name).copied()
    }

    pub fn get(&self, index: usize) -> Option<&NameRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut NameRecord> {
        self.records.get_mut(index)
    }

    /// Stable delete, returning the removed record; `None` when out of bounds
    pub fn remove_at(&mut self, index: usize) -> Option<NameRecord> {
        if index >= self.records.len() {
            return None;
        }
        let record = self.records.remove(index);
        self.slots.remove(&record.name);
        for slot in self.slots.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        Some(record)
    }

    /// Remove every record expired at `now`, in ledger order.
    ///
    /// The cursor only advances past records that stay: after a removal the
    /// next record has shifted into the current slot.
    pub fn drain_expired(&mut self, now: Timestamp, lock_duration: u64) -> Vec<NameRecord> {
        let mut removed = Vec::new();
        let mut cursor = 0;
        while cursor < self.records.len() {
            if self.records[cursor].is_expired(now, lock_duration) {
                if let Some(record) = self.remove_at(cursor) {
                    removed.push(record);
                }
            } else {
                cursor += 1;
            }
        }
        removed
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameRecord> {
        self.records.iter()
    }
}
