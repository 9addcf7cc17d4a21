//! Test utilities for registry unit tests
//!
//! `MockEnv` records transfers instead of moving balances and can be told to
//! reject payments to specific addresses.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use vanity_crypto::Address;

use crate::env::{ExecutionEnv, TransferError};
use crate::types::{BlockHeight, Timestamp, Wei};

pub struct MockEnv {
    height: Cell<BlockHeight>,
    time: Cell<Timestamp>,
    transfers: RefCell<Vec<(Address, Wei)>>,
    rejecting: RefCell<HashSet<Address>>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self {
            height: Cell::new(1),
            time: Cell::new(1_700_000_000),
            transfers: RefCell::new(Vec::new()),
            rejecting: RefCell::new(HashSet::new()),
        }
    }

    pub fn mine(&self, blocks: u64) {
        self.height.set(self.height.get() + blocks);
    }

    pub fn advance(&self, secs: u64) {
        self.time.set(self.time.get() + secs);
    }

    pub fn reject(&self, address: Address) {
        self.rejecting.borrow_mut().insert(address);
    }

    pub fn accept(&self, address: Address) {
        self.rejecting.borrow_mut().remove(&address);
    }

    /// Successful transfers in call order
    pub fn transfers(&self) -> Vec<(Address, Wei)> {
        self.transfers.borrow().clone()
    }

    pub fn clear_transfers(&self) {
        self.transfers.borrow_mut().clear();
    }
}

impl ExecutionEnv for MockEnv {
    fn block_height(&self) -> BlockHeight {
        self.height.get()
    }

    fn timestamp(&self) -> Timestamp {
        self.time.get()
    }

    fn transfer(&self, to: Address, amount: Wei) -> Result<(), TransferError> {
        if self.rejecting.borrow().contains(&to) {
            return Err(TransferError::new(to, amount, "recipient rejects funds"));
        }
        self.transfers.borrow_mut().push((to, amount));
        Ok(())
    }
}
