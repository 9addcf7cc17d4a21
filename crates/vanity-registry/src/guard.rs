//! Mutual exclusion for fund-moving operations

use std::sync::atomic::{AtomicBool, Ordering};

use vanity_error::{RegistryError, RegistryResult};

/// One flag shared by every guarded entry point.
///
/// While a guarded operation runs, entering any guarded operation fails with
/// `ReentrantCall`. The flag is cleared when the returned token drops, which
/// covers early returns and unwinding.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: AtomicBool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag or fail if it is already set
    pub fn enter(&self) -> RegistryResult<GuardToken<'_>> {
        self.entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RegistryError::ReentrantCall)?;
        Ok(GuardToken { guard: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Holds the guard until dropped
#[must_use = "the guard is released as soon as the token is dropped"]
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.entered.store(false, Ordering::Release);
    }
}
