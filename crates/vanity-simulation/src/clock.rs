//! Simulated clock for deterministic block and time progression
//!
//! Block height and wall-clock seconds move independently: mining blocks
//! does not advance time and advancing time does not mine blocks.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use vanity_registry::{BlockHeight, Timestamp};

/// Default starting height for a fresh chain
pub const GENESIS_HEIGHT: BlockHeight = 1;

/// Default starting time for a fresh chain (2023-11-14T22:13:20Z)
pub const GENESIS_TIME: Timestamp = 1_700_000_000;

/// Simulated timestamp in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SimulatedTimestamp(u64);

impl SimulatedTimestamp {
    /// Create a new simulated timestamp from seconds since epoch
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the timestamp as seconds since epoch
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Add duration to timestamp
    pub fn add_duration(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_secs()))
    }
}

#[derive(Debug, Clone, Copy)]
struct ClockState {
    height: BlockHeight,
    time: SimulatedTimestamp,
}

/// Block height and time source for a simulated chain
#[derive(Debug)]
pub struct SimulatedClock {
    state: Mutex<ClockState>,
}

impl SimulatedClock {
    /// Create a clock at the given height and time
    pub fn new(height: BlockHeight, start_time: SimulatedTimestamp) -> Self {
        Self {
            state: Mutex::new(ClockState { height, time: start_time }),
        }
    }

    /// Get the current simulated time
    pub fn now(&self) -> SimulatedTimestamp {
        self.state.lock().time
    }

    /// Get the current block height
    pub fn height(&self) -> BlockHeight {
        self.state.lock().height
    }

    /// Mine `blocks` empty blocks
    pub fn mine(&self, blocks: u64) -> BlockHeight {
        let mut state = self.state.lock();
        state.height = state.height.saturating_add(blocks);
        state.height
    }

    /// Advance the simulated time by the given duration
    pub fn advance(&self, duration: Duration) -> SimulatedTimestamp {
        let mut state = self.state.lock();
        state.time = state.time.add_duration(duration);
        state.time
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new(GENESIS_HEIGHT, SimulatedTimestamp::from_secs(GENESIS_TIME))
    }
}
