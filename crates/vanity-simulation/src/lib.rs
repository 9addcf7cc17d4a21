//! Vanity registry simulation
//!
//! A deterministic in-memory chain for driving a `NameRegistry`: native
//! balances with per-call revert, independent block and time clocks, receive
//! hooks for hostile recipients and a TOML scenario runner.

pub mod accounts;
pub mod chain;
pub mod cli;
pub mod clock;
pub mod error;
pub mod hooks;
pub mod runner;
pub mod scenario;
pub mod telemetry;

pub use accounts::Account;
pub use chain::SimulatedChain;
pub use clock::{SimulatedClock, SimulatedTimestamp};
pub use error::{SimulationError, SimulationResult};
pub use hooks::{ReceiveHook, ReenterRegistry, ReentryAction, ReentryOutcome, RejectFunds};
pub use runner::{ScenarioReport, ScenarioRunner, StepOutcome};
pub use scenario::{Scenario, Step};
