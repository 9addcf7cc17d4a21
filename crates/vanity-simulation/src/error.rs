//! Error types for the simulation crate
//!
//! Registry rejections pass through unchanged so callers can match on the
//! exact `RegistryError` a simulated call produced.

//-----------------------------------------------------------------------------
// Error Types
//-----------------------------------------------------------------------------

use alloy::primitives::Address;
use thiserror::Error;
use vanity_error::RegistryError;
use vanity_registry::Wei;

/// Main error type for the simulation crate.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents an error during simulation setup or configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A scenario referred to an account label it never declared.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// The caller cannot cover the value attached to a call.
    #[error("Insufficient balance: {account} holds {balance} wei, call needs {required} wei")]
    InsufficientBalance {
        account: Address,
        balance: Wei,
        required: Wei,
    },

    /// The registry rejected the call.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A scenario step produced a different outcome than it declared.
    #[error("Step {step} ({action}): expected {expected}, got {actual}")]
    ExpectationFailed {
        step: usize,
        action: String,
        expected: String,
        actual: String,
    },

    /// Producing a claim signature failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Represents a file I/O error.
    #[error("File I/O error: {0}")]
    FileIo(String),

    /// Represents a serialization/deserialization error.
    #[error("Serialization/Deserialization error: {0}")]
    Serialization(String),
}

impl SimulationError {
    /// The registry rejection behind this error, if any
    pub fn registry_error(&self) -> Option<&RegistryError> {
        match self {
            SimulationError::Registry(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

impl From<std::io::Error> for SimulationError {
    fn from(err: std::io::Error) -> Self {
        SimulationError::FileIo(err.to_string())
    }
}

impl From<toml::de::Error> for SimulationError {
    fn from(err: toml::de::Error) -> Self {
        SimulationError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        SimulationError::Serialization(err.to_string())
    }
}
