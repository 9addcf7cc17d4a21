//! Vanity Registry Error Handling
//! Central location for error types, traits, and handling utilities

use std::fmt;

// Re-export common error handling tools for convenience
pub use thiserror;

mod macros;
mod registry;

pub use registry::{codes, RegistryError, RegistryResult};

/// Error domains representing the components that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorDomain {
    Input, Commitment, Ledger, Timing, Identity, Funds, Execution,
}
impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Input => write!(f, "input"),
            ErrorDomain::Commitment => write!(f, "commitment"),
            ErrorDomain::Ledger => write!(f, "ledger"),
            ErrorDomain::Timing => write!(f, "timing"),
            ErrorDomain::Identity => write!(f, "identity"),
            ErrorDomain::Funds => write!(f, "funds"),
            ErrorDomain::Execution => write!(f, "execution"),
        }
    }
}

/// Error code structure for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ErrorCode(pub u32);
impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Standard error message format for serialization
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorMessage {
    pub code: ErrorCode,
    pub domain: ErrorDomain,
    pub message: String,
    #[serde(default)]
    pub transient: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorMessage {
    /// Build a serializable message from any registry-aware error
    pub fn from_error<E: VanityError + ?Sized>(err: &E) -> Self {
        Self {
            code: err.code(),
            domain: err.domain(),
            message: err.to_string(),
            transient: err.is_transient(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Base trait for all errors raised by the registry.
pub trait VanityError: std::error::Error + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Returns a unique static string code for this error type.
    fn error_code(&self) -> &'static str;

    /// Numeric code, stable across releases.
    fn code(&self) -> ErrorCode;

    /// Component the failure originated from.
    fn domain(&self) -> ErrorDomain;

    /// Whether the same call may succeed if retried later.
    fn is_transient(&self) -> bool { false }
}
