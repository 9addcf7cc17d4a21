//! Registry error types
//! Every failure aborts the triggering operation; none are retried internally.

use thiserror::Error;
use crate::{ErrorCode, ErrorDomain, VanityError};

/// Registry error codes
pub mod codes {
    use crate::ErrorCode;

    // Registry error codes start with 5000
    pub const INVALID_INPUT: ErrorCode = ErrorCode(5001);
    pub const NOT_COMMITTED: ErrorCode = ErrorCode(5002);
    pub const NAME_NOT_FOUND: ErrorCode = ErrorCode(5003);
    pub const TOO_EARLY: ErrorCode = ErrorCode(5004);
    pub const EXPIRED: ErrorCode = ErrorCode(5005);
    pub const INVALID_SIGNATURE: ErrorCode = ErrorCode(5006);
    pub const ALREADY_REGISTERED: ErrorCode = ErrorCode(5007);
    pub const NOT_OWNER: ErrorCode = ErrorCode(5008);
    pub const INSUFFICIENT_PAYMENT: ErrorCode = ErrorCode(5009);
    pub const FEE_TRANSFER_FAILED: ErrorCode = ErrorCode(5010);
    pub const REFUND_FAILED: ErrorCode = ErrorCode(5011);
    pub const UNLOCK_TRANSFER_FAILED: ErrorCode = ErrorCode(5012);
    pub const REENTRANT_CALL: ErrorCode = ErrorCode(5013);
}

/// Registry error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed hash, name, address or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No pending commitment matches the revealed name
    #[error("No commitment found for hash {0}")]
    NotCommitted(String),

    /// No active record for the name
    #[error("Name not found: {0}")]
    NameNotFound(String),

    /// Freeze window has not elapsed
    #[error("Commitment made at block {committed_at} is not mature at block {current} (freeze {block_freeze})")]
    TooEarly {
        committed_at: u64,
        current: u64,
        block_freeze: u64,
    },

    /// Registration lock has run out
    #[error("Registration expired at {expires_at} (now {now})")]
    Expired {
        expires_at: u64,
        now: u64,
    },

    /// Recovered signer does not match the caller
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Name already has an active record
    #[error("Name already registered: {0}")]
    AlreadyRegistered(String),

    /// Caller does not own the record
    #[error("{caller} does not own {name}")]
    NotOwner {
        name: String,
        caller: String,
    },

    /// Attached payment below the required minimum
    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        required: u128,
        provided: u128,
    },

    /// Fee recipient rejected the protocol fee
    #[error("Fee transfer failed: {0}")]
    FeeTransferFailed(String),

    /// Caller rejected the overpayment refund
    #[error("Refund failed: {0}")]
    RefundFailed(String),

    /// Previous owner rejected the returned deposit
    #[error("Deposit return to {owner} failed: {reason}")]
    UnlockTransferFailed {
        owner: String,
        reason: String,
    },

    /// A guarded operation was entered while another one was active
    #[error("Reentrant call rejected")]
    ReentrantCall,
}

impl VanityError for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::InvalidInput(_) => "REGISTRY_INVALID_INPUT",
            RegistryError::NotCommitted(_) => "REGISTRY_NOT_COMMITTED",
            RegistryError::NameNotFound(_) => "REGISTRY_NAME_NOT_FOUND",
            RegistryError::TooEarly { .. } => "REGISTRY_TOO_EARLY",
            RegistryError::Expired { .. } => "REGISTRY_EXPIRED",
            RegistryError::InvalidSignature(_) => "REGISTRY_INVALID_SIGNATURE",
            RegistryError::AlreadyRegistered(_) => "REGISTRY_ALREADY_REGISTERED",
            RegistryError::NotOwner { .. } => "REGISTRY_NOT_OWNER",
            RegistryError::InsufficientPayment { .. } => "REGISTRY_INSUFFICIENT_PAYMENT",
            RegistryError::FeeTransferFailed(_) => "REGISTRY_FEE_TRANSFER_FAILED",
            RegistryError::RefundFailed(_) => "REGISTRY_REFUND_FAILED",
            RegistryError::UnlockTransferFailed { .. } => "REGISTRY_UNLOCK_TRANSFER_FAILED",
            RegistryError::ReentrantCall => "REGISTRY_REENTRANT_CALL",
        }
    }

    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            RegistryError::InvalidInput(_) => INVALID_INPUT,
            RegistryError::NotCommitted(_) => NOT_COMMITTED,
            RegistryError::NameNotFound(_) => NAME_NOT_FOUND,
            RegistryError::TooEarly { .. } => TOO_EARLY,
            RegistryError::Expired { .. } => EXPIRED,
            RegistryError::InvalidSignature(_) => INVALID_SIGNATURE,
            RegistryError::AlreadyRegistered(_) => ALREADY_REGISTERED,
            RegistryError::NotOwner { .. } => NOT_OWNER,
            RegistryError::InsufficientPayment { .. } => INSUFFICIENT_PAYMENT,
            RegistryError::FeeTransferFailed(_) => FEE_TRANSFER_FAILED,
            RegistryError::RefundFailed(_) => REFUND_FAILED,
            RegistryError::UnlockTransferFailed { .. } => UNLOCK_TRANSFER_FAILED,
            RegistryError::ReentrantCall => REENTRANT_CALL,
        }
    }

    fn domain(&self) -> ErrorDomain {
        match self {
            RegistryError::InvalidInput(_) => ErrorDomain::Input,
            RegistryError::NotCommitted(_) => ErrorDomain::Commitment,
            RegistryError::NameNotFound(_) | RegistryError::AlreadyRegistered(_) => ErrorDomain::Ledger,
            RegistryError::TooEarly { .. } | RegistryError::Expired { .. } => ErrorDomain::Timing,
            RegistryError::InvalidSignature(_) | RegistryError::NotOwner { .. } => ErrorDomain::Identity,
            RegistryError::InsufficientPayment { .. }
            | RegistryError::FeeTransferFailed(_)
            | RegistryError::RefundFailed(_)
            | RegistryError::UnlockTransferFailed { .. } => ErrorDomain::Funds,
            RegistryError::ReentrantCall => ErrorDomain::Execution,
        }
    }

    /// Retrying the same call later can succeed without changing its inputs.
    fn is_transient(&self) -> bool {
        matches!(self, RegistryError::TooEarly { .. } | RegistryError::ReentrantCall)
    }
}

/// Convenient Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

// Helper methods for creating registry errors
impl RegistryError {
    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        RegistryError::InvalidInput(message.into())
    }

    /// Create a new invalid signature error
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        RegistryError::InvalidSignature(message.into())
    }

    /// True for failures caused by an outbound transfer being rejected
    pub fn is_transfer_failure(&self) -> bool {
        matches!(
            self,
            RegistryError::FeeTransferFailed(_)
                | RegistryError::RefundFailed(_)
                | RegistryError::UnlockTransferFailed { .. }
        )
    }
}
