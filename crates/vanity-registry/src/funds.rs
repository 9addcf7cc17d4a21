//! Fund routing
//!
//! Paid operations send the protocol fee, keep any deposit in custody and
//! refund the overpayment. Sweeps return deposits. Every transfer rejection
//! maps to its own error so the caller sees which leg failed.

use tracing::{debug, warn};
use vanity_crypto::Address;
use vanity_error::{RegistryError, RegistryResult};

use crate::config::RegistryConfig;
use crate::env::ExecutionEnv;
use crate::types::{CallContext, Wei};

/// How a payment was split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settlement {
    /// Sent to the fee recipient
    pub fee: Wei,
    /// Kept in custody as a deposit
    pub retained: Wei,
    /// Returned to the caller
    pub refund: Wei,
}

pub struct FundRouter<'a> {
    config: &'a RegistryConfig,
}

impl<'a> FundRouter<'a> {
    pub fn new(config: &'a RegistryConfig) -> Self {
        Self { config }
    }

    /// Fail unless the attached payment covers `required`; returns the excess
    pub fn check_payment(&self, ctx: &CallContext, required: Wei) -> RegistryResult<Wei> {
        ctx.value
            .checked_sub(required)
            .ok_or(RegistryError::InsufficientPayment {
                required,
                provided: ctx.value,
            })
    }

    /// Send the fee, then refund anything above `required`.
    ///
    /// `required` includes the fee; the remainder of `required` stays in
    /// custody.
    pub fn settle(
        &self,
        env: &dyn ExecutionEnv,
        ctx: &CallContext,
        required: Wei,
    ) -> RegistryResult<Settlement> {
        let refund = self.check_payment(ctx, required)?;
        let fee = self.config.fee_amount;

        env.transfer(self.config.fee_recipient, fee).map_err(|e| {
            warn!("Fee transfer rejected: {}", e);
            RegistryError::FeeTransferFailed(e.to_string())
        })?;

        if refund > 0 {
            env.transfer(ctx.sender, refund).map_err(|e| {
                warn!("Refund rejected: {}", e);
                RegistryError::RefundFailed(e.to_string())
            })?;
        }

        let settlement = Settlement {
            fee,
            retained: required.saturating_sub(fee),
            refund,
        };
        debug!(?settlement, sender = %ctx.sender, "payment settled");
        Ok(settlement)
    }

    /// Return one deposit to a previous owner
    pub fn return_deposit(&self, env: &dyn ExecutionEnv, owner: Address) -> RegistryResult<()> {
        env.transfer(owner, self.config.lock_amount).map_err(|e| {
            warn!("Deposit return rejected: {}", e);
            RegistryError::UnlockTransferFailed {
                owner: owner.to_string(),
                reason: e.reason,
            }
        })
    }
}
