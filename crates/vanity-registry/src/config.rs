//! Configuration for a registry instance
//!
//! The five parameters are fixed at construction. They can be built in code
//! or loaded from TOML:
//!
//! ```toml
//! lock_duration = 86400
//! lock_amount = "0.01 ether"
//! block_freeze = 5
//! fee_amount = "0.0005 ether"
//! fee_recipient = "0x00000000000000000000000000000000000000fe"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use vanity_crypto::Address;
use vanity_error::{ensure, RegistryError, RegistryResult};

use crate::types::Wei;
use crate::units::{serde_wei, WEI_PER_ETHER};

/// Fixed registry parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Seconds a registration stays locked after registering or renewing
    pub lock_duration: u64,
    /// Deposit held per active record
    #[serde(with = "serde_wei")]
    pub lock_amount: Wei,
    /// Blocks that must pass after a commitment before it can be revealed
    pub block_freeze: u64,
    /// Protocol fee charged on register and renew
    #[serde(with = "serde_wei")]
    pub fee_amount: Wei,
    /// Receiver of protocol fees
    pub fee_recipient: Address,
}

impl RegistryConfig {
    pub fn new(
        lock_duration: u64,
        lock_amount: Wei,
        block_freeze: u64,
        fee_amount: Wei,
        fee_recipient: Address,
    ) -> Self {
        Self {
            lock_duration,
            lock_amount,
            block_freeze,
            fee_amount,
            fee_recipient,
        }
    }

    /// Start from one-day locks of 0.01 ether, a 5 block freeze and a
    /// 0.0005 ether fee. The fee recipient has no default.
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::default()
    }

    /// Check every parameter is set
    pub fn validate(&self) -> RegistryResult<()> {
        ensure!(self.lock_duration > 0, RegistryError::invalid_input("lock_duration must be non-zero"));
        ensure!(self.lock_amount > 0, RegistryError::invalid_input("lock_amount must be non-zero"));
        ensure!(self.block_freeze > 0, RegistryError::invalid_input("block_freeze must be non-zero"));
        ensure!(self.fee_amount > 0, RegistryError::invalid_input("fee_amount must be non-zero"));
        ensure!(
            !self.fee_recipient.is_zero(),
            RegistryError::invalid_input("fee_recipient must not be the zero address")
        );
        ensure!(
            self.lock_amount.checked_add(self.fee_amount).is_some(),
            RegistryError::invalid_input("lock_amount + fee_amount overflows")
        );
        Ok(())
    }

    /// Minimum payment attached to `register`
    pub fn registration_cost(&self) -> Wei {
        self.lock_amount.saturating_add(self.fee_amount)
    }

    /// Minimum payment attached to `renew`
    pub fn renewal_cost(&self) -> Wei {
        self.fee_amount
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> RegistryResult<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| RegistryError::invalid_input(format!("config parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::invalid_input(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> RegistryResult<String> {
        toml::to_string(self)
            .map_err(|e| RegistryError::invalid_input(format!("config serialize error: {}", e)))
    }
}

/// Incremental construction of a `RegistryConfig`
#[derive(Debug, Clone)]
pub struct RegistryConfigBuilder {
    config: RegistryConfig,
}

impl Default for RegistryConfigBuilder {
    fn default() -> Self {
        Self {
            config: RegistryConfig::new(
                86_400,
                WEI_PER_ETHER / 100,
                5,
                WEI_PER_ETHER / 2_000,
                Address::ZERO,
            ),
        }
    }
}

impl RegistryConfigBuilder {
    pub fn lock_duration(mut self, secs: u64) -> Self {
        self.config.lock_duration = secs;
        self
    }

    pub fn lock_amount(mut self, amount: Wei) -> Self {
        self.config.lock_amount = amount;
        self
    }

    pub fn block_freeze(mut self, blocks: u64) -> Self {
        self.config.block_freeze = blocks;
        self
    }

    pub fn fee_amount(mut self, amount: Wei) -> Self {
        self.config.fee_amount = amount;
        self
    }

    pub fn fee_recipient(mut self, recipient: Address) -> Self {
        self.config.fee_recipient = recipient;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> RegistryResult<RegistryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
