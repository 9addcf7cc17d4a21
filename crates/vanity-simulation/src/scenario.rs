//! Purpose: Defines the TOML scenario format driven by the scenario runner.
//!
//! ```toml
//! name = "register and sweep"
//!
//! [registry]
//! lock_duration = 86400
//! lock_amount = "0.01 ether"
//! block_freeze = 5
//! fee_amount = "0.0005 ether"
//! fee_recipient = "treasury"
//!
//! [[accounts]]
//! name = "alice"
//! balance = "1 ether"
//!
//! [[steps]]
//! action = "commit"
//! account = "alice"
//! name = "hello"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use vanity_registry::units::serde_wei;
use vanity_registry::Wei;

use crate::error::{SimulationError, SimulationResult};

//-----------------------------------------------------------------------------
// Scenario Definition
//-----------------------------------------------------------------------------

/// A scripted sequence of registry interactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub registry: RegistrySection,
    #[serde(default)]
    pub chain: ChainSection,
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Registry parameters. `fee_recipient` is an account label or a `0x` address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySection {
    pub lock_duration: u64,
    #[serde(with = "serde_wei")]
    pub lock_amount: Wei,
    pub block_freeze: u64,
    #[serde(with = "serde_wei")]
    pub fee_amount: Wei,
    pub fee_recipient: String,
}

/// Starting point and block production of the simulated chain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainSection {
    #[serde(default)]
    pub start_height: Option<u64>,
    #[serde(default)]
    pub start_time: Option<u64>,
    /// Mine a block for every top-level registry call
    #[serde(default)]
    pub automine: bool,
}

/// A participant and its starting balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSpec {
    pub name: String,
    #[serde(default, with = "serde_wei")]
    pub balance: Wei,
    /// Install a hook that rejects every payment to this account
    #[serde(default)]
    pub rejects_funds: bool,
}

/// One scenario step.
///
/// Registry steps take an optional `expect`: `"ok"` (the default) or an error
/// code such as `"REGISTRY_TOO_EARLY"`. The `REGISTRY_` prefix and case are
/// optional. Amounts are strings like `"0.0105 ether"`; a missing `value`
/// pays the exact cost of the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Commit {
        account: String,
        name: String,
        /// Commit the digest of another account's claim instead of our own
        #[serde(default)]
        claimant: Option<String>,
        #[serde(default)]
        expect: Option<String>,
    },
    Mine {
        blocks: u64,
    },
    Advance {
        seconds: u64,
    },
    Register {
        account: String,
        name: String,
        /// Account whose key signs the reveal, defaults to `account`
        #[serde(default)]
        signer: Option<String>,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        expect: Option<String>,
    },
    Renew {
        account: String,
        name: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        expect: Option<String>,
    },
    Unlock {
        account: String,
        /// Number of records the sweep must remove
        #[serde(default)]
        swept: Option<usize>,
        #[serde(default)]
        expect: Option<String>,
    },
    ExpectBalance {
        account: String,
        balance: String,
    },
    ExpectOwner {
        name: String,
        /// Owning account label, or absent for an unregistered name
        #[serde(default)]
        owner: Option<String>,
    },
    ExpectNames {
        count: usize,
    },
    ExpectCommits {
        count: usize,
    },
}

impl Step {
    /// The `action` tag of this step
    pub fn action(&self) -> &'static str {
        match self {
            Step::Commit { .. } => "commit",
            Step::Mine { .. } => "mine",
            Step::Advance { .. } => "advance",
            Step::Register { .. } => "register",
            Step::Renew { .. } => "renew",
            Step::Unlock { .. } => "unlock",
            Step::ExpectBalance { .. } => "expect_balance",
            Step::ExpectOwner { .. } => "expect_owner",
            Step::ExpectNames { .. } => "expect_names",
            Step::ExpectCommits { .. } => "expect_commits",
        }
    }

    /// Declared outcome for registry steps
    pub fn expectation(&self) -> Option<&str> {
        match self {
            Step::Commit { expect, .. }
            | Step::Register { expect, .. }
            | Step::Renew { expect, .. }
            | Step::Unlock { expect, .. } => Some(expect.as_deref().unwrap_or(EXPECT_OK)),
            _ => None,
        }
    }
}

/// Expectation for a step that must succeed
pub const EXPECT_OK: &str = "ok";

/// Whether an `expect` string names the given outcome code
pub fn expectation_matches(expected: &str, actual: &str) -> bool {
    let normalize = |code: &str| {
        let upper = code.trim().to_ascii_uppercase();
        match upper.strip_prefix("REGISTRY_") {
            Some(rest) => rest.to_string(),
            None => upper,
        }
    };
    normalize(expected) == normalize(actual)
}

impl Scenario {
    /// Parse a scenario from TOML
    pub fn from_toml_str(source: &str) -> SimulationResult<Self> {
        let scenario: Scenario = toml::from_str(source)?;
        scenario.check_labels()?;
        Ok(scenario)
    }

    /// Load a scenario file
    pub fn from_file(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SimulationError::FileIo(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    fn check_labels(&self) -> SimulationResult<()> {
        let mut seen = std::collections::HashSet::new();
        for account in &self.accounts {
            if account.name.trim().is_empty() {
                return Err(SimulationError::Configuration("account name must not be empty".to_string()));
            }
            if !seen.insert(account.name.as_str()) {
                return Err(SimulationError::Configuration(format!(
                    "account '{}' declared twice",
                    account.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
name = "basic"

[registry]
lock_duration = 86400
lock_amount = "0.01 ether"
block_freeze = 5
fee_amount = "0.0005 ether"
fee_recipient = "treasury"

[[accounts]]
name = "alice"
balance = "1 ether"

[[accounts]]
name = "treasury"

[[steps]]
action = "commit"
account = "alice"
name = "hello"

[[steps]]
action = "mine"
blocks = 6

[[steps]]
action = "register"
account = "alice"
name = "hello"
value = "0.0105 ether"
expect = "too_early"
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(SOURCE).unwrap();
        assert_eq!(scenario.name, "basic");
        assert_eq!(scenario.registry.lock_amount, 10_000_000_000_000_000);
        assert!(!scenario.chain.automine);
        assert_eq!(scenario.chain.start_height, None);
        assert_eq!(scenario.accounts.len(), 2);
        assert_eq!(scenario.accounts[1].balance, 0);
        assert!(!scenario.accounts[0].rejects_funds);
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[0].action(), "commit");
        assert_eq!(scenario.steps[0].expectation(), Some(EXPECT_OK));
        assert!(matches!(scenario.steps[1], Step::Mine { blocks: 6 }));
        assert_eq!(scenario.steps[2].expectation(), Some("too_early"));
        assert_eq!(scenario.steps[1].expectation(), None);
    }

    #[test]
    fn test_duplicate_accounts_rejected() {
        let source = SOURCE.replace("name = \"treasury\"", "name = \"alice\"");
        assert!(matches!(
            Scenario::from_toml_str(&source),
            Err(SimulationError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let source = format!("{}\n[[steps]]\naction = \"transfer\"\n", SOURCE);
        assert!(matches!(
            Scenario::from_toml_str(&source),
            Err(SimulationError::Serialization(_))
        ));
    }

    #[test]
    fn test_expectation_matches() {
        assert!(expectation_matches("ok", "OK"));
        assert!(expectation_matches("too_early", "REGISTRY_TOO_EARLY"));
        assert!(expectation_matches("REGISTRY_REENTRANT_CALL", "REGISTRY_REENTRANT_CALL"));
        assert!(!expectation_matches("expired", "REGISTRY_NOT_OWNER"));
    }
}
