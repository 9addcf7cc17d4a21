//! Scenario runner
//!
//! Builds a registry, a simulated chain and the declared accounts from a
//! `Scenario`, executes its steps in order and reports what happened. A step
//! whose outcome differs from its declared expectation stops the run.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use vanity_crypto::Address;
use vanity_error::{ErrorMessage, VanityError};
use vanity_registry::units::{format_ether, parse_amount};
use vanity_registry::{NameRecord, NameRegistry, RegistryConfig, RegistryEvent, Wei};

use crate::accounts::Account;
use crate::chain::SimulatedChain;
use crate::clock::{SimulatedClock, SimulatedTimestamp, GENESIS_HEIGHT, GENESIS_TIME};
use crate::error::{SimulationError, SimulationResult};
use crate::hooks::RejectFunds;
use crate::scenario::{expectation_matches, Scenario, Step, EXPECT_OK};

/// Label of the account holding registry custody
pub const CUSTODY_LABEL: &str = "registry";

//-----------------------------------------------------------------------------
// Reports
//-----------------------------------------------------------------------------

/// Result of one executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub action: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorMessage>,
}

/// Final state after a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub steps: Vec<StepOutcome>,
    pub names: Vec<NameRecord>,
    pub pending_commits: usize,
    /// Ether balances by account label
    pub balances: BTreeMap<String, String>,
    pub custody: String,
    pub events: Vec<RegistryEvent>,
}

//-----------------------------------------------------------------------------
// Runner
//-----------------------------------------------------------------------------

/// Executes a scenario against a fresh registry
pub struct ScenarioRunner {
    scenario: Scenario,
    chain: SimulatedChain,
    registry: Arc<NameRegistry>,
    accounts: BTreeMap<String, Account>,
}

impl ScenarioRunner {
    pub fn new(scenario: Scenario) -> SimulationResult<Self> {
        let mut accounts = BTreeMap::new();
        for spec in &scenario.accounts {
            if spec.name == CUSTODY_LABEL {
                return Err(SimulationError::Configuration(format!(
                    "account label '{}' is reserved for registry custody",
                    CUSTODY_LABEL
                )));
            }
            accounts.insert(spec.name.clone(), Account::from_label(&spec.name)?);
        }

        let section = &scenario.registry;
        let fee_recipient = resolve_address(&accounts, &section.fee_recipient)?;
        let config = RegistryConfig::new(
            section.lock_duration,
            section.lock_amount,
            section.block_freeze,
            section.fee_amount,
            fee_recipient,
        );
        let registry = Arc::new(NameRegistry::new(config)?);

        let custody = Account::from_label(CUSTODY_LABEL)?.address();
        let clock = SimulatedClock::new(
            scenario.chain.start_height.unwrap_or(GENESIS_HEIGHT),
            SimulatedTimestamp::from_secs(scenario.chain.start_time.unwrap_or(GENESIS_TIME)),
        );
        let chain = SimulatedChain::with_clock(custody, clock);
        chain.set_automine(scenario.chain.automine);
        for spec in &scenario.accounts {
            let address = accounts
                .get(&spec.name)
                .map(Account::address)
                .ok_or_else(|| SimulationError::UnknownAccount(spec.name.clone()))?;
            chain.fund(address, spec.balance);
            if spec.rejects_funds {
                chain.set_hook(address, Arc::new(RejectFunds));
            }
        }

        Ok(Self {
            scenario,
            chain,
            registry,
            accounts,
        })
    }

    pub fn chain(&self) -> &SimulatedChain {
        &self.chain
    }

    pub fn registry(&self) -> &Arc<NameRegistry> {
        &self.registry
    }

    pub fn account(&self, label: &str) -> SimulationResult<&Account> {
        self.accounts
            .get(label)
            .ok_or_else(|| SimulationError::UnknownAccount(label.to_string()))
    }

    /// Run every step, stopping at the first unmet expectation
    pub fn run(&self) -> SimulationResult<ScenarioReport> {
        let span = info_span!("scenario", name = %self.scenario.name);
        let _enter = span.enter();
        info!(steps = self.scenario.steps.len(), "running scenario");

        let mut outcomes = Vec::with_capacity(self.scenario.steps.len());
        for (index, step) in self.scenario.steps.iter().enumerate() {
            let outcome = self.execute(index, step)?;
            debug!(index, action = step.action(), succeeded = outcome.succeeded, "step finished");
            outcomes.push(outcome);
        }

        info!(names = self.registry.total_names(), "scenario complete");
        Ok(self.report(outcomes))
    }

    fn execute(&self, index: usize, step: &Step) -> SimulationResult<StepOutcome> {
        let result = match step {
            Step::Mine { blocks } => Ok(format!("height {}", self.chain.mine(*blocks))),
            Step::Advance { seconds } => Ok(format!("time {}", self.chain.advance(*seconds))),
            Step::Commit { account, name, claimant, .. } => self.commit(account, name, claimant.as_deref()),
            Step::Register { account, name, signer, value, .. } => {
                self.register(account, name, signer.as_deref(), value.as_deref())
            }
            Step::Renew { account, name, value, .. } => self.renew(account, name, value.as_deref()),
            Step::Unlock { account, swept, .. } => self.unlock(index, account, *swept),
            Step::ExpectBalance { account, balance } => return self.expect_balance(index, account, balance),
            Step::ExpectOwner { name, owner } => return self.expect_owner(index, name, owner.as_deref()),
            Step::ExpectNames { count } => {
                return self.expect_count(index, step.action(), *count, self.registry.total_names())
            }
            Step::ExpectCommits { count } => {
                return self.expect_count(index, step.action(), *count, self.registry.total_commits())
            }
        };

        let expected = step.expectation().unwrap_or(EXPECT_OK);
        match result {
            Ok(detail) => {
                if !expectation_matches(expected, EXPECT_OK) {
                    return Err(mismatch(index, step.action(), expected, EXPECT_OK));
                }
                Ok(StepOutcome {
                    index,
                    action: step.action().to_string(),
                    succeeded: true,
                    detail: Some(detail),
                    error: None,
                })
            }
            Err(SimulationError::Registry(err)) => {
                if err.is_transfer_failure() {
                    warn!(index, action = step.action(), error = %err, "payment rejected by recipient");
                }
                if !expectation_matches(expected, err.error_code()) {
                    return Err(mismatch(index, step.action(), expected, err.error_code()));
                }
                Ok(StepOutcome {
                    index,
                    action: step.action().to_string(),
                    succeeded: false,
                    detail: None,
                    error: Some(ErrorMessage::from_error(&err)),
                })
            }
            Err(other) => Err(other),
        }
    }

    fn commit(&self, label: &str, name: &str, claimant: Option<&str>) -> SimulationResult<String> {
        let sender = self.account(label)?;
        let name_hash = self.account(claimant.unwrap_or(label))?.name_hash(name);
        let registry = &self.registry;
        self.chain
            .call(sender.address(), 0, |env, ctx| registry.commit(env, ctx, name_hash))?;
        Ok(format!("committed {}", name_hash))
    }

    fn register(
        &self,
        label: &str,
        name: &str,
        signer: Option<&str>,
        value: Option<&str>,
    ) -> SimulationResult<String> {
        let sender = self.account(label)?;
        let signature = self.account(signer.unwrap_or(label))?.sign_claim(&sender.name_hash(name))?;
        let value = self.amount(value, self.registry.config().registration_cost())?;
        let registry = &self.registry;
        let record = self.chain.call(sender.address(), value, |env, ctx| {
            registry.register(env, ctx, name, signature.data())
        })?;
        Ok(format!("registered '{}' until {}", record.name, record.expires_at(registry.config().lock_duration)))
    }

    fn renew(&self, label: &str, name: &str, value: Option<&str>) -> SimulationResult<String> {
        let sender = self.account(label)?;
        let value = self.amount(value, self.registry.config().renewal_cost())?;
        let registry = &self.registry;
        let record = self
            .chain
            .call(sender.address(), value, |env, ctx| registry.renew(env, ctx, name))?;
        Ok(format!("renewed '{}' until {}", record.name, record.expires_at(registry.config().lock_duration)))
    }

    fn unlock(&self, index: usize, label: &str, expected: Option<usize>) -> SimulationResult<String> {
        let sender = self.account(label)?;
        let registry = &self.registry;
        let swept = self.chain.call(sender.address(), 0, |env, ctx| registry.unlock(env, ctx))?;
        if let Some(expected) = expected {
            if swept.len() != expected {
                return Err(mismatch(
                    index,
                    "unlock",
                    &format!("{} swept", expected),
                    &format!("{} swept", swept.len()),
                ));
            }
        }
        Ok(format!("swept {} name(s)", swept.len()))
    }

    fn expect_balance(&self, index: usize, label: &str, balance: &str) -> SimulationResult<StepOutcome> {
        let expected = parse_step_amount(balance)?;
        let address = if label == CUSTODY_LABEL {
            self.chain.custody()
        } else {
            self.account(label)?.address()
        };
        let actual = self.chain.balance_of(&address);
        if actual != expected {
            return Err(mismatch(index, "expect_balance", &format!("{} wei", expected), &format!("{} wei", actual)));
        }
        Ok(passed(index, "expect_balance", format!("{} holds {} ether", label, format_ether(actual))))
    }

    fn expect_owner(&self, index: usize, name: &str, owner: Option<&str>) -> SimulationResult<StepOutcome> {
        let expected = owner.map(|label| self.account(label).map(Account::address)).transpose()?;
        let actual = self.registry.record(name).map(|record| record.owner);
        if actual != expected {
            let show = |a: Option<Address>| a.map_or_else(|| "unregistered".to_string(), |a| a.to_string());
            return Err(mismatch(index, "expect_owner", &show(expected), &show(actual)));
        }
        Ok(passed(index, "expect_owner", format!("'{}' owner checked", name)))
    }

    fn expect_count(&self, index: usize, action: &str, expected: usize, actual: usize) -> SimulationResult<StepOutcome> {
        if expected != actual {
            return Err(mismatch(index, action, &expected.to_string(), &actual.to_string()));
        }
        Ok(passed(index, action, format!("count {}", actual)))
    }

    fn amount(&self, value: Option<&str>, default: Wei) -> SimulationResult<Wei> {
        match value {
            Some(text) => parse_step_amount(text),
            None => Ok(default),
        }
    }

    fn report(&self, steps: Vec<StepOutcome>) -> ScenarioReport {
        let balances = self
            .accounts
            .iter()
            .map(|(label, account)| (label.clone(), format_ether(self.chain.balance_of(&account.address()))))
            .collect();
        ScenarioReport {
            scenario: self.scenario.name.clone(),
            steps,
            names: self.registry.records(),
            pending_commits: self.registry.total_commits(),
            balances,
            custody: format_ether(self.chain.custody_balance()),
            events: self.registry.events(),
        }
    }
}

fn resolve_address(accounts: &BTreeMap<String, Account>, label: &str) -> SimulationResult<Address> {
    if label.starts_with("0x") {
        return Address::from_str(label)
            .map_err(|e| SimulationError::Configuration(format!("invalid address '{}': {}", label, e)));
    }
    accounts
        .get(label)
        .map(Account::address)
        .ok_or_else(|| SimulationError::UnknownAccount(label.to_string()))
}

/// Amounts in steps are scenario input, so a malformed one is a
/// configuration error rather than a registry rejection
fn parse_step_amount(text: &str) -> SimulationResult<Wei> {
    parse_amount(text).map_err(|e| SimulationError::Configuration(e.to_string()))
}

fn passed(index: usize, action: &str, detail: String) -> StepOutcome {
    StepOutcome {
        index,
        action: action.to_string(),
        succeeded: true,
        detail: Some(detail),
        error: None,
    }
}

fn mismatch(step: usize, action: &str, expected: &str, actual: &str) -> SimulationError {
    SimulationError::ExpectationFailed {
        step,
        action: action.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
