//! Shared harness for simulation integration tests
#![allow(dead_code)]

use std::sync::Arc;

use vanity_registry::units::WEI_PER_ETHER;
use vanity_registry::{NameRecord, NameRegistry, RegistryConfig, Wei};
use vanity_simulation::{Account, SimulatedChain, SimulationResult};

pub const LOCK: Wei = WEI_PER_ETHER / 100;
pub const FEE: Wei = WEI_PER_ETHER / 2_000;
pub const DURATION: u64 = 86_400;
pub const FREEZE: u64 = 5;

pub struct Harness {
    pub chain: SimulatedChain,
    pub registry: Arc<NameRegistry>,
    pub treasury: Account,
}

impl Harness {
    /// One-day locks of 0.01 ether, 5 block freeze, 0.0005 ether fee
    pub fn new() -> Self {
        let treasury = Account::from_label("treasury").unwrap();
        let config = RegistryConfig::builder()
            .fee_recipient(treasury.address())
            .build()
            .unwrap();
        let registry = Arc::new(NameRegistry::new(config).unwrap());
        let chain = SimulatedChain::new(Account::from_label("registry").unwrap().address());
        Self {
            chain,
            registry,
            treasury,
        }
    }

    pub fn account(&self, label: &str, balance: Wei) -> Account {
        let account = Account::from_label(label).unwrap();
        self.chain.fund(account.address(), balance);
        account
    }

    pub fn balance(&self, account: &Account) -> Wei {
        self.chain.balance_of(&account.address())
    }

    pub fn commit(&self, account: &Account, name: &str) -> SimulationResult<()> {
        let name_hash = account.name_hash(name);
        let registry = &self.registry;
        self.chain
            .call(account.address(), 0, |env, ctx| registry.commit(env, ctx, name_hash))
    }

    pub fn register(&self, account: &Account, name: &str, value: Wei) -> SimulationResult<NameRecord> {
        let signature = account.sign_claim(&account.name_hash(name))?;
        let registry = &self.registry;
        self.chain.call(account.address(), value, |env, ctx| {
            registry.register(env, ctx, name, signature.data())
        })
    }

    pub fn renew(&self, account: &Account, name: &str, value: Wei) -> SimulationResult<NameRecord> {
        let registry = &self.registry;
        self.chain
            .call(account.address(), value, |env, ctx| registry.renew(env, ctx, name))
    }

    pub fn unlock(&self, account: &Account) -> SimulationResult<Vec<NameRecord>> {
        let registry = &self.registry;
        self.chain
            .call(account.address(), 0, |env, ctx| registry.unlock(env, ctx))
    }

    /// Commit, wait out the freeze and register at the exact cost
    pub fn claim(&self, account: &Account, name: &str) -> NameRecord {
        self.commit(account, name).unwrap();
        self.chain.mine(FREEZE + 1);
        self.register(account, name, LOCK + FEE).unwrap()
    }
}
