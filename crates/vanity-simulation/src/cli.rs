//! Purpose: Provides the command-line interface for the vanity registry simulator.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use vanity_crypto::{compute_name_hash, compute_signed_hash, Address, NameKey};
use vanity_registry::units::format_ether;
use vanity_registry::RegistryConfig;

use crate::runner::ScenarioRunner;
use crate::scenario::Scenario;
use crate::telemetry::{init_tracing, DEFAULT_FILTER};

/// Vanity name registry simulator
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[clap(long, env = "VANITY_LOG_LEVEL", default_value = DEFAULT_FILTER)]
    pub(crate) log_level: String,

    /// Emit logs as JSON lines
    #[clap(long)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Run a scenario file
    Run(RunArgs),

    /// Compute the commitment digest for an address and name
    Hash(HashArgs),

    /// Validate a registry configuration file
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Scenario file path
    #[clap(required = true)]
    pub(crate) scenario_path: PathBuf,

    /// Print the full report as JSON
    #[clap(long)]
    pub(crate) report: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HashArgs {
    /// Claimant address
    #[clap(required = true)]
    pub(crate) address: String,

    /// Name to claim
    #[clap(required = true)]
    pub(crate) name: String,
}

#[derive(Args, Debug)]
pub(crate) struct CheckConfigArgs {
    /// Registry configuration file path
    #[clap(required = true)]
    pub(crate) config_path: PathBuf,
}

/// Parse arguments, initialize tracing and execute the command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json)?;
    execute(cli.command)
}

pub(crate) fn execute(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run_scenario(args),
        Command::Hash(args) => {
            println!("{}", hash_claim(&args)?);
            Ok(())
        }
        Command::CheckConfig(args) => check_config(args),
    }
}

fn run_scenario(args: RunArgs) -> Result<()> {
    let scenario = Scenario::from_file(&args.scenario_path)
        .with_context(|| format!("loading scenario {}", args.scenario_path.display()))?;
    let runner = ScenarioRunner::new(scenario)?;
    let report = runner.run()?;

    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("scenario '{}': {} step(s) passed", report.scenario, report.steps.len());
        for record in &report.names {
            println!("  {} owned by {} since {}", record.name, record.owner, record.registered_at);
        }
        println!("  custody holds {} ether", report.custody);
    }
    Ok(())
}

pub(crate) fn hash_claim(args: &HashArgs) -> Result<String> {
    let address = Address::from_str(&args.address).with_context(|| format!("invalid address '{}'", args.address))?;
    NameKey::encode(&args.name)?;
    let name_hash = compute_name_hash(&address, &args.name);
    let signed = compute_signed_hash(&name_hash);
    Ok(format!("name_hash   {}\nsigned_hash {}", name_hash, signed))
}

fn check_config(args: CheckConfigArgs) -> Result<()> {
    let config = RegistryConfig::from_file(&args.config_path)
        .with_context(|| format!("loading config {}", args.config_path.display()))?;
    info!(path = %args.config_path.display(), "configuration valid");
    println!(
        "lock {} ether for {}s, fee {} ether to {}, freeze {} block(s)",
        format_ether(config.lock_amount),
        config.lock_duration,
        format_ether(config.fee_amount),
        config.fee_recipient,
        config.block_freeze
    );
    Ok(())
}
