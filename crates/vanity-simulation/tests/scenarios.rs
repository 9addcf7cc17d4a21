//! Scenario files driven end to end through the runner

use std::io::Write;
use std::path::PathBuf;

use vanity_simulation::{Scenario, ScenarioRunner, SimulationError};

fn scenario_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file)
}

fn run_file(file: &str) -> vanity_simulation::ScenarioReport {
    let scenario = Scenario::from_file(scenario_path(file)).unwrap();
    ScenarioRunner::new(scenario).unwrap().run().unwrap()
}

const HEADER: &str = r#"
name = "inline"

[registry]
lock_duration = 100
lock_amount = "1000 wei"
block_freeze = 2
fee_amount = "10 wei"
fee_recipient = "treasury"

[[accounts]]
name = "alice"
balance = "1 ether"

[[accounts]]
name = "treasury"
"#;

#[test]
fn test_register_renew_unlock_scenario() {
    let report = run_file("register_renew_unlock.toml");
    assert_eq!(report.scenario, "register, renew and unlock");
    assert!(report.steps.iter().all(|step| step.succeeded));
    assert!(report.names.is_empty());
    assert_eq!(report.custody, "0");
    assert_eq!(report.balances["alice"], "0.999");
    assert_eq!(report.balances["treasury"], "0.001");

    let kinds: Vec<_> = report.events.iter().map(|event| event.kind()).collect();
    assert_eq!(kinds, vec!["NameCommitted", "NameRegistered", "NameRenewed"]);
}

#[test]
fn test_front_running_scenario() {
    let report = run_file("front_running.toml");
    let failed: Vec<_> = report
        .steps
        .iter()
        .filter(|step| !step.succeeded)
        .filter_map(|step| step.error.as_ref())
        .map(|error| error.code)
        .collect();
    assert_eq!(failed.len(), 3);
    assert_eq!(report.names.len(), 1);
    assert_eq!(report.pending_commits, 1);
}

#[test]
fn test_unmet_expectation_stops_run() {
    let source = format!(
        "{}\n{}",
        HEADER,
        r#"
[[steps]]
action = "commit"
account = "alice"
name = "hello"

[[steps]]
action = "register"
account = "alice"
name = "hello"
"#
    );
    let runner = ScenarioRunner::new(Scenario::from_toml_str(&source).unwrap()).unwrap();
    match runner.run() {
        Err(SimulationError::ExpectationFailed { step, expected, actual, .. }) => {
            assert_eq!(step, 1);
            assert_eq!(expected, "ok");
            assert_eq!(actual, "REGISTRY_TOO_EARLY");
        }
        other => panic!("expected an expectation failure, got {:?}", other.map(|r| r.steps.len())),
    }
}

#[test]
fn test_rejecting_account_in_scenario() {
    let source = format!(
        "{}\n{}",
        HEADER.replace("name = \"treasury\"", "name = \"treasury\"\nrejects_funds = true"),
        r#"
[[steps]]
action = "commit"
account = "alice"
name = "hello"

[[steps]]
action = "mine"
blocks = 3

[[steps]]
action = "register"
account = "alice"
name = "hello"
expect = "fee_transfer_failed"

[[steps]]
action = "expect_balance"
account = "alice"
balance = "1 ether"

[[steps]]
action = "expect_owner"
name = "hello"
"#
    );
    let runner = ScenarioRunner::new(Scenario::from_toml_str(&source).unwrap()).unwrap();
    let report = runner.run().unwrap();
    assert_eq!(report.steps.len(), 5);
    assert!(!report.steps[2].succeeded);
}

#[test]
fn test_unknown_account_is_configuration_error() {
    let source = format!(
        "{}\n{}",
        HEADER,
        r#"
[[steps]]
action = "unlock"
account = "nobody"
"#
    );
    let runner = ScenarioRunner::new(Scenario::from_toml_str(&source).unwrap()).unwrap();
    assert!(matches!(runner.run(), Err(SimulationError::UnknownAccount(_))));

    let reserved = HEADER.replace("name = \"alice\"", "name = \"registry\"");
    let scenario = Scenario::from_toml_str(&reserved).unwrap();
    assert!(matches!(
        ScenarioRunner::new(scenario),
        Err(SimulationError::Configuration(_))
    ));
}

#[test]
fn test_report_serializes_to_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}\n[[steps]]\naction = \"advance\"\nseconds = 5\n",
        HEADER
    )
    .unwrap();

    let report = ScenarioRunner::new(Scenario::from_file(file.path()).unwrap())
        .unwrap()
        .run()
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["scenario"], "inline");
    assert_eq!(json["steps"][0]["action"], "advance");
    assert!(json["steps"][0].get("error").is_none());
}
