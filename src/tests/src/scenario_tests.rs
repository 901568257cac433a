//! Scenario runner tests, including reentrant counterparties.

use cli::commands::run::{execute, run_step, Outcome};
use cli::{Behavior, BehaviorSpec, ContractSpec, Expectation, Operation, Scenario, ScriptedReceiver, Step};
use ledger::types::address_from_label;
use ledger::{GenesisAllocation, LedgerConfig};
use notify::{CallbackKind, NotifyError, NotifyToken, ReceiverContract, RejectReason};
use std::sync::Arc;
use tempfile::tempdir;

fn transfer_step(caller: &str, to: &str, amount: u128) -> Step {
    Step {
        caller: caller.to_string(),
        operation: Operation::TransferAndNotify {
            to: to.to_string(),
            amount,
            data: String::new(),
        },
        expect: None,
    }
}

#[test]
fn test_sample_scenario_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.json");
    cli::init::run(&path, None).unwrap();

    let report = cli::run::run(&path, None).unwrap();
    assert_eq!(report.mismatches(), 0);
    assert_eq!(report.steps.len(), 7);
    assert_eq!(report.balances["carol"], 15);
}

#[test]
fn test_config_override() {
    let dir = tempdir().unwrap();
    let scenario_path = dir.path().join("scenario.json");
    let config_path = dir.path().join("ledger.json");

    let scenario = Scenario {
        config: LedgerConfig::default(),
        contracts: Vec::new(),
        steps: vec![Step {
            expect: Some(Expectation::Ok),
            ..transfer_step("dave", "erin", 30)
        }],
    };
    scenario.to_file(&scenario_path).unwrap();

    let config = LedgerConfig {
        genesis: vec![GenesisAllocation {
            account: "dave".to_string(),
            balance: 30,
        }],
        ..LedgerConfig::default()
    };
    config.to_file(&config_path).unwrap();

    // Without the override dave has nothing to send.
    assert!(cli::run::run(&scenario_path, None).is_err());

    let report = cli::run::run(&scenario_path, Some(config_path.as_path())).unwrap();
    assert_eq!(report.balances["erin"], 30);
    assert_eq!(report.balances["dave"], 0);
}

#[test]
fn test_forwarding_receiver_reenters_ledger() {
    let mut host = LedgerConfig::default().build_host().unwrap();
    let alice = address_from_label("alice");
    let relay = address_from_label("relay");
    let carol = address_from_label("carol");
    host.token_mut().mint(&alice, 50).unwrap();
    host.deploy(
        relay,
        Arc::new(ReceiverContract::new(ScriptedReceiver::new(Behavior::Forward(carol)))),
    );

    let token = NotifyToken::new();
    let outcome = run_step(&mut host, &token, &transfer_step("alice", "relay", 20)).unwrap();

    assert_eq!(outcome, Outcome::Ok);
    assert_eq!(host.balance_of(&alice), 30);
    assert_eq!(host.balance_of(&relay), 0);
    assert_eq!(host.balance_of(&carol), 20);
}

#[test]
fn test_callback_observes_completed_operation() {
    let scenario = Scenario {
        config: LedgerConfig {
            genesis: vec![GenesisAllocation {
                account: "alice".to_string(),
                balance: 100,
            }],
            ..LedgerConfig::default()
        },
        contracts: vec![ContractSpec {
            account: "auditor".to_string(),
            behavior: BehaviorSpec::CheckBalance,
        }],
        steps: vec![
            Step {
                expect: Some(Expectation::Ok),
                ..transfer_step("alice", "auditor", 40)
            },
            Step {
                caller: "alice".to_string(),
                operation: Operation::ApproveAndNotify {
                    spender: "auditor".to_string(),
                    amount: 25,
                    data: String::new(),
                },
                expect: Some(Expectation::Ok),
            },
        ],
    };

    let report = execute(&scenario).unwrap();
    assert_eq!(report.mismatches(), 0);
    assert_eq!(report.balances["auditor"], 40);
}

#[test]
fn test_reverting_receiver_reports_message() {
    let scenario = Scenario {
        config: LedgerConfig {
            genesis: vec![GenesisAllocation {
                account: "alice".to_string(),
                balance: 10,
            }],
            ..LedgerConfig::default()
        },
        contracts: vec![ContractSpec {
            account: "closed".to_string(),
            behavior: BehaviorSpec::Revert {
                message: "shop closed".to_string(),
            },
        }],
        steps: vec![transfer_step("alice", "closed", 5)],
    };

    let report = execute(&scenario).unwrap();
    assert_eq!(
        report.steps[0].outcome,
        Outcome::Notify(NotifyError::CallbackRejected {
            kind: CallbackKind::Receipt,
            counterparty: address_from_label("closed"),
            reason: RejectReason::Reverted("shop closed".to_string()),
        })
    );
    assert_eq!(report.balances["alice"], 10);
    assert_eq!(report.balances["closed"], 0);
}

#[test]
fn test_plain_operations_report_ledger_errors() {
    let scenario = Scenario {
        config: LedgerConfig::default(),
        contracts: Vec::new(),
        steps: vec![Step {
            caller: "nobody".to_string(),
            operation: Operation::Transfer {
                to: "somebody".to_string(),
                amount: 1,
            },
            expect: Some(Expectation::LedgerRejected),
        }],
    };

    let report = execute(&scenario).unwrap();
    assert_eq!(report.mismatches(), 0);
    assert!(matches!(report.steps[0].outcome, Outcome::Ledger(_)));
}
