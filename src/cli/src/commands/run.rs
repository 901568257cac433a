//! Run command: executes a scenario and reports each step.

use crate::contracts::{BehaviorSpec, ScriptedReceiver};
use crate::errors::CliError;
use crate::scenario::{Expectation, Operation, Scenario, Step};
use colored::Colorize;
use ledger::types::{format_address, resolve_account};
use ledger::{Address, Balance, Event, Host, LedgerError, TokenInfo};
use notify::{NotifyError, NotifyToken, ReceiverContract};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// What happened when a step ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The step succeeded.
    Ok,
    /// A notify operation failed.
    Notify(NotifyError),
    /// A plain ledger operation was rejected.
    Ledger(LedgerError),
}

impl Outcome {
    /// Whether this outcome is the one `expect` describes.
    pub fn matches(&self, expect: Expectation) -> bool {
        matches!(
            (self, expect),
            (Outcome::Ok, Expectation::Ok)
                | (Outcome::Notify(NotifyError::TransferFailed { .. }), Expectation::TransferFailed)
                | (
                    Outcome::Notify(NotifyError::TransferFromFailed { .. }),
                    Expectation::TransferFromFailed
                )
                | (Outcome::Notify(NotifyError::ApproveFailed { .. }), Expectation::ApproveFailed)
                | (
                    Outcome::Notify(NotifyError::CallbackRejected { .. }),
                    Expectation::CallbackRejected
                )
                | (Outcome::Ledger(_), Expectation::LedgerRejected)
        )
    }
}

/// Result of a single step.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// 1-based position in the scenario
    pub index: usize,
    /// Caller reference as written in the scenario
    pub caller: String,
    /// Operation name
    pub operation: &'static str,
    /// What happened
    pub outcome: Outcome,
    /// The expectation, if any
    pub expect: Option<Expectation>,
}

impl StepReport {
    /// False only when an expectation was given and not met.
    pub fn as_expected(&self) -> bool {
        self.expect.map_or(true, |e| self.outcome.matches(e))
    }
}

/// Result of a whole scenario.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Per-step results, in order
    pub steps: Vec<StepReport>,
    /// Final balance per known account, keyed by the name used in the scenario
    pub balances: BTreeMap<String, Balance>,
    /// Final state root
    pub state_root: [u8; 32],
    /// Metadata of the token the scenario ran against
    pub token: TokenInfo,
    /// Committed ledger events, in emission order
    pub events: Vec<Event>,
}

impl RunReport {
    /// Number of steps whose expectation was not met.
    pub fn mismatches(&self) -> usize {
        self.steps.iter().filter(|s| !s.as_expected()).count()
    }
}

/// Builds the host for a scenario and deploys its counterparties.
pub fn prepare(scenario: &Scenario) -> Result<Host, CliError> {
    let mut host = scenario.config.build_host()?;
    for contract in &scenario.contracts {
        let address = resolve_account(&contract.account)?;
        let receiver = ScriptedReceiver::from_spec(&contract.behavior)?;
        debug!("Deploying {} as {:?}", contract.account, receiver.behavior());
        host.deploy(address, Arc::new(ReceiverContract::new(receiver)));
    }
    Ok(host)
}

/// Runs a single step against the host.
pub fn run_step(host: &mut Host, token: &NotifyToken, step: &Step) -> Result<Outcome, CliError> {
    let caller = resolve_account(&step.caller)?;

    let outcome = match &step.operation {
        Operation::TransferAndNotify { to, amount, data } => {
            let to = resolve_account(to)?;
            notify_outcome(host.execute(caller, |h| {
                token.transfer_and_notify_with_data(h, &to, *amount, data.as_bytes())
            }))
        }
        Operation::TransferFromAndNotify {
            from,
            to,
            amount,
            data,
        } => {
            let from = resolve_account(from)?;
            let to = resolve_account(to)?;
            notify_outcome(host.execute(caller, |h| {
                token.transfer_from_and_notify_with_data(h, &from, &to, *amount, data.as_bytes())
            }))
        }
        Operation::ApproveAndNotify {
            spender,
            amount,
            data,
        } => {
            let spender = resolve_account(spender)?;
            notify_outcome(host.execute(caller, |h| {
                token.approve_and_notify_with_data(h, &spender, *amount, data.as_bytes())
            }))
        }
        Operation::Transfer { to, amount } => {
            let to = resolve_account(to)?;
            ledger_outcome(host.execute(caller, |h| h.transfer(&to, *amount)))
        }
        Operation::Approve { spender, amount } => {
            let spender = resolve_account(spender)?;
            ledger_outcome(host.execute(caller, |h| h.approve(&spender, *amount)))
        }
    };

    Ok(outcome)
}

fn notify_outcome(result: Result<(), NotifyError>) -> Outcome {
    match result {
        Ok(()) => Outcome::Ok,
        Err(e) => Outcome::Notify(e),
    }
}

fn ledger_outcome(result: Result<(), LedgerError>) -> Outcome {
    match result {
        Ok(()) => Outcome::Ok,
        Err(e) => Outcome::Ledger(e),
    }
}

/// Every account reference that appears in the scenario.
fn known_accounts(scenario: &Scenario) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    for allocation in &scenario.config.genesis {
        push(&allocation.account);
    }
    for contract in &scenario.contracts {
        push(&contract.account);
        if let BehaviorSpec::Forward { to } = &contract.behavior {
            push(to);
        }
    }
    for step in &scenario.steps {
        push(&step.caller);
        match &step.operation {
            Operation::TransferAndNotify { to, .. } | Operation::Transfer { to, .. } => push(to),
            Operation::TransferFromAndNotify { from, to, .. } => {
                push(from);
                push(to);
            }
            Operation::ApproveAndNotify { spender, .. } | Operation::Approve { spender, .. } => {
                push(spender)
            }
        }
    }
    names
}

/// Executes every step of a scenario.
pub fn execute(scenario: &Scenario) -> Result<RunReport, CliError> {
    let mut host = prepare(scenario)?;
    let token = NotifyToken::new();

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (i, step) in scenario.steps.iter().enumerate() {
        let outcome = run_step(&mut host, &token, step)?;
        steps.push(StepReport {
            index: i + 1,
            caller: step.caller.clone(),
            operation: step.operation.name(),
            outcome,
            expect: step.expect,
        });
    }

    let mut balances = BTreeMap::new();
    for name in known_accounts(scenario) {
        let address: Address = resolve_account(&name)?;
        balances.insert(name, host.balance_of(&address));
    }

    let state_root = host.state_root()?;
    info!("Scenario finished with {} steps", steps.len());

    Ok(RunReport {
        steps,
        balances,
        state_root,
        token: host.token().info().clone(),
        events: host.token().state().events().to_vec(),
    })
}

fn print_report(report: &RunReport) {
    println!("{} {}", "Token:".green(), report.token);
    for step in &report.steps {
        let outcome = match &step.outcome {
            Outcome::Ok => "ok".green().to_string(),
            Outcome::Notify(e) => e.to_string().red().to_string(),
            Outcome::Ledger(e) => e.to_string().red().to_string(),
        };
        let marker = if step.as_expected() {
            "".normal()
        } else {
            " (unexpected)".yellow().bold()
        };
        println!(
            "[{}] {} {}: {}{}",
            step.index, step.caller, step.operation, outcome, marker
        );
    }

    println!("\n{}", "Events:".green());
    for event in &report.events {
        println!("  {}", event);
    }

    println!("\n{}", "Balances:".green());
    for (name, balance) in &report.balances {
        println!("  {:<20} {}", name, balance);
    }
    println!("{} {}", "State root:".green(), format_address(&report.state_root));
}

/// Runs the run command.
pub fn run<P: AsRef<Path>>(scenario_path: P, config_path: Option<&Path>) -> Result<RunReport, CliError> {
    let mut scenario = Scenario::from_file(&scenario_path)?;
    if let Some(path) = config_path {
        scenario.config = ledger::LedgerConfig::from_file(path)?;
    }
    info!(
        "Running scenario {} ({} steps)",
        scenario_path.as_ref().display(),
        scenario.steps.len()
    );

    let report = execute(&scenario)?;
    print_report(&report);

    match report.mismatches() {
        0 => Ok(report),
        n => Err(CliError::ExpectationFailed(n)),
    }
}
