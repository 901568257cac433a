//! Scenario files: a ledger configuration, scripted counterparties and a
//! list of operations to run against them.

use crate::contracts::BehaviorSpec;
use crate::errors::CliError;
use ledger::{Balance, GenesisAllocation, LedgerConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A counterparty deployed before the steps run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpec {
    /// Hex address or label
    pub account: String,
    /// How it answers callbacks
    pub behavior: BehaviorSpec,
}

/// An operation performed by a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Transfer with receipt confirmation.
    TransferAndNotify {
        /// Receiver reference
        to: String,
        /// Amount to move
        amount: Balance,
        /// Payload passed to the receiver
        #[serde(default)]
        data: String,
    },
    /// Delegated transfer with receipt confirmation.
    TransferFromAndNotify {
        /// Owner of the funds
        from: String,
        /// Receiver reference
        to: String,
        /// Amount to move
        amount: Balance,
        /// Payload passed to the receiver
        #[serde(default)]
        data: String,
    },
    /// Approval with confirmation.
    ApproveAndNotify {
        /// Spender reference
        spender: String,
        /// Allowance to grant
        amount: Balance,
        /// Payload passed to the spender
        #[serde(default)]
        data: String,
    },
    /// Plain ledger transfer.
    Transfer {
        /// Receiver reference
        to: String,
        /// Amount to move
        amount: Balance,
    },
    /// Plain ledger approval.
    Approve {
        /// Spender reference
        spender: String,
        /// Allowance to grant
        amount: Balance,
    },
}

impl Operation {
    /// Name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::TransferAndNotify { .. } => "transfer_and_notify",
            Operation::TransferFromAndNotify { .. } => "transfer_from_and_notify",
            Operation::ApproveAndNotify { .. } => "approve_and_notify",
            Operation::Transfer { .. } => "transfer",
            Operation::Approve { .. } => "approve",
        }
    }
}

/// Expected result of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The step succeeds.
    Ok,
    /// The ledger refuses the notified transfer.
    TransferFailed,
    /// The ledger refuses the notified delegated transfer.
    TransferFromFailed,
    /// The ledger refuses the notified approval.
    ApproveFailed,
    /// The counterparty does not confirm.
    CallbackRejected,
    /// A plain ledger operation was rejected.
    LedgerRejected,
}

/// One step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Hex address or label of the account performing the step
    pub caller: String,
    /// What to do
    #[serde(flatten)]
    pub operation: Operation,
    /// What should happen; unchecked when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<Expectation>,
}

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Ledger configuration, including genesis balances
    #[serde(default)]
    pub config: LedgerConfig,
    /// Counterparties with code
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
    /// Operations, run in order
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Loads a scenario from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let scenario = serde_json::from_str(&contents)?;
        Ok(scenario)
    }

    /// Saves a scenario to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The walkthrough written by `volt-notify init`.
    pub fn sample() -> Self {
        let config = LedgerConfig {
            genesis: vec![
                GenesisAllocation {
                    account: "alice".to_string(),
                    balance: 100,
                },
                GenesisAllocation {
                    account: "bob".to_string(),
                    balance: 50,
                },
            ],
            ..LedgerConfig::default()
        };

        let contracts = vec![
            ContractSpec {
                account: "shop".to_string(),
                behavior: BehaviorSpec::Accept,
            },
            ContractSpec {
                account: "impostor".to_string(),
                behavior: BehaviorSpec::Return {
                    token: "0x7b04a2d0".to_string(),
                },
            },
            ContractSpec {
                account: "vault".to_string(),
                behavior: BehaviorSpec::Ignore,
            },
            ContractSpec {
                account: "relay".to_string(),
                behavior: BehaviorSpec::Forward {
                    to: "carol".to_string(),
                },
            },
        ];

        let step = |caller: &str, operation: Operation, expect: Expectation| Step {
            caller: caller.to_string(),
            operation,
            expect: Some(expect),
        };

        let steps = vec![
            step(
                "alice",
                Operation::TransferAndNotify {
                    to: "impostor".to_string(),
                    amount: 40,
                    data: String::new(),
                },
                Expectation::CallbackRejected,
            ),
            step(
                "alice",
                Operation::TransferAndNotify {
                    to: "shop".to_string(),
                    amount: 40,
                    data: "order-1".to_string(),
                },
                Expectation::Ok,
            ),
            step(
                "alice",
                Operation::TransferAndNotify {
                    to: "bob".to_string(),
                    amount: 10,
                    data: String::new(),
                },
                Expectation::Ok,
            ),
            step(
                "alice",
                Operation::TransferAndNotify {
                    to: "vault".to_string(),
                    amount: 10,
                    data: String::new(),
                },
                Expectation::CallbackRejected,
            ),
            step(
                "bob",
                Operation::ApproveAndNotify {
                    spender: "shop".to_string(),
                    amount: 20,
                    data: String::new(),
                },
                Expectation::Ok,
            ),
            step(
                "shop",
                Operation::TransferFromAndNotify {
                    from: "bob".to_string(),
                    to: "relay".to_string(),
                    amount: 15,
                    data: String::new(),
                },
                Expectation::Ok,
            ),
            step(
                "shop",
                Operation::TransferFromAndNotify {
                    from: "bob".to_string(),
                    to: "relay".to_string(),
                    amount: 15,
                    data: String::new(),
                },
                Expectation::TransferFromFailed,
            ),
        ];

        Self {
            config,
            contracts,
            steps,
        }
    }
}
