//! Failed notify operations must leave the ledger exactly as it was.

use ledger::types::address_from_label;
use ledger::{Address, Host, LedgerConfig, Revert, Selector};
use notify::{
    CallbackKind, NotifyError, NotifyReceiver, NotifyToken, ReceiverContract, RejectReason,
    TransferReceipt, TRANSFER_RECEIVED,
};
use rand::Rng;
use std::sync::Arc;

/// Spends what it received, then reverts.
struct SpendThenRevert {
    sink: Address,
}

impl NotifyReceiver for SpendThenRevert {
    fn on_transfer_received(
        &self,
        host: &mut Host,
        receipt: TransferReceipt,
    ) -> Result<Selector, Revert> {
        let me = host.address();
        let sink = self.sink;
        host.execute(me, |h| h.transfer(&sink, receipt.amount))?;
        host.execute(me, |h| h.approve(&sink, 1))?;
        Err(Revert::Message("changed my mind".to_string()))
    }
}

/// Notifies itself again from inside its own callback.
struct Echo;

impl NotifyReceiver for Echo {
    fn on_transfer_received(
        &self,
        host: &mut Host,
        receipt: TransferReceipt,
    ) -> Result<Selector, Revert> {
        let me = host.address();
        if receipt.amount > 1 {
            let token = NotifyToken::new();
            host.execute(me, |h| token.transfer_and_notify(h, &me, receipt.amount - 1))
                .map_err(|e| Revert::Message(e.to_string()))?;
        }
        Ok(TRANSFER_RECEIVED)
    }
}

fn funded_host(accounts: &[(&str, u128)]) -> Host {
    let mut host = LedgerConfig::default().build_host().unwrap();
    for (label, balance) in accounts {
        host.token_mut()
            .mint(&address_from_label(label), *balance)
            .unwrap();
    }
    host
}

#[test]
fn test_reverted_callback_undoes_its_own_effects() {
    let mut host = funded_host(&[("alice", 100), ("bob", 7)]);
    let alice = address_from_label("alice");
    let sink = address_from_label("sink");
    let fickle = address_from_label("fickle");
    host.deploy(fickle, Arc::new(ReceiverContract::new(SpendThenRevert { sink })));

    let root = host.state_root().unwrap();
    let events = host.token().state().events().len();
    let token = NotifyToken::new();

    let err = host
        .execute(alice, |h| token.transfer_and_notify(h, &fickle, 60))
        .unwrap_err();

    assert_eq!(
        err,
        NotifyError::CallbackRejected {
            kind: CallbackKind::Receipt,
            counterparty: fickle,
            reason: RejectReason::Reverted("changed my mind".to_string()),
        }
    );
    assert_eq!(host.state_root().unwrap(), root);
    assert_eq!(host.token().state().events().len(), events);
    assert_eq!(host.balance_of(&sink), 0);
    assert_eq!(host.token().allowance(&fickle, &sink), 0);
}

#[test]
fn test_random_failures_leave_no_trace() {
    let mut rng = rand::thread_rng();
    let labels = ["a", "b", "c", "d"];
    let mut host = funded_host(&[("a", 1_000), ("b", 500), ("c", 250), ("d", 0)]);

    let rejector = address_from_label("rejector");
    host.deploy(
        rejector,
        Arc::new(ReceiverContract::new(SpendThenRevert {
            sink: address_from_label("d"),
        })),
    );
    let token = NotifyToken::new();

    for _ in 0..50 {
        let from = address_from_label(labels[rng.gen_range(0..labels.len())]);
        let amount = rng.gen_range(0..1_500u128);
        let root = host.state_root().unwrap();
        let supply = host.token().total_supply();

        let to_rejector = rng.gen_bool(0.5);
        let result = if to_rejector {
            host.execute(from, |h| token.transfer_and_notify(h, &rejector, amount))
        } else {
            let to = address_from_label(labels[rng.gen_range(0..labels.len())]);
            host.execute(from, |h| token.transfer_and_notify(h, &to, amount))
        };

        if to_rejector {
            assert!(result.is_err());
        }
        if result.is_err() {
            assert_eq!(host.state_root().unwrap(), root);
        }
        assert_eq!(host.token().total_supply(), supply);
    }

    assert_eq!(host.balance_of(&rejector), 0);
}

#[test]
fn test_nested_notifications_commit_together() {
    let mut host = funded_host(&[("alice", 10)]);
    let alice = address_from_label("alice");
    let echo = address_from_label("echo");
    host.deploy(echo, Arc::new(ReceiverContract::new(Echo)));
    let token = NotifyToken::new();

    host.execute(alice, |h| token.transfer_and_notify(h, &echo, 5))
        .unwrap();

    assert_eq!(host.balance_of(&alice), 5);
    assert_eq!(host.balance_of(&echo), 5);
    assert_eq!(host.depth(), 0);
}

#[test]
fn test_call_depth_limit_rejects_and_rolls_back() {
    let alice = address_from_label("alice");
    let echo = address_from_label("echo");
    let mut host = LedgerConfig::default()
        .build_host()
        .unwrap()
        .with_max_call_depth(4);
    host.token_mut().mint(&alice, 100).unwrap();
    host.deploy(echo, Arc::new(ReceiverContract::new(Echo)));
    let root = host.state_root().unwrap();
    let token = NotifyToken::new();

    // Each level adds a token frame and a contract frame.
    let result = host.execute(alice, |h| token.transfer_and_notify(h, &echo, 50));

    assert!(matches!(
        result,
        Err(NotifyError::CallbackRejected {
            kind: CallbackKind::Receipt,
            ..
        })
    ));
    assert_eq!(host.state_root().unwrap(), root);
    assert_eq!(host.depth(), 0);
}

#[test]
fn test_default_depth_limit_stops_deep_reentrancy() {
    let mut host = funded_host(&[("alice", 10_000)]);
    let alice = address_from_label("alice");
    let echo = address_from_label("echo");
    host.deploy(echo, Arc::new(ReceiverContract::new(Echo)));
    let root = host.state_root().unwrap();
    let token = NotifyToken::new();

    // Far more levels than the default limit allows.
    let result = host.execute(alice, |h| token.transfer_and_notify(h, &echo, 5_000));

    assert!(matches!(
        result,
        Err(NotifyError::CallbackRejected {
            kind: CallbackKind::Receipt,
            ..
        })
    ));
    assert_eq!(host.state_root().unwrap(), root);
    assert_eq!(host.balance_of(&alice), 10_000);
    assert_eq!(host.depth(), 0);
}
