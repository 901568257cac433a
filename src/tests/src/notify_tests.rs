//! End-to-end tests of the notify operations.

use ledger::types::address_from_label;
use ledger::{Address, Host, LedgerConfig, Revert, Selector};
use notify::{
    ApprovalReceipt, CallbackKind, NotifyError, NotifyReceiver, NotifyToken, ReceiverContract,
    RejectReason, TransferReceipt, APPROVAL_RECEIVED, TRANSFER_RECEIVED,
};
use std::cell::RefCell;
use std::sync::Arc;

/// Answers every callback with a fixed token and records what it saw.
struct Recorder {
    answer: Selector,
    receipts: RefCell<Vec<TransferReceipt>>,
    approvals: RefCell<Vec<ApprovalReceipt>>,
}

impl Recorder {
    fn new(answer: Selector) -> Self {
        Self {
            answer,
            receipts: RefCell::new(Vec::new()),
            approvals: RefCell::new(Vec::new()),
        }
    }
}

impl NotifyReceiver for Recorder {
    fn on_transfer_received(
        &self,
        _host: &mut Host,
        receipt: TransferReceipt,
    ) -> Result<Selector, Revert> {
        self.receipts.borrow_mut().push(receipt);
        Ok(self.answer)
    }

    fn on_approval_received(
        &self,
        _host: &mut Host,
        receipt: ApprovalReceipt,
    ) -> Result<Selector, Revert> {
        self.approvals.borrow_mut().push(receipt);
        Ok(self.answer)
    }
}

/// Deployed code with no callbacks at all.
struct Silent;

impl NotifyReceiver for Silent {}

fn host_with(label: &str, balance: u128) -> (Host, Address) {
    let owner = address_from_label(label);
    let mut host = LedgerConfig::default().build_host().unwrap();
    host.token_mut().mint(&owner, balance).unwrap();
    (host, owner)
}

fn deploy_recorder(host: &mut Host, label: &str, answer: Selector) -> (Address, Arc<ReceiverContract<Recorder>>) {
    let addr = address_from_label(label);
    let contract = Arc::new(ReceiverContract::new(Recorder::new(answer)));
    host.deploy(addr, contract.clone());
    (addr, contract)
}

/// C holds 100 and R answers the receipt callback with the approval token.
#[test]
fn test_wrong_token_rejects_transfer() {
    let (mut host, c) = host_with("C", 100);
    let (r, _) = deploy_recorder(&mut host, "R", APPROVAL_RECEIVED);
    let token = NotifyToken::new();

    let err = host
        .execute(c, |h| token.transfer_and_notify(h, &r, 40))
        .unwrap_err();

    assert_eq!(
        err,
        NotifyError::CallbackRejected {
            kind: CallbackKind::Receipt,
            counterparty: r,
            reason: RejectReason::UnexpectedReturn(APPROVAL_RECEIVED.to_vec()),
        }
    );
    assert_eq!(host.balance_of(&c), 100);
    assert_eq!(host.balance_of(&r), 0);
}

/// Same setup, but R answers correctly.
#[test]
fn test_correct_token_confirms_transfer() {
    let (mut host, c) = host_with("C", 100);
    let (r, contract) = deploy_recorder(&mut host, "R", TRANSFER_RECEIVED);
    let token = NotifyToken::new();

    host.execute(c, |h| token.transfer_and_notify_with_data(h, &r, 40, b"invoice-7"))
        .unwrap();

    assert_eq!(host.balance_of(&c), 60);
    assert_eq!(host.balance_of(&r), 40);

    let receipts = contract.inner().receipts.borrow();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].operator, c);
    assert_eq!(receipts[0].from, c);
    assert_eq!(receipts[0].amount, 40);
    assert_eq!(receipts[0].data, b"invoice-7".to_vec());
}

#[test]
fn test_plain_account_passes_through() {
    let (mut host, c) = host_with("C", 100);
    let plain = address_from_label("plain");
    let token = NotifyToken::new();

    host.execute(c, |h| token.transfer_and_notify(h, &plain, 25))
        .unwrap();
    host.execute(c, |h| token.approve_and_notify(h, &plain, 30))
        .unwrap();

    assert_eq!(host.balance_of(&plain), 25);
    assert_eq!(host.token().allowance(&c, &plain), 30);
}

#[test]
fn test_missing_callback_is_rejected() {
    let (mut host, c) = host_with("C", 100);
    let silent = address_from_label("silent");
    host.deploy(silent, Arc::new(ReceiverContract::new(Silent)));
    let token = NotifyToken::new();

    let err = host
        .execute(c, |h| token.approve_and_notify(h, &silent, 10))
        .unwrap_err();

    assert_eq!(
        err,
        NotifyError::CallbackRejected {
            kind: CallbackKind::Approval,
            counterparty: silent,
            reason: RejectReason::NotImplemented,
        }
    );
    assert_eq!(host.token().allowance(&c, &silent), 0);
}

#[test]
fn test_delegated_transfer_reports_operator_and_sender() {
    let (mut host, owner) = host_with("owner", 100);
    let spender = address_from_label("spender");
    let (shop, contract) = deploy_recorder(&mut host, "shop", TRANSFER_RECEIVED);
    let token = NotifyToken::new();

    host.execute(owner, |h| h.approve(&spender, 50)).unwrap();
    host.execute(spender, |h| token.transfer_from_and_notify(h, &owner, &shop, 30))
        .unwrap();

    assert_eq!(host.balance_of(&owner), 70);
    assert_eq!(host.balance_of(&shop), 30);
    assert_eq!(host.token().allowance(&owner, &spender), 20);

    let receipts = contract.inner().receipts.borrow();
    assert_eq!(receipts[0].operator, spender);
    assert_eq!(receipts[0].from, owner);
}

#[test]
fn test_delegated_transfer_beyond_allowance() {
    let (mut host, owner) = host_with("owner", 100);
    let spender = address_from_label("spender");
    let (shop, contract) = deploy_recorder(&mut host, "shop", TRANSFER_RECEIVED);
    let token = NotifyToken::new();

    host.execute(owner, |h| h.approve(&spender, 10)).unwrap();
    let err = host
        .execute(spender, |h| token.transfer_from_and_notify(h, &owner, &shop, 30))
        .unwrap_err();

    assert_eq!(
        err,
        NotifyError::TransferFromFailed {
            sender: owner,
            receiver: shop,
            amount: 30,
        }
    );
    assert!(err.is_ledger_failure());
    assert!(contract.inner().receipts.borrow().is_empty());
    assert_eq!(host.token().allowance(&owner, &spender), 10);
}

#[test]
fn test_approval_callback_sees_owner() {
    let (mut host, owner) = host_with("owner", 100);
    let (spender, contract) = deploy_recorder(&mut host, "spender", APPROVAL_RECEIVED);
    let token = NotifyToken::new();

    host.execute(owner, |h| token.approve_and_notify_with_data(h, &spender, 75, b"sub"))
        .unwrap();

    assert_eq!(host.token().allowance(&owner, &spender), 75);
    let approvals = contract.inner().approvals.borrow();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0].operator, owner);
    assert_eq!(approvals[0].amount, 75);
    assert_eq!(approvals[0].data, b"sub".to_vec());
}

#[test]
fn test_rejected_approval_restores_previous_allowance() {
    let (mut host, owner) = host_with("owner", 100);
    let (spender, contract) = deploy_recorder(&mut host, "spender", TRANSFER_RECEIVED);
    let token = NotifyToken::new();

    host.execute(owner, |h| h.approve(&spender, 30)).unwrap();
    let root = host.state_root().unwrap();
    let events = host.token().state().events().len();

    let err = host
        .execute(owner, |h| token.approve_and_notify(h, &spender, 99))
        .unwrap_err();

    assert_eq!(
        err,
        NotifyError::CallbackRejected {
            kind: CallbackKind::Approval,
            counterparty: spender,
            reason: RejectReason::UnexpectedReturn(TRANSFER_RECEIVED.to_vec()),
        }
    );
    // The spender saw the new allowance before refusing it.
    assert_eq!(contract.inner().approvals.borrow()[0].amount, 99);
    assert_eq!(host.token().allowance(&owner, &spender), 30);
    assert_eq!(host.state_root().unwrap(), root);
    assert_eq!(host.token().state().events().len(), events);
}
