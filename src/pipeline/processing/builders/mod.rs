//! One transaction builder per message kind.
//!
//! Builders read a classified message, resolve or create the parties they need in
//! the [`Registry`], and append exactly one transaction row to the [`Ledger`].
//! Rows are never revisited once appended.

pub mod deposit;
pub mod payment;
pub mod transfer;
pub mod withdrawal;

use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::MessageKind;
use super::extract::{capture_amount, parse_amount};
use super::registry::{IdSequence, Registry};
use crate::constants::{DEPOSIT_PREFIX, PAYMENT_PREFIX, TRANSFER_PREFIX, WITHDRAWAL_PREFIX};
use crate::domain::{Deposit, Payment, Transfer, Withdrawal};
use crate::types::SmsMessage;

static NEW_BALANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)new balance[: ]*([\d,]+(?:\.\d+)?)").unwrap());
// "Fee was: 100" on transfers, "Fee was 0" on payments
static FEE_WAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)fee was:? *([\d,]+(?:\.\d+)?)").unwrap());

/// Append-only transaction collections with their id sequences
#[derive(Debug, Clone)]
pub struct Ledger {
    deposit_ids: IdSequence,
    withdrawal_ids: IdSequence,
    transfer_ids: IdSequence,
    payment_ids: IdSequence,
    pub deposits: Vec<Deposit>,
    pub withdrawals: Vec<Withdrawal>,
    pub transfers: Vec<Transfer>,
    pub payments: Vec<Payment>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            deposit_ids: IdSequence::new(DEPOSIT_PREFIX),
            withdrawal_ids: IdSequence::new(WITHDRAWAL_PREFIX),
            transfer_ids: IdSequence::new(TRANSFER_PREFIX),
            payment_ids: IdSequence::new(PAYMENT_PREFIX),
            deposits: Vec::new(),
            withdrawals: Vec::new(),
            transfers: Vec::new(),
            payments: Vec::new(),
        }
    }

    pub fn next_deposit_id(&mut self) -> String {
        self.deposit_ids.next_id()
    }

    pub fn next_withdrawal_id(&mut self) -> String {
        self.withdrawal_ids.next_id()
    }

    pub fn next_transfer_id(&mut self) -> String {
        self.transfer_ids.next_id()
    }

    pub fn next_payment_id(&mut self) -> String {
        self.payment_ids.next_id()
    }
}

/// Run the builder for `kind` and return the id of the appended transaction
pub fn build_transaction(
    kind: MessageKind,
    message: &SmsMessage,
    registry: &mut Registry,
    ledger: &mut Ledger,
) -> String {
    match kind {
        MessageKind::Deposit => deposit::build(message, registry, ledger),
        MessageKind::Withdrawal => withdrawal::build(message, registry, ledger),
        MessageKind::TransferSend => transfer::build_send(message, registry, ledger),
        MessageKind::TransferReceive => transfer::build_receive(message, registry, ledger),
        MessageKind::Payment => payment::build(message, registry, ledger),
    }
}

/// Amount tied to the kind's phrase, else the first numeric run, else 0.0
pub(crate) fn amount_near(phrase: &Regex, body: &str) -> f64 {
    capture_amount(phrase, body).unwrap_or_else(|| parse_amount(body))
}

pub(crate) fn new_balance(body: &str) -> Option<f64> {
    capture_amount(&NEW_BALANCE, body)
}

pub(crate) fn fee_was(body: &str) -> Option<f64> {
    capture_amount(&FEE_WAS, body)
}
