use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{amount_near, fee_was, new_balance, Ledger};
use crate::constants::SELF_KEY;
use crate::domain::{LogKind, Transfer, TransferDirection};
use crate::pipeline::processing::extract::{account_number, clean_name, parse_phone};
use crate::pipeline::processing::registry::Registry;
use crate::types::SmsMessage;

static SEND_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d,]+(?:\.\d+)?) RWF transferred to").unwrap());
static RECIPIENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)transferred to ([\w ]+) \(([\d*]+)\)").unwrap());
static RECEIVE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)received ([\d,]+(?:\.\d+)?) RWF from").unwrap());
static SENDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)received [\d,]+(?:\.\d+)? RWF from ([\w ]+) \(([\d*]+)\)").unwrap()
});
// Counterparty given as a bare number right after the phrase, without a name
static RECIPIENT_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)transferred to (\S+)").unwrap());
static SENDER_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)received [\d,]+(?:\.\d+)? RWF from (\S+)").unwrap());

/// Counterparty (display name, number) from a `<Name> (<number>)` fragment.
///
/// The parenthesized number is the natural key verbatim, whatever its length.
/// Without that fragment only a bare phone number after the phrase is accepted.
fn counterparty(named: &Regex, bare: &Regex, body: &str) -> (Option<String>, Option<String>) {
    if let Some(caps) = named.captures(body) {
        let number = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|n| !n.is_empty());
        return (caps.get(1).and_then(|m| clean_name(m.as_str())), number);
    }

    let number = bare
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_phone(m.as_str()));
    (None, number)
}

/// Device owner sends money to a named counterparty
pub fn build_send(message: &SmsMessage, registry: &mut Registry, ledger: &mut Ledger) -> String {
    let body = &message.body;
    let (recipient_name, recipient_number) = counterparty(&RECIPIENT, &RECIPIENT_BARE, body);

    let self_id = registry.self_customer();
    let sender_log_id = registry.sender_log(SELF_KEY, &self_id, LogKind::Transfer);

    let receiver_log_id = recipient_number.as_deref().map(|number| {
        let customer_id = registry.counterparty(number, recipient_name.as_deref());
        registry.receiver_log(number, &customer_id, LogKind::Transfer)
    });

    let transfer = Transfer {
        transfer_id: ledger.next_transfer_id(),
        receiver_log_id,
        sender_log_id: Some(sender_log_id),
        amount: amount_near(&SEND_AMOUNT, body),
        fee: fee_was(body),
        recipient_number: recipient_number.as_deref().and_then(account_number),
        recipient_name,
        new_balance: new_balance(body),
        transfer_type: TransferDirection::Send,
    };

    debug!("Built transfer {} (send) amount={}", transfer.transfer_id, transfer.amount);
    let id = transfer.transfer_id.clone();
    ledger.transfers.push(transfer);
    id
}

/// Device owner receives money from a (usually masked) counterparty
pub fn build_receive(
    message: &SmsMessage,
    registry: &mut Registry,
    ledger: &mut Ledger,
) -> String {
    let body = &message.body;
    let (sender_name, sender_number) = counterparty(&SENDER, &SENDER_BARE, body);

    let self_id = registry.self_customer();

    let sender_log_id = sender_number.as_deref().map(|number| {
        let customer_id = registry.counterparty(number, sender_name.as_deref());
        registry.sender_log(number, &customer_id, LogKind::Transfer)
    });
    let receiver_log_id = registry.receiver_log(SELF_KEY, &self_id, LogKind::Transfer);

    let owner = registry.self_party();
    let transfer = Transfer {
        transfer_id: ledger.next_transfer_id(),
        receiver_log_id: Some(receiver_log_id),
        sender_log_id,
        amount: amount_near(&RECEIVE_AMOUNT, body),
        fee: None,
        recipient_name: Some(owner.display_name.clone()),
        recipient_number: Some(owner.account_number),
        new_balance: new_balance(body),
        transfer_type: TransferDirection::Receive,
    };

    debug!("Built transfer {} (receive) amount={}", transfer.transfer_id, transfer.amount);
    let id = transfer.transfer_id.clone();
    ledger.transfers.push(transfer);
    id
}
