use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{amount_near, fee_was, new_balance, Ledger};
use crate::constants::SELF_KEY;
use crate::domain::{LogKind, Payment};
use crate::pipeline::processing::extract::{clean_name, parse_timestamp};
use crate::pipeline::processing::registry::Registry;
use crate::types::SmsMessage;

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)payment of ([\d,]+(?:\.\d+)?)").unwrap());
// Payee name followed by a merchant/account code of at least three digits.
// The name is matched lazily so it stops at the first code.
static PAYEE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bto ([\w ]+?) (\d{3,})\b").unwrap());

/// Device owner pays a merchant or person
pub fn build(message: &SmsMessage, registry: &mut Registry, ledger: &mut Ledger) -> String {
    let body = &message.body;

    let (payee_name, payee_number) = match PAYEE.captures(body) {
        Some(caps) => (
            caps.get(1).and_then(|m| clean_name(m.as_str())),
            caps.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (None, None),
    };

    let self_id = registry.self_customer();
    let sender_log_id = registry.sender_log(SELF_KEY, &self_id, LogKind::Payment);

    let receiver_log_id = payee_number.as_deref().map(|number| {
        let customer_id = registry.counterparty(number, payee_name.as_deref());
        registry.receiver_log(number, &customer_id, LogKind::Payment)
    });

    let payment = Payment {
        payment_id: ledger.next_payment_id(),
        receiver_log_id,
        sender_log_id: Some(sender_log_id),
        amount: amount_near(&AMOUNT, body),
        fee: fee_was(body),
        new_balance: new_balance(body),
        time_stamp: parse_timestamp(&message.date),
        readable_date: message.readable_date.clone(),
        payment_type: None,
    };

    debug!("Built payment {} amount={}", payment.payment_id, payment.amount);
    let id = payment.payment_id.clone();
    ledger.payments.push(payment);
    id
}
