use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{amount_near, new_balance, Ledger};
use crate::domain::Deposit;
use crate::pipeline::processing::extract::parse_timestamp;
use crate::pipeline::processing::registry::Registry;
use crate::types::SmsMessage;

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)deposit of ([\d,]+(?:\.\d+)?)").unwrap());

/// Deposits always credit the device owner
pub fn build(message: &SmsMessage, registry: &mut Registry, ledger: &mut Ledger) -> String {
    let body = &message.body;
    let customer_id = registry.self_customer();

    let deposit = Deposit {
        deposit_id: ledger.next_deposit_id(),
        customer_id,
        amount: amount_near(&AMOUNT, body),
        time_stamp: parse_timestamp(&message.date),
        readable_date: message.readable_date.clone(),
        new_balance: new_balance(body),
    };

    debug!("Built deposit {} amount={}", deposit.deposit_id, deposit.amount);
    let id = deposit.deposit_id.clone();
    ledger.deposits.push(deposit);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelfPartyConfig;

    #[test]
    fn test_bank_deposit() {
        let mut registry = Registry::new(SelfPartyConfig::default());
        let mut ledger = Ledger::new();
        let message = SmsMessage::new(
            "*113*R*A bank deposit of 40,000 RWF has been added to your mobile money account at 2024-05-11 18:43:49. Your new balance: 50,000 RWF. Cash Deposit::CASH::::0::250795963036.",
            "1715445829000",
            "11 May 2024 6:43:49 PM",
        );

        let id = build(&message, &mut registry, &mut ledger);

        assert_eq!(id, "D00001");
        let deposit = &ledger.deposits[0];
        assert_eq!(deposit.amount, 40000.0);
        assert_eq!(deposit.new_balance, Some(50000.0));
        assert_eq!(deposit.customer_id, "C00001");
        assert_eq!(deposit.readable_date, "11 May 2024 6:43:49 PM");
        assert!(deposit.time_stamp.is_some());
    }

    #[test]
    fn test_deposit_with_bad_date_keeps_row() {
        let mut registry = Registry::new(SelfPartyConfig::default());
        let mut ledger = Ledger::new();
        let message = SmsMessage::new("A deposit of 500 RWF", "garbage", "");

        build(&message, &mut registry, &mut ledger);

        let deposit = &ledger.deposits[0];
        assert_eq!(deposit.amount, 500.0);
        assert_eq!(deposit.time_stamp, None);
        assert_eq!(deposit.new_balance, None);
    }
}
