use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{amount_near, new_balance, Ledger};
use crate::domain::Withdrawal;
use crate::pipeline::processing::extract::{
    account_number, capture_amount, clean_name, parse_timestamp,
};
use crate::pipeline::processing::registry::Registry;
use crate::types::SmsMessage;

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)withdrawn ([\d,]+(?:\.\d+)?)").unwrap());
static FEE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)fee paid: ([\d,]+(?:\.\d+)?)").unwrap());
static AGENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)agent: ([\w ]+) \((\d+)\)").unwrap());

/// Cash-out through an agent, debiting the device owner
pub fn build(message: &SmsMessage, registry: &mut Registry, ledger: &mut Ledger) -> String {
    let body = &message.body;

    let agent_id = AGENT.captures(body).and_then(|caps| {
        let number = caps.get(2)?.as_str();
        let agent_number = account_number(number)?;
        let name = caps.get(1).and_then(|m| clean_name(m.as_str()));
        Some(registry.agent(number, name.as_deref(), agent_number))
    });
    let customer_id = registry.self_customer();

    let withdrawal = Withdrawal {
        withdraw_id: ledger.next_withdrawal_id(),
        agent_id,
        customer_id,
        amount: amount_near(&AMOUNT, body),
        fee: capture_amount(&FEE, body),
        new_balance: new_balance(body),
        time_stamp: parse_timestamp(&message.date),
        readable_date: message.readable_date.clone(),
    };

    debug!(
        "Built withdrawal {} amount={} agent={:?}",
        withdrawal.withdraw_id, withdrawal.amount, withdrawal.agent_id
    );
    let id = withdrawal.withdraw_id.clone();
    ledger.withdrawals.push(withdrawal);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelfPartyConfig;

    const BODY: &str = "You Abebe Chala CHEBUDIE (*********036) have via agent: Agent Sophia (250790777777), withdrawn 20,000 RWF from your mobile money account: 36521838 at 2024-05-26 02:10:27 and you can now collect your money in cash. Your new balance: 6400 RWF. Fee paid: 350 RWF.";

    #[test]
    fn test_withdrawal_via_agent() {
        let mut registry = Registry::new(SelfPartyConfig::default());
        let mut ledger = Ledger::new();

        let message = SmsMessage::new(BODY, "1716682227000", "26 May 2024 2:10:27 AM");

        build(&message, &mut registry, &mut ledger);

        let w = &ledger.withdrawals[0];
        assert_eq!(w.withdraw_id, "W00001");
        assert_eq!(w.amount, 20000.0);
        assert_eq!(w.fee, Some(350.0));
        assert_eq!(w.new_balance, Some(6400.0));
        assert_eq!(w.agent_id.as_deref(), Some("A00001"));

        let agent = &registry.agents.rows()[0];
        assert_eq!(agent.agent_name, "Agent Sophia");
        assert_eq!(agent.agent_number, 250790777777);
    }

    #[test]
    fn test_repeat_agent_is_reused() {
        let mut registry = Registry::new(SelfPartyConfig::default());
        let mut ledger = Ledger::new();
        let message = SmsMessage::new(BODY, "1716682227000", "");

        build(&message, &mut registry, &mut ledger);
        build(&message, &mut registry, &mut ledger);

        assert_eq!(registry.agents.len(), 1);
        assert_eq!(ledger.withdrawals.len(), 2);
        assert_eq!(ledger.withdrawals[1].agent_id.as_deref(), Some("A00001"));
        assert_eq!(ledger.withdrawals[1].withdraw_id, "W00002");
    }

    #[test]
    fn test_withdrawal_without_agent_has_null_fk() {
        let mut registry = Registry::new(SelfPartyConfig::default());
        let mut ledger = Ledger::new();

        let message = SmsMessage::new("Withdrawal of 1000 RWF processed", "", "");

        build(&message, &mut registry, &mut ledger);

        let w = &ledger.withdrawals[0];
        assert_eq!(w.agent_id, None);
        assert_eq!(w.fee, None);
        assert_eq!(w.amount, 1000.0);
        assert!(registry.agents.is_empty());
    }
}
