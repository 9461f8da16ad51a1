use std::collections::HashMap;
use tracing::debug;

use crate::config::SelfPartyConfig;
use crate::constants::{
    make_id, AGENT_PREFIX, CUSTOMER_PREFIX, RECEIVER_LOG_PREFIX, SELF_KEY, SENDER_LOG_PREFIX,
    UNKNOWN_NAME,
};
use crate::domain::{Agent, Customer, LogKind, ReceiverLog, SenderLog};

/// Monotonic surrogate id generator for one entity kind
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    issued: usize,
}

impl IdSequence {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, issued: 0 }
    }

    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        make_id(self.prefix, self.issued)
    }

    pub fn issued(&self) -> usize {
        self.issued
    }
}

/// A deduplicated entity collection keyed by natural key
#[derive(Debug, Clone)]
pub struct EntityTable<T> {
    ids: IdSequence,
    rows: Vec<T>,
    index: HashMap<String, String>,
}

impl<T> EntityTable<T> {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            ids: IdSequence::new(prefix),
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Return the id mapped to `natural_key`, building and appending a new row on first sight.
    ///
    /// `build` receives the freshly assigned surrogate id and is only called for unseen keys.
    pub fn get_or_create<F>(&mut self, natural_key: &str, build: F) -> String
    where
        F: FnOnce(String) -> T,
    {
        if let Some(id) = self.index.get(natural_key) {
            return id.clone();
        }

        let id = self.ids.next_id();
        self.rows.push(build(id.clone()));
        self.index.insert(natural_key.to_string(), id.clone());
        id
    }

    pub fn lookup(&self, natural_key: &str) -> Option<&str> {
        self.index.get(natural_key).map(String::as_str)
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}

/// Identity registry for one pipeline run.
///
/// Sender and receiver logs are keyed by natural key alone: the first transaction
/// kind seen for a party fixes the log's `transaction_type`, and later kinds reuse it.
#[derive(Debug, Clone)]
pub struct Registry {
    pub customers: EntityTable<Customer>,
    pub agents: EntityTable<Agent>,
    pub sender_logs: EntityTable<SenderLog>,
    pub receiver_logs: EntityTable<ReceiverLog>,
    self_party: SelfPartyConfig,
}

impl Registry {
    pub fn new(self_party: SelfPartyConfig) -> Self {
        Self {
            customers: EntityTable::new(CUSTOMER_PREFIX),
            agents: EntityTable::new(AGENT_PREFIX),
            sender_logs: EntityTable::new(SENDER_LOG_PREFIX),
            receiver_logs: EntityTable::new(RECEIVER_LOG_PREFIX),
            self_party,
        }
    }

    pub fn self_party(&self) -> &SelfPartyConfig {
        &self.self_party
    }

    /// Customer id of the device owner, created on first use
    pub fn self_customer(&mut self) -> String {
        let name = self.self_party.display_name.clone();
        let number = self.self_party.account_number;
        self.customers.get_or_create(SELF_KEY, |customer_id| {
            debug!("Registered self customer {}", customer_id);
            Customer {
                customer_id,
                customer_name: name,
                customer_number: Some(number),
            }
        })
    }

    /// Customer id of a counterparty identified by its (possibly masked) number
    pub fn counterparty(&mut self, number: &str, name: Option<&str>) -> String {
        self.customers.get_or_create(number, |customer_id| {
            debug!("Registered customer {} for {}", customer_id, number);
            Customer {
                customer_id,
                customer_name: name.unwrap_or(UNKNOWN_NAME).to_string(),
                customer_number: number.parse().ok(),
            }
        })
    }

    pub fn agent(&mut self, number: &str, name: Option<&str>, agent_number: u64) -> String {
        self.agents.get_or_create(number, |agent_id| {
            debug!("Registered agent {} for {}", agent_id, number);
            Agent {
                agent_id,
                agent_name: name.unwrap_or(UNKNOWN_NAME).to_string(),
                agent_number,
            }
        })
    }

    pub fn sender_log(&mut self, natural_key: &str, customer_id: &str, kind: LogKind) -> String {
        self.sender_logs
            .get_or_create(natural_key, |sender_log_id| SenderLog {
                sender_log_id,
                customer_id: customer_id.to_string(),
                transaction_type: kind,
            })
    }

    pub fn receiver_log(&mut self, natural_key: &str, customer_id: &str, kind: LogKind) -> String {
        self.receiver_logs
            .get_or_create(natural_key, |receiver_log_id| ReceiverLog {
                receiver_log_id,
                customer_id: customer_id.to_string(),
                transaction_type: kind,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new(SelfPartyConfig::default())
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut table: EntityTable<String> = EntityTable::new("X");
        let mut builds = 0;

        let first = table.get_or_create("250791666666", |id| {
            builds += 1;
            id
        });
        let second = table.get_or_create("250791666666", |id| {
            builds += 1;
            id
        });

        assert_eq!(first, "X00001");
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        assert_eq!(builds, 1);
    }

    #[test]
    fn test_ids_follow_first_seen_order() {
        let mut table: EntityTable<String> = EntityTable::new("C");
        let ids: Vec<String> = ["a", "b", "a", "c"]
            .iter()
            .map(|k| table.get_or_create(k, |id| id))
            .collect();

        assert_eq!(ids, vec!["C00001", "C00002", "C00001", "C00003"]);
        assert_eq!(table.rows(), &["C00001", "C00002", "C00003"]);
    }

    #[test]
    fn test_self_customer_reused() {
        let mut reg = registry();
        let a = reg.self_customer();
        let b = reg.self_customer();

        assert_eq!(a, b);
        assert_eq!(reg.customers.len(), 1);
        let row = &reg.customers.rows()[0];
        assert_eq!(row.customer_name, "Self");
        assert_eq!(row.customer_number, Some(36521838));
    }

    #[test]
    fn test_masked_counterparty_has_no_account_number() {
        let mut reg = registry();
        let id = reg.counterparty("*********013", Some("Jane Smith"));

        assert_eq!(reg.customers.lookup("*********013"), Some(id.as_str()));
        assert_eq!(reg.customers.rows()[0].customer_number, None);
    }

    #[test]
    fn test_counterparty_without_name_is_unknown() {
        let mut reg = registry();
        reg.counterparty("250788123456", None);
        let row = &reg.customers.rows()[0];
        assert_eq!(row.customer_name, "Unknown");
        assert_eq!(row.customer_number, Some(250788123456));
    }

    #[test]
    fn test_sender_log_first_kind_wins() {
        // Logs are keyed by party only; a later payment reuses the transfer log.
        let mut reg = registry();
        let customer = reg.self_customer();
        let transfer_log = reg.sender_log(SELF_KEY, &customer, LogKind::Transfer);
        let payment_log = reg.sender_log(SELF_KEY, &customer, LogKind::Payment);

        assert_eq!(transfer_log, payment_log);
        assert_eq!(reg.sender_logs.len(), 1);
        assert_eq!(reg.sender_logs.rows()[0].transaction_type, LogKind::Transfer);
    }

    #[test]
    fn test_sender_and_receiver_logs_are_independent() {
        let mut reg = registry();
        let customer = reg.self_customer();
        let sl = reg.sender_log(SELF_KEY, &customer, LogKind::Transfer);
        let rl = reg.receiver_log(SELF_KEY, &customer, LogKind::Transfer);

        assert_eq!(sl, "SL00001");
        assert_eq!(rl, "RL00001");
    }

    #[test]
    fn test_id_sequence() {
        let mut seq = IdSequence::new("W");
        assert_eq!(seq.next_id(), "W00001");
        assert_eq!(seq.next_id(), "W00002");
        assert_eq!(seq.issued(), 2);
    }
}
