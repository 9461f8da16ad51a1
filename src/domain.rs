//! Normalized entity rows and the output document handed to the bulk loader.
//!
//! Field names are the column names of the downstream relational schema and must
//! not change without a matching change on the loading side.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    /// None when the source only showed a masked number
    pub customer_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    pub agent_name: String,
    pub agent_number: u64,
}

/// Transaction kind recorded on a sender/receiver log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Transfer,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderLog {
    pub sender_log_id: String,
    pub customer_id: String,
    pub transaction_type: LogKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverLog {
    pub receiver_log_id: String,
    pub customer_id: String,
    pub transaction_type: LogKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub deposit_id: String,
    pub customer_id: String,
    pub amount: f64,
    pub time_stamp: Option<String>,
    pub readable_date: String,
    pub new_balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub withdraw_id: String,
    pub agent_id: Option<String>,
    pub customer_id: String,
    pub amount: f64,
    pub fee: Option<f64>,
    pub new_balance: Option<f64>,
    pub time_stamp: Option<String>,
    pub readable_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    Send,
    Receive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub transfer_id: String,
    pub receiver_log_id: Option<String>,
    pub sender_log_id: Option<String>,
    pub amount: f64,
    pub fee: Option<f64>,
    pub recipient_name: Option<String>,
    pub recipient_number: Option<u64>,
    pub new_balance: Option<f64>,
    pub transfer_type: TransferDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    pub receiver_log_id: Option<String>,
    pub sender_log_id: Option<String>,
    pub amount: f64,
    pub fee: Option<f64>,
    pub new_balance: Option<f64>,
    pub time_stamp: Option<String>,
    pub readable_date: String,
    // TODO: populate once merchant vs. bill payments can be told apart in message bodies
    pub payment_type: Option<String>,
}

/// All entity collections produced by one pipeline run, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    #[serde(rename = "Customer")]
    pub customers: Vec<Customer>,
    #[serde(rename = "Agent")]
    pub agents: Vec<Agent>,
    #[serde(rename = "Deposit")]
    pub deposits: Vec<Deposit>,
    #[serde(rename = "Withdrawal")]
    pub withdrawals: Vec<Withdrawal>,
    #[serde(rename = "Sender_Log")]
    pub sender_logs: Vec<SenderLog>,
    #[serde(rename = "Receiver_Log")]
    pub receiver_logs: Vec<ReceiverLog>,
    #[serde(rename = "Transfer")]
    pub transfers: Vec<Transfer>,
    #[serde(rename = "Payment")]
    pub payments: Vec<Payment>,
}

impl EntityDocument {
    pub fn transaction_count(&self) -> usize {
        self.deposits.len() + self.withdrawals.len() + self.transfers.len() + self.payments.len()
    }

    pub fn entity_count(&self) -> usize {
        self.customers.len()
            + self.agents.len()
            + self.sender_logs.len()
            + self.receiver_logs.len()
            + self.transaction_count()
    }
}
