use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One SMS notification as produced by the upstream export step.
///
/// Only `body`, `date` and `readable_date` are read by the transformer; the
/// other attributes are carried so a full export deserializes cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmsMessage {
    #[serde(default)]
    pub body: String,
    /// Unix epoch milliseconds, as a string
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub readable_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_sent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
}

impl SmsMessage {
    pub fn new(
        body: impl Into<String>,
        date: impl Into<String>,
        readable_date: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            date: date.into(),
            readable_date: readable_date.into(),
            ..Self::default()
        }
    }
}

/// Core trait that every message source must implement
pub trait MessageSource {
    /// Identifier used in logs and error reports (a path, "stdin", ...)
    fn source_id(&self) -> String;

    /// Read the complete message stream in arrival order.
    /// Any failure here is fatal for the run.
    fn messages(&self) -> Result<Vec<SmsMessage>>;
}

/// In-memory source, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    pub messages: Vec<SmsMessage>,
}

impl VecSource {
    pub fn new(messages: Vec<SmsMessage>) -> Self {
        Self { messages }
    }
}

impl MessageSource for VecSource {
    fn source_id(&self) -> String {
        "memory".to_string()
    }

    fn messages(&self) -> Result<Vec<SmsMessage>> {
        Ok(self.messages.clone())
    }
}
