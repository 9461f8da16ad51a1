use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// The transaction kinds a message body can be classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MessageKind {
    Deposit,
    Withdrawal,
    TransferSend,
    TransferReceive,
    Payment,
}

impl MessageKind {
    pub const ALL: [MessageKind; 5] = [
        MessageKind::Deposit,
        MessageKind::Withdrawal,
        MessageKind::TransferSend,
        MessageKind::TransferReceive,
        MessageKind::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::TransferSend => "transfer_send",
            Self::TransferReceive => "transfer_receive",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a matched rule turns into a concrete kind
enum Resolution {
    Fixed(MessageKind),
    /// Transfer family: direction decided by which sub-phrase is present
    TransferDirection,
}

struct ClassifierRule {
    name: &'static str,
    pattern: Regex,
    resolution: Resolution,
}

// Priority order matters: the first matching rule wins
static RULES: Lazy<Vec<ClassifierRule>> = Lazy::new(|| {
    vec![
        ClassifierRule {
            name: "deposit",
            pattern: Regex::new(r"(?i)deposit of").unwrap(),
            resolution: Resolution::Fixed(MessageKind::Deposit),
        },
        ClassifierRule {
            name: "withdrawal",
            pattern: Regex::new(r"(?i)withdrawn|withdrawal").unwrap(),
            resolution: Resolution::Fixed(MessageKind::Withdrawal),
        },
        ClassifierRule {
            name: "transfer",
            // Receive bodies put the amount between the words: "received 2000 RWF from"
            pattern: Regex::new(r"(?i)transferred to|received (?:[\d,.]+ RWF )?from").unwrap(),
            resolution: Resolution::TransferDirection,
        },
        ClassifierRule {
            name: "payment",
            pattern: Regex::new(r"(?i)your payment of").unwrap(),
            resolution: Resolution::Fixed(MessageKind::Payment),
        },
    ]
});

static TRANSFER_SEND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)transferred to").unwrap());

/// Classify a message body; `None` means the message is not a recognized transaction
pub fn classify(body: &str) -> Option<MessageKind> {
    let rule = RULES.iter().find(|rule| rule.pattern.is_match(body))?;
    tracing::trace!(rule = rule.name, "classifier rule matched");

    Some(match rule.resolution {
        Resolution::Fixed(kind) => kind,
        Resolution::TransferDirection if TRANSFER_SEND.is_match(body) => MessageKind::TransferSend,
        Resolution::TransferDirection => MessageKind::TransferReceive,
    })
}
