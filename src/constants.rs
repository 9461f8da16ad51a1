/// Surrogate key prefixes, one per entity collection.
/// Ids are formed as prefix + zero-padded counter, e.g. "C00001".
pub const CUSTOMER_PREFIX: &str = "C";
pub const AGENT_PREFIX: &str = "A";
pub const SENDER_LOG_PREFIX: &str = "SL";
pub const RECEIVER_LOG_PREFIX: &str = "RL";
pub const DEPOSIT_PREFIX: &str = "D";
pub const WITHDRAWAL_PREFIX: &str = "W";
pub const TRANSFER_PREFIX: &str = "T";
pub const PAYMENT_PREFIX: &str = "P";

/// Width of the zero-padded counter in every surrogate key
pub const ID_WIDTH: usize = 5;

/// Natural key under which the device owner is registered
pub const SELF_KEY: &str = "self";

// Defaults for the device owner's customer row
pub const DEFAULT_SELF_NAME: &str = "Self";
pub const DEFAULT_SELF_NUMBER: u64 = 36521838;

/// Display name used when a counterparty fragment matched but carried no name
pub const UNKNOWN_NAME: &str = "Unknown";

// Top-level keys of the output document (downstream load contract)
pub const CUSTOMER_KEY: &str = "Customer";
pub const AGENT_KEY: &str = "Agent";
pub const DEPOSIT_KEY: &str = "Deposit";
pub const WITHDRAWAL_KEY: &str = "Withdrawal";
pub const SENDER_LOG_KEY: &str = "Sender_Log";
pub const RECEIVER_LOG_KEY: &str = "Receiver_Log";
pub const TRANSFER_KEY: &str = "Transfer";
pub const PAYMENT_KEY: &str = "Payment";

/// All output collection keys, in serialization order
pub fn document_keys() -> Vec<&'static str> {
    vec![
        CUSTOMER_KEY,
        AGENT_KEY,
        DEPOSIT_KEY,
        WITHDRAWAL_KEY,
        SENDER_LOG_KEY,
        RECEIVER_LOG_KEY,
        TRANSFER_KEY,
        PAYMENT_KEY,
    ]
}

/// Format a surrogate key from a prefix and a 1-based counter value
pub fn make_id(prefix: &str, counter: usize) -> String {
    format!("{prefix}{counter:0width$}", width = ID_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_id_pads_counter() {
        assert_eq!(make_id(CUSTOMER_PREFIX, 1), "C00001");
        assert_eq!(make_id(SENDER_LOG_PREFIX, 42), "SL00042");
        assert_eq!(make_id(PAYMENT_PREFIX, 12345), "P12345");
    }

    #[test]
    fn test_document_keys_are_unique() {
        let keys = document_keys();
        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(keys.len(), 8);
        assert_eq!(deduped.len(), keys.len());
    }
}
