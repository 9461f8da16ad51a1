//! Message ingestion: reading an SMS export into [`SmsMessage`] records.
//!
//! The export is the JSON written by the upstream markup-to-JSON step, either
//! wrapped as `{"smses": [...]}` or as a bare array. Any read or parse failure
//! is fatal for the run.

use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{EtlError, Result};
use crate::types::{MessageSource, SmsMessage};

/// Path value meaning stdin for sources and stdout for output
pub const STDIO_PATH: &str = "-";

/// `{"smses": [...]}` as written by the export step
#[derive(Debug, Deserialize)]
struct WrappedExport {
    smses: Vec<SmsMessage>,
}

/// Parse an export document already held in memory.
///
/// The shape is picked from the first significant byte so a bad record reports
/// serde's own message with its line and column.
pub fn parse_export(source_id: &str, bytes: &[u8]) -> Result<Vec<SmsMessage>> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    let parsed = match first {
        Some(b'[') => serde_json::from_slice::<Vec<SmsMessage>>(bytes),
        _ => serde_json::from_slice::<WrappedExport>(bytes).map(|export| export.smses),
    };
    let messages = parsed.map_err(|e| EtlError::source_failure(source_id, e))?;
    debug!("Parsed {} messages from {}", messages.len(), source_id);
    Ok(messages)
}

/// JSON export on disk (or stdin for `-`)
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIO_PATH
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        if self.is_stdin() {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| EtlError::source_failure(self.source_id(), e))?;
            return Ok(buf);
        }
        fs::read(&self.path).map_err(|e| EtlError::source_failure(self.source_id(), e))
    }
}

impl MessageSource for JsonFileSource {
    fn source_id(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    fn messages(&self) -> Result<Vec<SmsMessage>> {
        let source_id = self.source_id();
        info!("📥 Reading messages from {}", source_id);
        let bytes = self.read_bytes()?;
        parse_export(&source_id, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_wrapped_export() {
        let doc = json!({
            "smses": [
                {
                    "protocol": "0",
                    "address": "M-Money",
                    "date": "1715351458724",
                    "body": "You have received 2000 RWF from Jane Smith (*********013).",
                    "readable_date": "10 May 2024 4:30:58 PM",
                    "contact_name": "(Unknown)"
                }
            ]
        });

        let messages = parse_export("test", doc.to_string().as_bytes()).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].date, "1715351458724");
        assert_eq!(messages[0].address.as_deref(), Some("M-Money"));
    }

    #[test]
    fn test_parse_bare_array_with_missing_fields() {
        let doc = json!([{ "body": "hello" }, {}]);

        let messages = parse_export("test", doc.to_string().as_bytes()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "hello");
        assert_eq!(messages[0].date, "");
        assert_eq!(messages[1], SmsMessage::default());
    }

    #[test]
    fn test_malformed_export_is_source_error() {
        let err = parse_export("broken.json", b"{ not json").unwrap_err();
        match err {
            EtlError::Source { source_id, .. } => assert_eq!(source_id, "broken.json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_record_error_names_type_and_position() {
        let doc = br#"{"smses": [{"body": "ok"}, {"body": 5}]}"#;

        let err = parse_export("momo.json", doc).unwrap_err().to_string();

        assert!(err.contains("momo.json"), "{err}");
        assert!(err.contains("invalid type: integer `5`"), "{err}");
        assert!(err.contains("line 1 column"), "{err}");
    }

    #[test]
    fn test_bad_record_in_bare_array_keeps_cause() {
        let doc = b"[\n  {\"body\": \"ok\"},\n  {\"date\": false}\n]";

        let err = parse_export("bare.json", doc).unwrap_err().to_string();

        assert!(err.contains("invalid type: boolean `false`"), "{err}");
        assert!(err.contains("line 3"), "{err}");
    }

    #[test]
    fn test_object_without_smses_is_error() {
        let err = parse_export("empty.json", b"{}").unwrap_err().to_string();
        assert!(err.contains("missing field `smses`"), "{err}");
    }

    #[test]
    fn test_file_source_reads_export() {
        let mut file = NamedTempFile::new().unwrap();
        let export = r#"{"smses": [{"body": "x", "date": "1", "readable_date": "r"}]}"#;
        file.write_all(export.as_bytes()).unwrap();

        let source = JsonFileSource::new(file.path());
        let messages = source.messages().unwrap();
        assert_eq!(messages, vec![SmsMessage::new("x", "1", "r")]);
    }

    #[test]
    fn test_missing_file_names_the_source() {
        let source = JsonFileSource::new("/no/such/export.json");
        let err = source.messages().unwrap_err();
        assert!(err.to_string().contains("/no/such/export.json"));
    }
}
