//! Primitive field extractors.
//!
//! Every extractor is best-effort: a pattern miss is `None`, never an error.
//! Callers decide whether absence falls back to a default (amounts default to 0.0)
//! or stays null in the output row.

use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

// A masked number ("*********013") is kept verbatim, otherwise a run of exactly 9-12 digits.
// Three or more stars so USSD prefixes like "*165*S*" are not taken for a mask.
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{3,}\d+|\b\d{9,12}\b").unwrap());

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// First numeric run in `text` after dropping thousands separators
pub fn find_amount(text: &str) -> Option<f64> {
    let stripped = text.replace(',', "");
    NUMBER
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Like [`find_amount`] but a miss yields 0.0
pub fn parse_amount(text: &str) -> f64 {
    find_amount(text).unwrap_or(0.0)
}

/// Amount in capture group 1 of `pattern`, if the pattern matches
pub fn capture_amount(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| find_amount(m.as_str()))
}

/// First phone/account number run, masking characters preserved
pub fn parse_phone(text: &str) -> Option<String> {
    PHONE.find(text).map(|m| m.as_str().to_string())
}

/// Numeric value of an unmasked account number
pub fn account_number(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// Convert Unix milliseconds to a local `YYYY-MM-DD HH:MM:SS` string
pub fn parse_timestamp(raw: &str) -> Option<String> {
    format_timestamp_in(raw, &Local)
}

/// Convert Unix milliseconds to a `YYYY-MM-DD HH:MM:SS` string in `tz`
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let millis = raw.trim().parse::<i64>().ok()?;
    tz.timestamp_millis_opt(millis)
        .earliest()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

/// Trim and title-case a display name; blank input yields `None`
pub fn clean_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut prev_alpha = false;
    for c in trimmed.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    Some(out)
}
