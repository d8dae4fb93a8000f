//! Validity timestamp parsing
//!
//! OpenSSL renders ASN.1 times as `Mon DD HH:MM:SS YYYY GMT`. The check keeps
//! that text for its report and converts it to Unix seconds for comparison.

use chrono::{DateTime, NaiveDateTime};
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::error::ErrorStack;
use thiserror::Error;

const OPENSSL_TIME_FORMAT: &str = "%b %d %H:%M:%S%.f %Y";
const UTC_ZONES: [&str; 3] = ["GMT", "UTC", "Z"];

/// Raw timestamp text that does not resolve to a calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unparsable timestamp: {raw:?}")]
pub struct TimeParseError {
    pub raw: String,
}

/// Parse a textual timestamp into seconds since the Unix epoch.
///
/// Accepts the OpenSSL display form with an optional `GMT`/`UTC`/`Z` zone and
/// RFC 3339. Any other zone is rejected, as its offset cannot be resolved.
pub fn parse_timestamp(raw: &str) -> Result<i64, TimeParseError> {
    let failure = || TimeParseError {
        raw: raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(dt.timestamp());
    }

    let mut fields: Vec<&str> = raw.split_whitespace().collect();
    if fields.len() == 5 {
        let zone = fields.pop().ok_or_else(failure)?;
        if !UTC_ZONES.iter().any(|utc| utc.eq_ignore_ascii_case(zone)) {
            return Err(failure());
        }
    }
    if fields.len() != 4 {
        return Err(failure());
    }

    NaiveDateTime::parse_from_str(&fields.join(" "), OPENSSL_TIME_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|_| failure())
}

/// Convert ASN1Time to Unix timestamp
pub fn asn1_time_to_unix(asn1_time: &Asn1TimeRef) -> Result<i64, ErrorStack> {
    // ASN1Time has no direct conversion, so measure the distance from the epoch
    let epoch = Asn1Time::from_unix(0)?;
    let diff = epoch.diff(asn1_time)?;

    Ok(i64::from(diff.days) * 86_400 + i64::from(diff.secs))
}
