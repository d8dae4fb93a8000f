//! Revocation list records

use crate::time::{parse_timestamp, TimeParseError};
use crate::{file_name_of, Result};
use openssl::x509::X509Crl;
use std::fs;
use std::path::Path;

/// Validity window of a CRL, kept as the text OpenSSL renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrlRecord {
    pub file_name: String,
    pub last_update_raw: String,
    /// Empty when the CRL carries no nextUpdate
    pub next_update_raw: String,
}

impl CrlRecord {
    /// Read a CRL file, PEM first, then DER
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::from_bytes(file_name_of(path)?, &data)
    }

    pub fn from_bytes(file_name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let crl = X509Crl::from_pem(data).or_else(|_| X509Crl::from_der(data))?;

        Ok(Self {
            file_name: file_name.into(),
            last_update_raw: crl.last_update().to_string(),
            next_update_raw: crl
                .next_update()
                .map(ToString::to_string)
                .unwrap_or_default(),
        })
    }

    pub fn last_update(&self) -> std::result::Result<i64, TimeParseError> {
        parse_timestamp(&self.last_update_raw)
    }

    pub fn next_update(&self) -> std::result::Result<i64, TimeParseError> {
        parse_timestamp(&self.next_update_raw)
    }
}
