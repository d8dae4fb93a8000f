//! Certificate and CRL primitives for the trust-store check
//!
//! Reads root certificates and revocation lists with OpenSSL, derives the
//! subject-name hash used to name CRL files, and turns the textual validity
//! fields back into comparable Unix timestamps.

use thiserror::Error;

pub mod certificate;
pub mod crl;
pub mod hash;
pub mod time;

pub use certificate::CertificateRecord;
pub use crl::CrlRecord;
pub use hash::{crl_file_name, subject_hash};
pub use time::{parse_timestamp, TimeParseError};

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse: {0}")]
    Parse(#[from] openssl::error::ErrorStack),

    #[error("Invalid file name: {0}")]
    FileName(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Name of the file a path points at, as used in reports.
pub(crate) fn file_name_of(path: &std::path::Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| CryptoError::FileName(path.display().to_string()))
}
