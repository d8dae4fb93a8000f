//! Root certificate records
//!
//! Reads a PEM root certificate and keeps what the check needs from it:
//! subject, expiry and the subject-name hash locating its CRL.

use crate::hash::subject_hash;
use crate::time::asn1_time_to_unix;
use crate::{file_name_of, Result};
use openssl::x509::{X509NameRef, X509};
use std::fs;
use std::path::Path;

/// A root certificate read from the trust directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub file_name: String,
    pub subject: String,
    /// Expiry as a Unix timestamp
    pub not_after: i64,
    pub not_after_raw: String,
    pub hash: String,
}

impl CertificateRecord {
    /// Read and parse a certificate file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cert_pem = fs::read(path)?;
        Self::from_pem(file_name_of(path)?, &cert_pem)
    }

    /// Parse a certificate already held in memory
    pub fn from_pem(file_name: impl Into<String>, cert_pem: &[u8]) -> Result<Self> {
        let cert = X509::from_pem(cert_pem)?;
        let not_after = cert.not_after();

        Ok(Self {
            file_name: file_name.into(),
            subject: format_name(cert.subject_name()),
            not_after: asn1_time_to_unix(not_after)?,
            not_after_raw: not_after.to_string(),
            hash: subject_hash(&cert),
        })
    }

    /// True once `now` has reached the certificate's notAfter
    pub const fn is_expired(&self, now: i64) -> bool {
        now >= self.not_after
    }
}

/// One-line distinguished name, `O=Example, CN=Example Root` style
fn format_name(name: &X509NameRef) -> String {
    name.entries()
        .map(|entry| {
            let key = entry.object().nid().short_name().unwrap_or("UNDEF");
            let value = entry
                .data()
                .as_utf8()
                .map(|data| data.to_string())
                .unwrap_or_default();
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_pem_reads_subject_and_expiry() {
        let record =
            CertificateRecord::from_pem("alpha.pem", include_bytes!("../../../testdata/alpha.pem"))
                .unwrap();

        assert_eq!(record.file_name, "alpha.pem");
        assert_eq!(record.subject, "O=Crlwatch Test, CN=Alpha Root CA");
        assert_eq!(record.not_after, 2_524_607_999);
        assert_eq!(record.not_after_raw, "Dec 31 23:59:59 2049 GMT");
        assert_eq!(record.hash, "4bed4a22");
    }

    #[test]
    fn test_is_expired() {
        let record = CertificateRecord::from_pem(
            "expired.pem",
            include_bytes!("../../../testdata/expired.pem"),
        )
        .unwrap();

        assert_eq!(record.not_after, 1_293_839_999);
        assert!(record.is_expired(1_792_368_000));
        assert!(record.is_expired(record.not_after));
        assert!(!record.is_expired(record.not_after - 1));
    }

    #[test]
    fn test_load_uses_file_name() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(include_bytes!("../../../testdata/gamma.pem"))
            .unwrap();

        let record = CertificateRecord::load(file.path()).unwrap();
        assert_eq!(
            record.file_name,
            file.path().file_name().unwrap().to_str().unwrap()
        );
        assert_eq!(record.hash, "9527d0d1");
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = CertificateRecord::from_pem("junk.pem", b"not a certificate");
        assert!(matches!(result, Err(crate::CryptoError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CertificateRecord::load("/nonexistent/path/root.pem");
        assert!(matches!(result, Err(crate::CryptoError::Io(_))));
    }
}
