//! Subject-name hash used by the `c_rehash` trust-store layout.
//!
//! A CRL for a root lives next to it as `<hash>.r0`, where `<hash>` is the
//! same value `openssl x509 -hash` prints.

use openssl::x509::X509Ref;

/// Lowercase hex subject-name hash of a certificate.
pub fn subject_hash(cert: &X509Ref) -> String {
    format!("{:08x}", cert.subject_name_hash())
}

/// File name the CRL for `hash` is expected under.
pub fn crl_file_name(hash: &str, suffix: &str) -> String {
    format!("{hash}{suffix}")
}
