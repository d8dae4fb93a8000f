//! Per-certificate evaluation
//!
//! Classifies one root and its CRL into zero or more findings. A CRL date
//! that cannot be parsed is not a finding: it aborts the whole run.

use crate::status::Status;
use crate::store::TrustStore;
use crlwatch_crypto::{crl_file_name, CertificateRecord, CryptoError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    RootExpired,
    CrlMissing { crl_file: String },
    CrlNotYetValid { last_update: String },
    CrlExpired { next_update: String },
}

/// One integrity problem found for a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file_name: String,
    pub subject: String,
    pub kind: ProblemKind,
    pub severity: Status,
}

impl Finding {
    fn new(cert: &CertificateRecord, kind: ProblemKind, severity: Status) -> Self {
        Self {
            file_name: cert.file_name.clone(),
            subject: cert.subject.clone(),
            kind,
            severity,
        }
    }

    /// Report line for this finding
    pub fn detail(&self) -> String {
        let target = format!("{} {}", self.file_name, self.subject);
        match &self.kind {
            ProblemKind::RootExpired => format!("Root certificate expired for: {target}."),
            ProblemKind::CrlMissing { crl_file } => {
                format!("CRL file {crl_file} not found for: {target}.")
            }
            ProblemKind::CrlNotYetValid { last_update } => {
                format!("CRL not yet valid for: {target} ({last_update}).")
            }
            ProblemKind::CrlExpired { next_update } => {
                format!("CRL expired for: {target} ({next_update}).")
            }
        }
    }
}

/// Conditions that make the whole run UNKNOWN
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Unable to read certificate {file}: {source}")]
    Certificate {
        file: String,
        #[source]
        source: CryptoError,
    },

    #[error("Unable to read CRL {crl_file} for {file}: {source}")]
    Crl {
        file: String,
        crl_file: String,
        #[source]
        source: CryptoError,
    },

    #[error("Unable to parse CRL start date for {file}: '{raw}'")]
    StartDate { file: String, raw: String },

    #[error("Unable to parse CRL end date for {file}: '{raw}'")]
    EndDate { file: String, raw: String },
}

pub struct Evaluator<'a, S: TrustStore> {
    store: &'a S,
    crl_suffix: &'a str,
    severity: Status,
}

impl<'a, S: TrustStore> Evaluator<'a, S> {
    pub const fn new(store: &'a S, crl_suffix: &'a str, warn_only: bool) -> Self {
        Self {
            store,
            crl_suffix,
            severity: Status::for_finding(warn_only),
        }
    }

    /// Evaluate one certificate file against `now` (Unix seconds).
    ///
    /// All checks run; findings are not mutually exclusive. A missing CRL
    /// skips the date checks, since there are no dates to read.
    pub fn evaluate(&self, file_name: &str, now: i64) -> Result<Vec<Finding>, EvaluationError> {
        let cert = self
            .store
            .load_certificate(file_name)
            .map_err(|source| EvaluationError::Certificate {
                file: file_name.to_string(),
                source,
            })?;
        debug!(
            file = file_name,
            subject = %cert.subject,
            hash = %cert.hash,
            not_after = %cert.not_after_raw,
            "Evaluating certificate"
        );

        let mut findings = Vec::new();

        if cert.is_expired(now) {
            findings.push(Finding::new(&cert, ProblemKind::RootExpired, self.severity));
        }

        let crl_file = crl_file_name(&cert.hash, self.crl_suffix);
        let crl = self
            .store
            .load_crl(&crl_file)
            .map_err(|source| EvaluationError::Crl {
                file: file_name.to_string(),
                crl_file: crl_file.clone(),
                source,
            })?;

        let Some(crl) = crl else {
            findings.push(Finding::new(
                &cert,
                ProblemKind::CrlMissing { crl_file },
                self.severity,
            ));
            log_findings(&findings);
            return Ok(findings);
        };

        let last_update = crl.last_update().map_err(|e| EvaluationError::StartDate {
            file: file_name.to_string(),
            raw: e.raw,
        })?;
        let next_update = crl.next_update().map_err(|e| EvaluationError::EndDate {
            file: file_name.to_string(),
            raw: e.raw,
        })?;
        debug!(
            file = file_name,
            crl = %crl_file,
            last_update = %crl.last_update_raw,
            next_update = %crl.next_update_raw,
            "CRL validity window"
        );

        if last_update > now {
            findings.push(Finding::new(
                &cert,
                ProblemKind::CrlNotYetValid {
                    last_update: crl.last_update_raw.clone(),
                },
                self.severity,
            ));
        }
        if next_update < now {
            findings.push(Finding::new(
                &cert,
                ProblemKind::CrlExpired {
                    next_update: crl.next_update_raw.clone(),
                },
                self.severity,
            ));
        }

        log_findings(&findings);
        Ok(findings)
    }
}

fn log_findings(findings: &[Finding]) {
    for finding in findings {
        info!(severity = %finding.severity, "{}", finding.detail());
    }
}
