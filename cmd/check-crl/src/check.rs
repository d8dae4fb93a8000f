//! One run of the check over a trust store

use crate::evaluator::Evaluator;
use crate::report::RunSummary;
use crate::status::Status;
use crate::store::TrustStore;
use crlwatch_config::{CheckConfig, FileFilter};
use std::fmt;
use tracing::{debug, error, info};

/// Final status and the single line reported for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub status: Status,
    pub message: String,
}

impl CheckOutcome {
    /// Multi-line reasons are collapsed onto the one status line
    pub fn unknown(check_name: &str, reason: impl fmt::Display) -> Self {
        let reason = reason.to_string();
        let reason = reason
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            status: Status::Unknown,
            message: format!("{check_name} {} - {reason}", Status::Unknown),
        }
    }
}

/// Evaluate every selected certificate in `store` against `now`.
///
/// The first unreadable certificate or unparsable CRL date aborts the run
/// as UNKNOWN; findings gathered up to that point are dropped.
pub fn run_check<S: TrustStore>(
    store: &S,
    config: &CheckConfig,
    filter: &FileFilter,
    now: i64,
) -> CheckOutcome {
    let candidates = match store.candidates() {
        Ok(candidates) => candidates,
        Err(e) => {
            error!(error = %e, "Failed to list trust directory");
            return CheckOutcome::unknown(
                &config.check_name,
                format!("Unable to list certificates: {e}"),
            );
        }
    };

    let evaluator = Evaluator::new(store, &config.crl_suffix, config.warn_only);
    let mut summary = RunSummary::new(candidates.len(), config.filter_description());

    for file_name in &candidates {
        if !filter.should_check(file_name) {
            debug!(file = %file_name, "Skipped by filter");
            continue;
        }

        match evaluator.evaluate(file_name, now) {
            Ok(findings) => summary.record(findings),
            Err(e) => {
                error!(file = %file_name, error = %e, "Aborting check");
                return CheckOutcome::unknown(&config.check_name, e);
            }
        }
    }

    info!(
        checked = summary.checked,
        total = summary.total,
        status = %summary.status(),
        "Check complete"
    );

    CheckOutcome {
        status: summary.status(),
        message: summary.render(&config.check_name, config.separator),
    }
}
