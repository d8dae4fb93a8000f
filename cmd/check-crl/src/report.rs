//! Aggregation of findings into the final status line

use crate::evaluator::Finding;
use crate::status::Status;
use crlwatch_config::Separator;
use std::collections::VecDeque;

/// State accumulated over one run of the check
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub checked: usize,
    status: Status,
    /// Most recent finding first
    details: VecDeque<String>,
    filter_description: String,
}

impl RunSummary {
    pub fn new(total: usize, filter_description: impl Into<String>) -> Self {
        Self {
            total,
            filter_description: filter_description.into(),
            ..Self::default()
        }
    }

    /// Fold the findings of one evaluated certificate into the summary
    pub fn record(&mut self, findings: Vec<Finding>) {
        self.checked += 1;
        for finding in findings {
            self.status = self.status.max(finding.severity);
            self.details.push_front(finding.detail());
        }
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub fn details(&self) -> impl Iterator<Item = &str> {
        self.details.iter().map(String::as_str)
    }

    /// `<name> <STATUS> - <findings> - Checked <checked>/<total>.`
    pub fn render(&self, check_name: &str, separator: Separator) -> String {
        let mut message = format!("{check_name} {} - ", self.status);

        if !self.details.is_empty() {
            let body = self.details().collect::<Vec<_>>().join(separator.as_str());
            message.push_str(&body);
            message.push_str(" - ");
        }

        message.push_str(&format!("Checked {}/{}.", self.checked, self.total));

        if separator == Separator::Html {
            message.push_str(&format!(" | Filter: {}", self.filter_description));
        }
        message
    }
}
