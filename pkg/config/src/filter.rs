//! File selection by include/exclude pattern
//!
//! Patterns match anywhere in the file name. A non-empty exclude pattern
//! switches the include pattern off entirely.

use crate::non_empty;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid regex {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
pub enum FileFilter {
    /// Check files matching the pattern, or all files when none is given
    Include(Option<Regex>),
    /// Check files not matching the pattern
    Exclude(Regex),
}

impl FileFilter {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, FilterError> {
        if let Some(exclude) = non_empty(exclude) {
            return Ok(Self::Exclude(compile(exclude)?));
        }
        Ok(Self::Include(non_empty(include).map(compile).transpose()?))
    }

    pub fn should_check(&self, file_name: &str) -> bool {
        match self {
            Self::Include(None) => true,
            Self::Include(Some(include)) => include.is_match(file_name),
            Self::Exclude(exclude) => !exclude.is_match(file_name),
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::Include(None)
    }
}

fn compile(pattern: &str) -> Result<Regex, FilterError> {
    Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
