//! Configuration for the CRL trust-store check
//!
//! Settings come from built-in defaults, an optional YAML file, and finally
//! command-line overrides applied by the binary.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod filter;

pub use filter::{FileFilter, FilterError};

const DEFAULT_TRUST_DIR: &str = "/etc/ssl/certs";
const DEFAULT_CRL_SUFFIX: &str = ".r0";
const DEFAULT_CHECK_NAME: &str = "CRL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("YAML error")]
    Yaml(#[from] serde_yaml::Error),
}

/// How findings are joined in the final report line
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Newline,
    Html,
    Dashes,
}

impl Separator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newline => "\n",
            Self::Html => "<br>",
            Self::Dashes => " --- ",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CheckConfig {
    pub trust_dir: PathBuf,
    /// Include pattern, ignored when `exclude` is set
    pub include: Option<String>,
    pub exclude: Option<String>,
    /// Cap every finding at WARNING
    pub warn_only: bool,
    pub separator: Separator,
    pub debug: bool,
    pub crl_suffix: String,
    pub check_name: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            trust_dir: PathBuf::from(DEFAULT_TRUST_DIR),
            include: None,
            exclude: None,
            warn_only: false,
            separator: Separator::default(),
            debug: false,
            crl_suffix: DEFAULT_CRL_SUFFIX.to_string(),
            check_name: DEFAULT_CHECK_NAME.to_string(),
        }
    }
}

impl CheckConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Compile the include/exclude patterns into a filter
    pub fn file_filter(&self) -> Result<FileFilter, FilterError> {
        FileFilter::new(self.include.as_deref(), self.exclude.as_deref())
    }

    /// Human-readable description of the active filter
    pub fn filter_description(&self) -> String {
        match (non_empty(self.exclude.as_deref()), non_empty(self.include.as_deref())) {
            (Some(exclude), _) => format!("xregex={exclude}"),
            (None, Some(include)) => format!("regex={include}"),
            (None, None) => "none".to_string(),
        }
    }
}

pub(crate) fn non_empty(pattern: Option<&str>) -> Option<&str> {
    pattern.filter(|p| !p.is_empty())
}
