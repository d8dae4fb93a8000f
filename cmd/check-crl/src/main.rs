//! check-crl - monitoring check for a CRL trust store
//!
//! Scans a directory of PEM root certificates, finds each root's
//! `<subject-hash>.r0` CRL and reports expired roots, missing CRLs and CRLs
//! whose validity window does not cover the current time. Prints one status
//! line and exits 0/1/2/3 for OK/WARNING/CRITICAL/UNKNOWN.

use anyhow::{Context, Result};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use crlwatch_config::{CheckConfig, Separator};
use std::path::PathBuf;
use std::process::ExitCode;

mod check;
mod evaluator;
mod report;
mod status;
mod store;
mod telemetry;

use check::{run_check, CheckOutcome};
use status::Status;
use store::DirectoryStore;

const FALLBACK_CHECK_NAME: &str = "CRL";

#[derive(Parser, Debug)]
#[command(name = "check-crl")]
#[command(about = "Check the CRLs of a root certificate trust store", long_about = None)]
struct Cli {
    /// YAML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trust directory [default: /etc/ssl/certs]
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Only check certificate files matching this regex
    #[arg(short, long)]
    regex: Option<String>,

    /// Skip certificate files matching this regex (disables --regex)
    #[arg(short = 'x', long)]
    xregex: Option<String>,

    /// Report problems as WARNING instead of CRITICAL
    #[arg(long)]
    warn_only: bool,

    /// Separate findings with <br> and append the active filter
    #[arg(long)]
    html: bool,

    /// Separate findings with " --- "
    #[arg(long)]
    dashes: bool,

    /// Print diagnostics while scanning
    #[arg(long)]
    debug: bool,

    /// CRL file name suffix [default: .r0]
    #[arg(long)]
    crl_suffix: Option<String>,

    /// Name leading the status line [default: CRL]
    #[arg(long)]
    check_name: Option<String>,
}

impl Cli {
    /// Layer command-line flags over the config file or defaults
    fn into_config(self) -> Result<CheckConfig> {
        let mut config = match &self.config {
            Some(path) => CheckConfig::load(path)
                .with_context(|| format!("Unable to load config {}", path.display()))?,
            None => CheckConfig::default(),
        };

        if let Some(dir) = self.dir {
            config.trust_dir = dir;
        }
        if self.regex.is_some() {
            config.include = self.regex;
        }
        if self.xregex.is_some() {
            config.exclude = self.xregex;
        }
        if let Some(suffix) = self.crl_suffix {
            config.crl_suffix = suffix;
        }
        if let Some(name) = self.check_name {
            config.check_name = name;
        }
        config.warn_only |= self.warn_only;
        config.debug |= self.debug;

        if self.html {
            config.separator = Separator::Html;
        } else if self.dashes {
            config.separator = Separator::Dashes;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            match usage_error_line(&e) {
                Some(line) => println!("{line}"),
                None => print!("{}", e.render()),
            }
            return Status::Unknown.into();
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", CheckOutcome::unknown(FALLBACK_CHECK_NAME, format!("{e:#}")).message);
            return Status::Unknown.into();
        }
    };

    telemetry::init_logging(config.debug);

    let outcome = match run(&config) {
        Ok(outcome) => outcome,
        Err(e) => CheckOutcome::unknown(&config.check_name, format!("{e:#}")),
    };

    println!("{}", outcome.message);
    outcome.status.into()
}

fn run(config: &CheckConfig) -> Result<CheckOutcome> {
    let filter = config.file_filter()?;
    let store = DirectoryStore::open(&config.trust_dir)?;
    let now = chrono::Utc::now().timestamp();

    tracing::debug!(
        dir = %store.base_dir().display(),
        filter = %config.filter_description(),
        warn_only = config.warn_only,
        "Starting CRL check"
    );
    Ok(run_check(&store, config, &filter, now))
}

/// Status line for a bad command line, or `None` when usage was requested.
///
/// Help and bad arguments both end the run as UNKNOWN.
fn usage_error_line(e: &clap::Error) -> Option<String> {
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::DisplayVersion => None,
        ErrorKind::UnknownArgument => {
            let option = match e.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) => arg.clone(),
                _ => String::from("?"),
            };
            Some(format!("Unknown option {option}."))
        }
        _ => {
            let rendered = e.render().to_string();
            let first_line = rendered.lines().next().unwrap_or_default();
            Some(CheckOutcome::unknown(FALLBACK_CHECK_NAME, first_line).message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_defaults() {
        let config = Cli::try_parse_from(["check-crl"]).unwrap().into_config().unwrap();
        assert_eq!(config, CheckConfig::default());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::try_parse_from([
            "check-crl", "-d", "/srv/trust", "-r", "ALPHA", "-x", "BETA",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.trust_dir, PathBuf::from("/srv/trust"));
        assert_eq!(config.include.as_deref(), Some("ALPHA"));
        assert_eq!(config.exclude.as_deref(), Some("BETA"));
        assert_eq!(config.filter_description(), "xregex=BETA");
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::try_parse_from([
            "check-crl",
            "--dir",
            "/srv/trust",
            "--regex",
            "ALPHA",
            "--warn-only",
            "--dashes",
            "--debug",
            "--crl-suffix",
            ".r1",
            "--check-name",
            "TRUST",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert!(config.warn_only);
        assert!(config.debug);
        assert_eq!(config.separator, Separator::Dashes);
        assert_eq!(config.crl_suffix, ".r1");
        assert_eq!(config.check_name, "TRUST");
    }

    #[test]
    fn test_cli_html_wins_over_dashes() {
        let cli = Cli::try_parse_from(["check-crl", "--dashes", "--html"]).unwrap();
        assert_eq!(cli.into_config().unwrap().separator, Separator::Html);
    }

    #[test]
    fn test_cli_unknown_option() {
        let err = Cli::try_parse_from(["check-crl", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(matches!(
            err.get(ContextKind::InvalidArg),
            Some(ContextValue::String(arg)) if arg == "--bogus"
        ));
    }

    #[test]
    fn test_cli_help_is_an_error() {
        let err = Cli::try_parse_from(["check-crl", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(usage_error_line(&err).is_none());
    }

    #[test]
    fn test_unknown_option_line() {
        let err = Cli::try_parse_from(["check-crl", "--bogus"]).unwrap_err();
        assert_eq!(usage_error_line(&err).unwrap(), "Unknown option --bogus.");
    }

    #[test]
    fn test_missing_option_value_line() {
        let err = Cli::try_parse_from(["check-crl", "-d"]).unwrap_err();
        let line = usage_error_line(&err).unwrap();

        assert!(line.starts_with("CRL UNKNOWN - error: "), "{line}");
        assert!(line.contains("--dir"), "{line}");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_cli_help_available() {
        // Verify help is available without panicking
        let _cmd = Cli::command();
    }

    #[test]
    fn test_config_file_with_overrides() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "trust_dir: /srv/trust\nseparator: html\nwarn_only: true\n").unwrap();

        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["check-crl", "-c", path, "-d", "/override"]).unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.trust_dir, PathBuf::from("/override"));
        assert_eq!(config.separator, Separator::Html);
        assert!(config.warn_only);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["check-crl", "-c", "/nonexistent/check-crl.yaml"]).unwrap();
        let err = cli.into_config().unwrap_err();
        let line = CheckOutcome::unknown(FALLBACK_CHECK_NAME, format!("{err:#}")).message;

        let expected = concat!(
            "CRL UNKNOWN - Unable to load config /nonexistent/check-crl.yaml: ",
            "IO error: "
        );
        assert!(line.starts_with(expected), "{line}");
        // The OS error is reported once
        assert_eq!(line.matches("os error").count(), 1, "{line}");
    }

    #[test]
    fn test_run_missing_directory() {
        let config = CheckConfig {
            trust_dir: PathBuf::from("/nonexistent/trust/dir"),
            ..CheckConfig::default()
        };
        let err = run(&config).unwrap_err();
        assert_eq!(err.to_string(), "Directory /nonexistent/trust/dir not found.");
    }

    #[test]
    fn test_run_invalid_regex() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = CheckConfig {
            trust_dir: temp_dir.path().to_path_buf(),
            include: Some("(".to_string()),
            ..CheckConfig::default()
        };
        let err = run(&config).unwrap_err();
        let line = CheckOutcome::unknown(FALLBACK_CHECK_NAME, format!("{err:#}")).message;

        assert!(line.starts_with("CRL UNKNOWN - Invalid regex \"(\": "), "{line}");
        assert!(!line.contains('\n'), "{line}");
        assert_eq!(line.matches("unclosed group").count(), 1, "{line}");
    }

    #[test]
    fn test_run_empty_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = CheckConfig {
            trust_dir: temp_dir.path().to_path_buf(),
            ..CheckConfig::default()
        };
        let outcome = run(&config).unwrap();
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.message, "CRL OK - Checked 0/0.");
    }
}
