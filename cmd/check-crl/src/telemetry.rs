//! Logging setup for check-crl
//!
//! Standard output belongs to the single status line, so diagnostics go to
//! standard error unless `--debug` asks for them inline.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the level filter from `RUST_LOG` (if set) and `--debug`.
///
/// `--debug` always enables at least `debug`, whatever `RUST_LOG` says.
fn build_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    let from_env = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok());
    match from_env {
        Some(filter) if !debug => filter,
        Some(filter) if filter.max_level_hint() >= Some(LevelFilter::DEBUG) => filter,
        Some(filter) => filter.add_directive(LevelFilter::DEBUG.into()),
        None if debug => EnvFilter::new("debug"),
        None => EnvFilter::new("warn"),
    }
}

pub fn init_logging(debug: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(debug, rust_log.as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_ansi(false);

    if debug {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.with_writer(std::io::stdout))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.with_writer(std::io::stderr))
            .init();
    }
}
