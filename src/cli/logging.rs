//! Structured logging for the CLI.
//!
//! Logs go to stderr so they never mix with JSON written to stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no `--log-level` is given
pub const LOG_ENV_VAR: &str = "ATTRQL_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Pick the filter directive.
///
/// Precedence, highest first: the `--log-level` flag, `ATTRQL_LOG`, `warn`.
/// Blank values count as unset.
pub fn filter_directive<'a>(cli_level: Option<&'a str>, env_level: Option<&'a str>) -> String {
    let set = |level: Option<&'a str>| level.map(str::trim).filter(|level| !level.is_empty());
    set(cli_level)
        .or_else(|| set(env_level))
        .unwrap_or(DEFAULT_DIRECTIVE)
        .to_string()
}

/// Initialise the logging subsystem.
///
/// An unparsable directive falls back to `warn`. If a global subscriber is
/// already set the call does nothing.
pub fn init_logging(cli_level: Option<&str>) {
    let env_level = std::env::var(LOG_ENV_VAR).ok();
    let directive = filter_directive(cli_level, env_level.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
