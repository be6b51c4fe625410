use tracing_subscriber::{fmt, EnvFilter};

/// Fallback filter variable checked after `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "CLAUSE_RISK_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Install the stderr subscriber.
///
/// `verbose` forces `debug`; otherwise the filter comes from `RUST_LOG`, then
/// [`LOG_ENV_VAR`], then `warn`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("RUST_LOG")
            .or_else(|_| EnvFilter::try_from_env(LOG_ENV_VAR))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
