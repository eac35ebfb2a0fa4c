pub mod cache;
pub mod cli;
pub mod levels_report;
pub mod sink;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr, reports to stdout.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=info,backtest=info,schwab=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
