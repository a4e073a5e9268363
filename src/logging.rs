use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. Safe to call on every cold start;
/// a second call is ignored.
pub fn init(config: &Config) {
    let filter = if !config.log_filter.is_empty() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("info")
    };

    let sub = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_line_number(true)
        .with_file(true)
        .with_env_filter(filter);

    let _ = if config.human_logging {
        sub.try_init()
    } else {
        // machine parseable output for the platform log drain
        sub.with_ansi(false).json().try_init()
    };
}
