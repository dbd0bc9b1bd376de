use crate::config::LoggerConfig;
use crate::LoggerError;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the global tracing subscriber
///
/// Logs go to stderr so the certificate report on stdout stays clean.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    let json = config
        .json
        .unwrap_or_else(|| !atty::is(atty::Stream::Stderr));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()
            .map_err(|e| LoggerError::Init(e.to_string()))
    } else {
        let use_colors = std::env::var("NO_COLOR").is_err();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_colors)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| LoggerError::Init(e.to_string()))
    }
}
