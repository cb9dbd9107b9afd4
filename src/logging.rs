use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Crates whose connection-level chatter would drown the per-request auth log.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "tungstenite", "tokio_tungstenite"];

/// `log_level` for the crate itself, `warn` for transport crates.
///
/// `RUST_LOG` replaces this entirely when set.
pub fn default_directive(log_level: &str) -> String {
    let mut directive = format!("{},tokengate={}", log_level, log_level);
    for target in QUIET_TARGETS {
        directive.push_str(&format!(",{}=warn", target));
    }
    directive
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered log lines are lost.
///
/// JSON output goes to the rolling file only; text output goes to the file
/// and to stdout.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        // client_id / path / code fields stay queryable
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false)
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(writer).with_ansi(false))
            .with(fmt::layer().compact().with_target(false))
            .init();
    }

    guard
}
