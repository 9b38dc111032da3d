//! Tracing initialization with configurable logging formats.
//!
//! Logs go to stderr so that command output on stdout stays machine-readable.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Crates that are noisy at debug level and rarely useful to a CLI user.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,h2=warn,rustls=warn,reqwest=warn";

/// Initialize the tracing subscriber with the given configuration.
///
/// This sets up:
/// - Console logging on stderr with configurable format (pretty, compact, JSON)
/// - Environment-based log filtering (`RUST_LOG` wins over the config file)
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_env_filter(config, rust_log.as_deref());

    let result = match (&config.format, config.timestamps) {
        (LogFormat::Pretty, true) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(config.file_line)
                .with_line_number(config.file_line);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        (LogFormat::Pretty, false) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(config.file_line)
                .with_line_number(config.file_line)
                .without_time();
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        (LogFormat::Compact, true) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(config.file_line)
                .with_line_number(config.file_line);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        (LogFormat::Compact, false) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(config.file_line)
                .with_line_number(config.file_line)
                .without_time();
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        (LogFormat::Json, true) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_file(config.file_line)
                .with_line_number(config.file_line)
                .with_current_span(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        (LogFormat::Json, false) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_file(config.file_line)
                .with_line_number(config.file_line)
                .with_current_span(true)
                .without_time();
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
    };

    result.map_err(|e| TracingError::Init(e.to_string()))
}

fn build_env_filter(config: &LoggingConfig, rust_log: Option<&str>) -> EnvFilter {
    let directives = filter_directives(config, rust_log);
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter {directives:?}: {e}");
        EnvFilter::new(config.level.as_directive())
    })
}

/// Filter directives in order of precedence: `RUST_LOG`, then the
/// configured level plus filter, then the level with dependencies quieted.
fn filter_directives(config: &LoggingConfig, rust_log: Option<&str>) -> String {
    let base_level = config.level.as_directive();

    if let Some(env_filter) = rust_log.filter(|f| !f.trim().is_empty()) {
        env_filter.to_string()
    } else if let Some(filter) = &config.filter {
        format!("{base_level},{filter}")
    } else {
        format!("{base_level},{QUIET_DEPENDENCIES}")
    }
}

/// Tracing initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_rust_log_wins() {
        let config = LoggingConfig {
            filter: Some("scimctl=trace".into()),
            ..Default::default()
        };
        assert_eq!(
            filter_directives(&config, Some("scimctl=debug")),
            "scimctl=debug"
        );
    }

    #[test]
    fn test_config_filter_appended_to_level() {
        let config = LoggingConfig {
            level: LogLevel::Info,
            filter: Some("scimctl::directory=debug".into()),
            ..Default::default()
        };
        assert_eq!(
            filter_directives(&config, None),
            "info,scimctl::directory=debug"
        );
    }

    #[test]
    fn test_default_quiets_dependencies() {
        let directives = filter_directives(&LoggingConfig::default(), Some("  "));
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("reqwest=warn"));
    }
}
