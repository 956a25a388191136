use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "ECM_LOG_LEVEL '{value}' is not a valid tracing filter")
            }
            TelemetryError::Subscriber(err) => write!(f, "tracing subscriber unavailable: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Builds the filter used by [`init`]: `RUST_LOG` when set, the configured level otherwise.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn configured_level_applies_without_rust_log() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");

        let filter = env_filter(&config("debug")).expect("level parses");
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn invalid_level_is_reported() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");

        match env_filter(&config("info[[")) {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, "info[["),
            other => panic!("expected env filter error, got {other:?}"),
        }
    }

    #[test]
    fn rust_log_takes_precedence() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("RUST_LOG", "warn");

        let result = env_filter(&config("info[["));
        env::remove_var("RUST_LOG");

        let filter = result.expect("RUST_LOG filter wins over the configured level");
        assert!(filter.to_string().contains("warn"));
    }
}
