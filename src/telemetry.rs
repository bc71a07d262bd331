//! Log subscriber setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Failures installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log level/filter \"{value}\"")]
    EnvFilter {
        /// Directive as configured.
        value: String,
        /// Parser failure.
        #[source]
        source: ParseError,
    },
    /// A global subscriber is already installed.
    #[error("cannot install log subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Builds the filter: `RUST_LOG` when set, otherwise `level`.
///
/// # Errors
///
/// Returns `TelemetryError::EnvFilter` if `level` is not a valid directive.
pub fn env_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|source| TelemetryError::EnvFilter {
            value: level.to_string(),
            source,
        }),
    }
}

/// Installs a compact stderr subscriber.
///
/// # Errors
///
/// Returns a `TelemetryError` if the filter is invalid or a subscriber is
/// already installed.
pub fn init(level: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_levels() {
        assert!(env_filter("debug").is_ok());
        assert!(env_filter("solar_suitability=trace,info").is_ok());
    }

    #[test]
    fn rejects_malformed_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(matches!(
            env_filter("solar_suitability=bogus"),
            Err(TelemetryError::EnvFilter { .. })
        ));
    }
}
