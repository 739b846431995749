//! Tracing subscriber setup for binaries and hosts

use handwell_core::{HandwellError, HandwellResult};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// `"json"` selects JSON, anything else is pretty
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Install the global fmt subscriber. `RUST_LOG` overrides the default
/// `info` filter. Fails if a subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> HandwellResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| HandwellError::TracingInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(LogFormat::from_name("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name(""), LogFormat::Pretty);
    }

    #[test]
    fn test_second_init_fails() {
        let first = init_tracing(LogFormat::Pretty);
        let second = init_tracing(LogFormat::Json);

        // another test may have installed one first
        assert!(first.is_ok() || second.is_err());
        assert!(matches!(second, Err(HandwellError::TracingInit(_))));
    }
}
