//! Logging configuration for autowire
//!
//! Easy setup for structured logging of container activity. Registration
//! events log at `debug`, per-resolution events at `trace`, all under the
//! `autowire` target.
//!
//! # Features
//!
//! - `logging` - emit tracing events (default)
//! - `logging-json` - JSON subscriber output (production)
//! - `logging-pretty` - colorful subscriber output (development)
//!
//! # Example
//!
//! ```rust,ignore
//! use autowire::logging;
//!
//! // One-liner with defaults
//! logging::init();
//!
//! // Or configured
//! logging::builder()
//!     .with_level(tracing::Level::TRACE)
//!     .di_only()
//!     .pretty()
//!     .init();
//! ```

#[cfg(feature = "logging")]
use tracing::Level;

/// Subscriber output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON structured output (production default)
    #[default]
    Json,
    /// Colorful human-readable output (development)
    Pretty,
}

/// Builder for logging configuration
#[cfg(feature = "logging")]
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
}

#[cfg(feature = "logging")]
impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Json,
            target: None,
        }
    }
}

#[cfg(feature = "logging")]
impl LoggingBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Filter to a specific target
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show autowire logs
    pub fn di_only(self) -> Self {
        self.with_target_filter("autowire")
    }

    /// Use JSON output
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Use pretty output
    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    /// Install the configured subscriber.
    ///
    /// Requires `logging-json` or `logging-pretty`; a no-op otherwise.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = match self.target {
            Some(target) => EnvFilter::new(format!("{}={}", target, self.level)),
            None => EnvFilter::new(self.level.to_string()),
        };

        match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_target(true))
                    .init();
            }
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_target(true))
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty().with_target(true))
                    .init();
            }
        }
    }

    /// Install (no-op without a subscriber feature)
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) {}
}

/// Create a new logging builder
#[cfg(feature = "logging")]
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Initialize logging with defaults: JSON when `logging-json` is enabled,
/// pretty otherwise.
#[cfg(feature = "logging")]
pub fn init() {
    #[cfg(feature = "logging-json")]
    {
        builder().json().init();
    }
    #[cfg(not(feature = "logging-json"))]
    {
        builder().pretty().init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = LoggingBuilder::default();
        assert_eq!(builder.level, Level::DEBUG);
        assert_eq!(builder.format, LogFormat::Json);
        assert!(builder.target.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let builder = LoggingBuilder::new()
            .with_level(Level::TRACE)
            .pretty()
            .di_only();

        assert_eq!(builder.level, Level::TRACE);
        assert_eq!(builder.format, LogFormat::Pretty);
        assert_eq!(builder.target, Some("autowire"));
    }
}
