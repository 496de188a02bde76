//! Logging setup for wiring-factory
//!
//! Assembly milestones (registration, the factory scan, product
//! registration) are emitted at `DEBUG`, per-resolution and per-wiring
//! detail at `TRACE`, all under the `wiring_factory` target.
//!
//! # Features
//!
//! - `logging` - Emit events through `tracing` (default)
//! - `logging-json` - Install a JSON subscriber (production)
//! - `logging-pretty` - Install a pretty subscriber (development)
//!
//! # Example
//!
//! ```rust,ignore
//! use wiring_factory::logging;
//!
//! logging::init();
//!
//! logging::builder()
//!     .trace()
//!     .wiring_only()
//!     .pretty()
//!     .init();
//! ```

use tracing::Level;

/// Target of every event the crate emits
pub const TARGET: &str = "wiring_factory";

/// Environment variable that overrides the configured filter
pub const ENV_FILTER_VAR: &str = "RUST_LOG";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Multi-line colorful output
    Pretty,
    /// Compact single-line output
    Compact,
}

/// Builder for the logging subscriber
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
    from_env: bool,
    with_file: bool,
    with_line_number: bool,
    with_thread_ids: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Json,
            target: None,
            from_env: true,
            with_file: false,
            with_line_number: false,
            with_thread_ids: false,
        }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Show per-resolution detail
    pub fn trace(self) -> Self {
        self.with_level(Level::TRACE)
    }

    /// Show assembly milestones only
    pub fn debug(self) -> Self {
        self.with_level(Level::DEBUG)
    }

    pub fn info(self) -> Self {
        self.with_level(Level::INFO)
    }

    /// Only show events from `target`
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show wiring-factory events
    pub fn wiring_only(self) -> Self {
        self.with_target_filter(TARGET)
    }

    /// Ignore `RUST_LOG` even when it is set
    pub fn ignore_env(mut self) -> Self {
        self.from_env = false;
        self
    }

    pub fn with_file(mut self) -> Self {
        self.with_file = true;
        self
    }

    pub fn with_line_number(mut self) -> Self {
        self.with_line_number = true;
        self
    }

    pub fn with_thread_ids(mut self) -> Self {
        self.with_thread_ids = true;
        self
    }

    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    pub fn compact(mut self) -> Self {
        self.format = LogFormat::Compact;
        self
    }

    /// Filter directive built from the level and target
    pub fn directive(&self) -> String {
        match self.target {
            Some(target) => format!("{target}={}", self.level),
            None => self.level.to_string(),
        }
    }

    /// Install the subscriber globally.
    ///
    /// `RUST_LOG`, when set and valid, replaces the configured filter.
    /// Does nothing if a global subscriber is already installed.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = self
            .from_env
            .then(|| EnvFilter::try_from_env(ENV_FILTER_VAR).ok())
            .flatten()
            .unwrap_or_else(|| EnvFilter::new(self.directive()));

        let layer = fmt::layer()
            .with_file(self.with_file)
            .with_line_number(self.with_line_number)
            .with_thread_ids(self.with_thread_ids)
            .with_target(true);

        let registry = tracing_subscriber::registry().with(filter);
        let _ = match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => registry.with(layer.json()).try_init(),
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => registry.with(layer).try_init(),
            LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
            LogFormat::Compact => registry.with(layer.compact()).try_init(),
        };
    }

    /// No subscriber is available without `logging-json` or `logging-pretty`
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) {}
}

/// Create a new logging builder
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Initialize logging with default settings: JSON when `logging-json` is
/// enabled, pretty otherwise
pub fn init() {
    #[cfg(feature = "logging-json")]
    builder().json().init();

    #[cfg(not(feature = "logging-json"))]
    builder().pretty().init();
}

/// Initialize logging restricted to wiring-factory events
pub fn init_wiring_only() {
    builder().wiring_only().init();
}
