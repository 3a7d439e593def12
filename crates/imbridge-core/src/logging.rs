//! Logging system for imbridge
//!
//! Category-filtered, optionally rate-limited logging on top of `tracing`.
//! Per-frame paths (input translation, draw submission) use the
//! `*_rate_limited!` macros so a persistent fault cannot flood the log.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Target every bridge event is emitted under
pub const LOG_TARGET: &str = "imbridge";

/// Severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Subsystem a log line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    Core,
    Renderer,
    Texture,
    Input,
    Platform,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Core => "core",
            LogCategory::Renderer => "renderer",
            LogCategory::Texture => "texture",
            LogCategory::Input => "input",
            LogCategory::Platform => "platform",
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed-window counter for one category
#[derive(Debug)]
struct RateLimitState {
    last_reset: Instant,
    count: u32,
    suppressed: u32,
    max_count: u32,
    duration: Duration,
}

impl RateLimitState {
    fn new(max_count: u32, duration: Duration) -> Self {
        Self {
            last_reset: Instant::now(),
            count: 0,
            suppressed: 0,
            max_count,
            duration,
        }
    }

    /// Returns whether to emit, and how many messages were dropped in the
    /// window that just closed
    fn should_allow(&mut self) -> (bool, u32) {
        let now = Instant::now();
        let mut dropped = 0;

        if now.duration_since(self.last_reset) >= self.duration {
            self.last_reset = now;
            self.count = 0;
            dropped = std::mem::take(&mut self.suppressed);
        }

        if self.count < self.max_count {
            self.count += 1;
            (true, dropped)
        } else {
            self.suppressed += 1;
            (false, dropped)
        }
    }
}

/// Active levels and per-category limiters
#[derive(Debug)]
pub struct LoggerConfig {
    rate_limiters: Mutex<HashMap<String, RateLimitState>>,
    config: LoggingConfig,
}

impl LoggerConfig {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            rate_limiters: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Consume one slot of the category's rate-limit window
    pub fn should_allow_log(&self, category: &str) -> bool {
        self.check_rate_limit(category).0
    }

    fn check_rate_limit(&self, category: &str) -> (bool, u32) {
        let mut limiters = self.rate_limiters.lock();

        let limiter = limiters.entry(category.to_string()).or_insert_with(|| {
            RateLimitState::new(
                self.config.max_rate_limit_count,
                Duration::from_secs(self.config.rate_limit_seconds),
            )
        });

        limiter.should_allow()
    }

    /// Whether `level` passes the threshold configured for `category`
    pub fn is_level_enabled(&self, category: &str, level: LogLevel) -> bool {
        match self
            .config
            .category_levels
            .get(category)
            .and_then(|s| LogLevel::from_str(s))
        {
            Some(category_level) => level >= category_level,
            None => level >= LogLevel::Info,
        }
    }

    /// Most verbose level any category asks for
    pub fn most_verbose_level(&self) -> LogLevel {
        self.config
            .category_levels
            .values()
            .filter_map(|s| LogLevel::from_str(s))
            .min()
            .unwrap_or(LogLevel::Info)
    }

    pub fn update_config(&mut self, config: LoggingConfig) {
        self.config = config;
        self.rate_limiters.lock().clear();
    }
}

static LOGGER: OnceLock<Arc<RwLock<LoggerConfig>>> = OnceLock::new();

/// Initialize the logging system.
///
/// Installs a `tracing-subscriber` formatter unless the host already set a
/// global subscriber; `RUST_LOG` overrides the configured levels.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let logger_config = LoggerConfig::new(config.clone());
    let verbose = logger_config.most_verbose_level();

    if LOGGER.set(Arc::new(RwLock::new(logger_config))).is_err() {
        update_config(config.clone());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{}={}", LOG_TARGET, verbose)))?;

    // A host that already owns the global subscriber keeps it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    Ok(())
}

fn get_logger() -> Option<Arc<RwLock<LoggerConfig>>> {
    LOGGER.get().cloned()
}

/// Internal logging function used by the `bridge_*!` macros
pub fn log_internal(level: LogLevel, category: &str, message: &str, rate_limited: bool) {
    let mut dropped = 0;

    if let Some(logger) = get_logger() {
        let logger_guard = logger.read();

        if !logger_guard.is_level_enabled(category, level) {
            return;
        }

        if rate_limited {
            let (allowed, suppressed) = logger_guard.check_rate_limit(category);
            if !allowed {
                return;
            }
            dropped = suppressed;
        }
    }

    if dropped > 0 {
        tracing::warn!(
            target: LOG_TARGET,
            category,
            "{} similar messages suppressed",
            dropped
        );
    }

    match level {
        LogLevel::Trace => tracing::trace!(target: LOG_TARGET, category, "{}", message),
        LogLevel::Debug => tracing::debug!(target: LOG_TARGET, category, "{}", message),
        LogLevel::Info => tracing::info!(target: LOG_TARGET, category, "{}", message),
        LogLevel::Warn => tracing::warn!(target: LOG_TARGET, category, "{}", message),
        LogLevel::Error => tracing::error!(target: LOG_TARGET, category, "{}", message),
    }
}

/// Swap in a new configuration at runtime
pub fn update_config(config: LoggingConfig) {
    if let Some(logger) = get_logger() {
        logger.write().update_config(config);
    }
}

#[macro_export]
macro_rules! bridge_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Trace, $category.as_str(), &format!($($arg)*), false);
    };
}

#[macro_export]
macro_rules! bridge_debug {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Debug, $category.as_str(), &format!($($arg)*), false);
    };
}

#[macro_export]
macro_rules! bridge_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Info, $category.as_str(), &format!($($arg)*), false);
    };
}

#[macro_export]
macro_rules! bridge_warn {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Warn, $category.as_str(), &format!($($arg)*), false);
    };
}

#[macro_export]
macro_rules! bridge_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Error, $category.as_str(), &format!($($arg)*), false);
    };
}

// Rate-limited variants
#[macro_export]
macro_rules! bridge_debug_rate_limited {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Debug, $category.as_str(), &format!($($arg)*), true);
    };
}

#[macro_export]
macro_rules! bridge_warn_rate_limited {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Warn, $category.as_str(), &format!($($arg)*), true);
    };
}

#[macro_export]
macro_rules! bridge_error_rate_limited {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal($crate::logging::LogLevel::Error, $category.as_str(), &format!($($arg)*), true);
    };
}

pub use bridge_debug;
pub use bridge_debug_rate_limited;
pub use bridge_error;
pub use bridge_error_rate_limited;
pub use bridge_info;
pub use bridge_trace;
pub use bridge_warn;
pub use bridge_warn_rate_limited;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::from_str("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("invalid"), None);
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_rate_limiting_counts_suppressed() {
        let mut state = RateLimitState::new(2, Duration::from_millis(50));

        assert_eq!(state.should_allow(), (true, 0));
        assert_eq!(state.should_allow(), (true, 0));
        assert_eq!(state.should_allow(), (false, 0));
        assert_eq!(state.should_allow(), (false, 0));

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(state.should_allow(), (true, 2));
    }

    #[test]
    fn test_logger_config_levels() {
        let mut config = LoggingConfig::default();
        config
            .category_levels
            .insert("texture".to_string(), "debug".to_string());

        let logger_config = LoggerConfig::new(config);

        assert!(logger_config.is_level_enabled("texture", LogLevel::Debug));
        assert!(!logger_config.is_level_enabled("texture", LogLevel::Trace));
        assert!(!logger_config.is_level_enabled("input", LogLevel::Info));
        assert!(logger_config.is_level_enabled("unknown", LogLevel::Info));
        assert_eq!(logger_config.most_verbose_level(), LogLevel::Debug);
        assert!(logger_config.should_allow_log("texture"));
    }

    #[test]
    fn test_macros_accept_categories() {
        // Emitting without an initialized logger must not panic
        bridge_debug!(LogCategory::Texture, "created {}", 1);
        bridge_warn_rate_limited!(LogCategory::Renderer, "skipped {}", "cmd");
    }
}
