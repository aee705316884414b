//! Logging infrastructure for Prax lazy preloading.
//!
//! Structured logging controlled by the `PRAX_DEBUG` environment variable.
//!
//! # Environment Variables
//!
//! - `PRAX_DEBUG=true` / `PRAX_DEBUG=1` - Enable debug logging
//! - `PRAX_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `PRAX_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use prax_preload::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Inside the crate, context creation is logged at `debug` and enumerator
//! cache activity at `trace`:
//!
//! ```rust,ignore
//! debug!(association = %name, auto_preload, "Prepared lazy preload context");
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `PRAX_DEBUG` environment variable.
///
/// Returns `true` if `PRAX_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("PRAX_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `PRAX_LOG_LEVEL` environment variable.
///
/// Defaults to "debug" if `PRAX_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };

    match env::var("PRAX_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `PRAX_LOG_FORMAT` environment variable.
pub fn get_log_format() -> &'static str {
    env::var("PRAX_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Build the `EnvFilter` directive string for the preload crates.
pub fn filter_directive(level: &str) -> String {
    format!(
        "prax_lazy={},prax_preload={},prax_config={}",
        level, level, level
    )
}

/// Initialize the logging system.
///
/// Subsequent calls are no-ops. Nothing is installed unless `PRAX_DEBUG`
/// or `PRAX_LOG_LEVEL` is set, and only when the `tracing-subscriber`
/// feature is enabled; otherwise events go to whatever subscriber the
/// application installed.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("PRAX_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(filter_directive(level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            let installed = match get_log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "Prax preload logging initialized"
                );
            }
        }
    });
}

/// Macro for conditional debug logging.
///
/// Only logs if `PRAX_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! prax_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional trace logging.
#[macro_export]
macro_rules! prax_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}
