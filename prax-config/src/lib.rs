//! # prax-config
//!
//! Configuration for Prax lazy preloading.
//!
//! This crate provides:
//! - `[preload]` settings (auto-preload mode)
//! - `[debug]` settings for context logging
//! - Environment-specific overrides under `[environments.<name>]`
//!
//! ## Example
//!
//! ```rust
//! use prax_config::PreloadConfig;
//!
//! let config = PreloadConfig::from_str(r#"
//!     [preload]
//!     auto_preload = true
//! "#).unwrap();
//!
//! assert!(config.auto_preload());
//! ```

pub mod config;
pub mod error;

pub use config::{DebugConfig, EnvironmentOverride, PreloadConfig, PreloadSettings};
pub use error::{ConfigError, ConfigResult};
