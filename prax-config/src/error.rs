//! Error types for configuration loading.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(prax::config::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML or unknown keys.
    #[error("invalid configuration: {source}")]
    #[diagnostic(
        code(prax::config::toml_error),
        help("check the [preload], [debug] and [environments] sections")
    )]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// Requested environment has no override block.
    #[error("unknown environment `{name}`")]
    #[diagnostic(
        code(prax::config::unknown_environment),
        help("declare it under [environments.{name}]")
    )]
    UnknownEnvironment { name: String },
}
