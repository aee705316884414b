//! Configuration file parsing for the `[preload]` section of `prax.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Main configuration structure for lazy preloading.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PreloadConfig {
    /// Preloading behavior.
    #[serde(default)]
    pub preload: PreloadSettings,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentOverride>,
}

impl PreloadConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = Self::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            auto_preload = config.auto_preload(),
            "Loaded preload configuration"
        );
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let expanded = expand_env_vars(content);

        toml::from_str(&expanded).map_err(|e| ConfigError::TomlError { source: e })
    }

    /// Whether associations are preloaded automatically on first access.
    pub fn auto_preload(&self) -> bool {
        self.preload.auto_preload
    }

    /// Enable or disable auto-preload mode.
    pub fn with_auto_preload(mut self, enabled: bool) -> Self {
        self.preload.auto_preload = enabled;
        self
    }

    /// Apply environment-specific overrides.
    ///
    /// Unknown environments leave the configuration untouched; use
    /// [`PreloadConfig::try_environment`] to treat them as an error.
    pub fn with_environment(mut self, env: &str) -> Self {
        if let Some(overrides) = self.environments.remove(env) {
            self.apply(overrides);
        }
        self
    }

    /// Apply environment-specific overrides, failing if the environment is not declared.
    pub fn try_environment(mut self, env: &str) -> ConfigResult<Self> {
        let overrides = self
            .environments
            .remove(env)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: env.to_string(),
            })?;
        self.apply(overrides);
        Ok(self)
    }

    fn apply(&mut self, overrides: EnvironmentOverride) {
        if let Some(preload) = overrides.preload {
            if let Some(auto_preload) = preload.auto_preload {
                self.preload.auto_preload = auto_preload;
            }
        }
        if let Some(debug) = overrides.debug {
            if let Some(log_contexts) = debug.log_contexts {
                self.debug.log_contexts = log_contexts;
            }
        }
    }
}

/// Preloading behavior.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PreloadSettings {
    /// Preload every association on first access instead of consulting
    /// a declared association tree.
    #[serde(default)]
    pub auto_preload: bool,
}

/// Debug/logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Emit a log event for every context created on lazy access.
    #[serde(default)]
    pub log_contexts: bool,
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentOverride {
    /// Preload overrides.
    pub preload: Option<PreloadOverride>,

    /// Debug overrides.
    pub debug: Option<DebugOverride>,
}

/// Preload configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PreloadOverride {
    /// Override auto_preload.
    pub auto_preload: Option<bool>,
}

/// Debug configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugOverride {
    /// Override log_contexts.
    pub log_contexts: Option<bool>,
}

/// Expand environment variables in the format `${VAR_NAME}`.
fn expand_env_vars(content: &str) -> String {
    let re = match regex_lite::Regex::new(r"\$\{([^}]+)\}") {
        Ok(re) => re,
        Err(_) => return content.to_string(),
    };

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let full_match = &cap[0];

        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(full_match, &value);
        }
    }

    result
}
