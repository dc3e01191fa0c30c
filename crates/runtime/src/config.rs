//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. Environment variables override whatever was loaded.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cascade_script::{SandboxGate, ScriptCatalog, ScriptExecutor, ScriptLanguage};
use serde::{Deserialize, Serialize};

/// Overrides [`EngineConfig::script_timeout`], in milliseconds.
pub const ENV_SCRIPT_TIMEOUT_MS: &str = "CASCADE_SCRIPT_TIMEOUT_MS";
/// Overrides [`EngineConfig::language`].
pub const ENV_SCRIPT_LANGUAGE: &str = "CASCADE_SCRIPT_LANGUAGE";

/// Errors raised while loading or checking an [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io {
        /// The file that was read.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// The document is not valid TOML or has the wrong shape.
    #[error("failed to parse configuration: {reason}")]
    Parse {
        /// What the parser reported.
        reason: String,
    },

    /// A field holds a value the engine cannot use.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Build an [`Invalid`](Self::Invalid) error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Settings for a [`ResolutionEngine`](crate::ResolutionEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on a single script run. Stored as milliseconds.
    #[serde(with = "serde_duration_ms")]
    pub script_timeout: Duration,
    /// Language every script is run as.
    pub language: ScriptLanguage,
    /// Record the failure kind of every parameter that rendered empty
    /// because its script failed.
    pub report_failures: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            script_timeout: ScriptExecutor::DEFAULT_TIMEOUT,
            language: ScriptLanguage::default(),
            report_failures: true,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(ENV_SCRIPT_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::invalid("script_timeout", format!("`{raw}` is not a number of milliseconds"))
            })?;
            self.script_timeout = Duration::from_millis(millis);
        }
        if let Some(language) = lookup(ENV_SCRIPT_LANGUAGE) {
            self.language = ScriptLanguage::new(language.trim());
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.script_timeout.is_zero() {
            return Err(ConfigError::invalid("script_timeout", "must be greater than zero"));
        }
        if self.language.as_str().trim().is_empty() {
            return Err(ConfigError::invalid("language", "must not be blank"));
        }
        Ok(())
    }

    /// Build an executor over `gate` with these settings.
    pub fn executor(
        &self,
        gate: Arc<dyn SandboxGate>,
        catalog: Option<Arc<dyn ScriptCatalog>>,
    ) -> ScriptExecutor {
        let executor = ScriptExecutor::new(gate)
            .with_language(self.language.clone())
            .with_timeout(self.script_timeout);
        match catalog {
            Some(catalog) => executor.with_catalog(catalog),
            None => executor,
        }
    }
}

/// Serde helper for a `Duration` stored as integer milliseconds.
pub(crate) mod serde_duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
