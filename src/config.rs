//! Configuration loading helpers.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Errors returned by configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading config files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridsnapConfig {
    /// Recovery configuration.
    pub recovery: Option<RecoveryConfigSpec>,
}

impl GridsnapConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from the `GRIDSNAP_CONFIG` env var (if set),
    /// then apply `GRIDSNAP__section__field` overrides.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config_path = env::var("GRIDSNAP_CONFIG").ok();
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment overrides in-place.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        for (key, value) in env::vars() {
            if !key.starts_with("GRIDSNAP__") {
                continue;
            }
            let path = key["GRIDSNAP__".len()..].to_ascii_lowercase();
            let parts: Vec<&str> = path.split("__").collect();
            let value = value.trim().to_string();

            match parts.as_slice() {
                ["recovery", "dir"] => {
                    self.recovery_mut().dir = Some(value);
                }
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }

        Ok(())
    }

    /// The configured recovery directory, if checkpointing is enabled.
    ///
    /// An unset or empty `recovery.dir` means recovery is disabled.
    pub fn recovery_dir(&self) -> Option<&str> {
        self.recovery
            .as_ref()
            .and_then(|recovery| recovery.dir.as_deref())
            .filter(|dir| !dir.is_empty())
    }

    fn recovery_mut(&mut self) -> &mut RecoveryConfigSpec {
        if self.recovery.is_none() {
            self.recovery = Some(RecoveryConfigSpec::default());
        }
        self.recovery.as_mut().expect("recovery config")
    }
}

/// Recovery configuration overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecoveryConfigSpec {
    /// Checkpoint directory. Empty disables recovery.
    pub dir: Option<String>,
}
