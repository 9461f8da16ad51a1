use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{DEFAULT_SELF_NAME, DEFAULT_SELF_NUMBER};
use crate::error::{EtlError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "momo.toml";

/// Environment overrides for the device owner's identity
pub const SELF_NUMBER_ENV: &str = "MOMO_SELF_NUMBER";
pub const SELF_NAME_ENV: &str = "MOMO_SELF_NAME";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub self_party: SelfPartyConfig,
    pub output: OutputConfig,
    pub log_dir: PathBuf,
}

/// The placeholder customer every "you"/"your account" message resolves to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelfPartyConfig {
    pub account_number: u64,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            self_party: SelfPartyConfig::default(),
            output: OutputConfig::default(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Default for SelfPartyConfig {
    fn default() -> Self {
        Self {
            account_number: DEFAULT_SELF_NUMBER,
            display_name: DEFAULT_SELF_NAME.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Config {
    /// Load configuration from `path` (or `momo.toml`), then apply environment overrides.
    ///
    /// A missing default file is not an error; a missing explicitly named file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(SELF_NUMBER_ENV) {
            self.self_party.account_number = raw.trim().parse().map_err(|_| {
                EtlError::Config(format!("{SELF_NUMBER_ENV} must be numeric, got '{raw}'"))
            })?;
        }
        if let Some(name) = lookup(SELF_NAME_ENV).filter(|n| !n.trim().is_empty()) {
            self.self_party.display_name = name.trim().to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_placeholder_owner() {
        let config = Config::default();
        assert_eq!(config.self_party.account_number, 36521838);
        assert_eq!(config.self_party.display_name, "Self");
        assert!(config.output.pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [self_party]
            display_name = "Owner"
            "#,
        )
        .unwrap();
        assert_eq!(config.self_party.display_name, "Owner");
        assert_eq!(config.self_party.account_number, 36521838);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([(SELF_NUMBER_ENV, "250788000000"), (SELF_NAME_ENV, " Me ")]);
        let mut config = Config::default();
        config
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.self_party.account_number, 250788000000);
        assert_eq!(config.self_party.display_name, "Me");
    }

    #[test]
    fn test_non_numeric_env_number_is_config_error() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|k| {
            (k == SELF_NUMBER_ENV).then(|| "not-a-number".to_string())
        });
        assert!(matches!(result, Err(EtlError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here/momo.toml")));
        assert!(result.is_err());
    }
}
