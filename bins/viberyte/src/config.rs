//! Configuration file loading

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use viberyte_search::{KeywordDictionary, KeywordEntry, DEFAULT_CITY, SUGGESTION_LIMIT};
use viberyte_telemetry::LoggingConfig;

/// Locations searched when no `--config` is given, in order
const CANDIDATES: [&str; 3] = [".viberyte.toml", "viberyte.toml", ".config/viberyte.toml"];

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// City used when `--city` is not given
    pub default_city: String,
    /// Maximum autocomplete suggestions
    pub suggestion_limit: usize,
    /// Logging setup
    pub logging: LoggingConfig,
    /// Extra or overriding keywords, applied on top of the built-in dictionary
    pub keywords: Vec<KeywordEntry>,
    /// File this configuration was read from
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            suggestion_limit: SUGGESTION_LIMIT,
            logging: LoggingConfig::default(),
            keywords: Vec::new(),
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, a standard location, or defaults.
    ///
    /// An explicit path must exist; standard locations are optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let mut config = match &config_path {
            Some(p) => load_config_file(p)?,
            None => Config::default(),
        };
        config.path = config_path;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.suggestion_limit == 0 {
            bail!("suggestion_limit must be at least 1");
        }
        Ok(())
    }

    /// The built-in dictionary with this configuration's keywords applied.
    pub fn dictionary(&self) -> Result<Cow<'static, KeywordDictionary>> {
        let builtin = KeywordDictionary::builtin();
        if self.keywords.is_empty() {
            return Ok(Cow::Borrowed(builtin));
        }
        let dictionary = builtin
            .extended(self.keywords.iter().cloned())
            .context("Invalid [[keywords]] entry in configuration")?;
        Ok(Cow::Owned(dictionary))
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    CANDIDATES
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.default_city, "Manhattan");
        assert_eq!(config.suggestion_limit, 5);
        assert!(matches!(config.dictionary().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_config_parse_full() {
        let config: Config = toml::from_str(
            r#"
            default_city = "Brooklyn"
            suggestion_limit = 3

            [logging]
            level = "debug"
            json = true

            [[keywords]]
            keyword = "tiki"
            field = "vibe_tags"
            value = "tiki"
            category = "vibe"
            weight = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.default_city, "Brooklyn");
        assert_eq!(config.suggestion_limit, 3);
        assert!(config.logging.json);

        let dictionary = config.dictionary().unwrap();
        assert_eq!(dictionary.get("tiki").unwrap().weight, 8);
        assert!(dictionary.get("rooftop").is_some());
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        assert!(toml::from_str::<Config>("default_town = \"x\"").is_err());
    }

    #[test]
    fn test_config_rejects_zero_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viberyte.toml");
        std::fs::write(&path, "suggestion_limit = 0").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_config_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viberyte.toml");
        std::fs::write(&path, "default_city = \"Queens\"").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.default_city, "Queens");
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_config_load_missing_explicit_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/viberyte.toml"))).is_err());
    }

    #[test]
    fn test_invalid_keyword_entry() {
        let config: Config = toml::from_str(
            r#"
            [[keywords]]
            keyword = "tiki"
            field = "vibe_tags"
            value = "tiki"
            category = "vibe"
            weight = 0
            "#,
        )
        .unwrap();
        assert!(config.dictionary().is_err());
    }
}
