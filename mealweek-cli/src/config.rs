//! Settings layered from defaults, a YAML file and the environment, with the
//! winning layer recorded for `config show`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "MEALWEEK_DATA_DIR";

const APP_DIR: &str = "mealweek";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
        };
        f.write_str(name)
    }
}

/// A setting and the layer it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the stored recipes and plans
    pub data_dir: ConfigValue<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
}

impl Config {
    /// Env vars override the config file, which overrides defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or_else(Self::default_config_path);
        let mut config = Self::defaults();
        if path.exists() {
            config.apply_file(&path)?;
        }
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn defaults() -> Self {
        Self {
            data_dir: ConfigValue::new(Self::default_data_dir(), ConfigSource::Default),
            config_file: None,
        }
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        let parse_err = |e| ConfigError::ParseError(path.to_path_buf(), e);

        // A file with only comments parses as null
        let value: serde_yaml::Value = serde_yaml::from_str(&contents).map_err(parse_err)?;
        let file: ConfigFile = if value.is_null() {
            ConfigFile::default()
        } else {
            serde_yaml::from_value(value).map_err(parse_err)?
        };

        if let Some(dir) = file.data_dir {
            let dir = match path.parent() {
                Some(base) if dir.is_relative() => base.join(dir),
                _ => dir,
            };
            self.data_dir = ConfigValue::new(dir, ConfigSource::File);
        }
        self.config_file = Some(path.to_path_buf());
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            self.data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
    }

    /// `~/.config/mealweek` on Linux, the platform equivalent elsewhere.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// `~/.local/share/mealweek` on Linux, the platform equivalent elsewhere.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, contents).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let mut config = Config::defaults();
        config.apply_env(|_| None);
        assert!(config.data_dir.value.ends_with(APP_DIR));
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_file_data_dir_absolute_and_relative() {
        let (_temp, path) = write_config("data_dir: /srv/meals\n");
        let mut config = Config::defaults();
        config.apply_file(&path).unwrap();
        assert_eq!(config.data_dir.value, PathBuf::from("/srv/meals"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert_eq!(config.config_file.as_deref(), Some(path.as_path()));

        let (temp, path) = write_config("data_dir: plans\n");
        let mut config = Config::defaults();
        config.apply_file(&path).unwrap();
        assert_eq!(config.data_dir.value, temp.path().join("plans"));
    }

    #[test]
    fn test_comment_only_file_is_accepted() {
        let (_temp, path) = write_config("# nothing set yet\n");
        let mut config = Config::defaults();
        config.apply_file(&path).unwrap();
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_env_overrides_file() {
        let (_temp, path) = write_config("data_dir: /from/file\n");
        let mut config = Config::defaults();
        config.apply_file(&path).unwrap();

        config.apply_env(|name| (name == DATA_DIR_ENV).then(|| "/from/env".to_string()));
        assert_eq!(config.data_dir.value, PathBuf::from("/from/env"));
        assert_eq!(config.data_dir.source, ConfigSource::Environment);

        // An empty variable is treated as unset
        let mut config = Config::defaults();
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.data_dir.source, ConfigSource::Default);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let (_temp, path) = write_config("data_dir: [unclosed\n");
        let err = Config::load(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_, _)));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
