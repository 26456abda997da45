use std::path::{Path, PathBuf};

use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "fyyur";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the SQLite database file. `~/` is expanded.
    database: String,
    pub port: u16,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: format!("~/.local/share/{}/fyyur.db", APP_DIR),
            port: 3000,
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join(APP_DIR).join("config.toml"))
    }

    /// Load the config file at its default location, falling back to defaults when it is absent.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config to its default location unless a file is already there.
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| eyre!("No config directory available"))?;
        if path.exists() {
            tracing::info!("Config already exists at: {}", path.display());
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    pub fn set_database(&mut self, path: &Path) {
        self.database = path.to_string_lossy().to_string();
    }

    /// Expand ~ to home directory
    fn expand_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    pub fn database_path(&self) -> PathBuf {
        self.expand_path(&self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("port = 5000\n").unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn test_full_file() {
        let config = Config::parse(
            r#"
            database = "/var/lib/fyyur/fyyur.db"
            port = 8080
            log_level = "debug"
            otlp_endpoint = "http://localhost:4317"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/fyyur/fyyur.db")
        );
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        assert!(Config::parse("port = \"not a number\"").is_err());
    }

    #[test]
    fn test_database_override() {
        let mut config = Config::default();
        config.set_database(Path::new("fyyur-test.db"));
        assert_eq!(config.database_path(), PathBuf::from("fyyur-test.db"));
    }

    #[test]
    fn test_home_is_expanded() {
        let config = Config::default();
        if let Some(home) = dirs::home_dir() {
            assert!(config.database_path().starts_with(home));
        }
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let contents = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(Config::parse(&contents).unwrap(), Config::default());
    }
}
