use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::storage::FileStore;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_GEO_URL: &str = "http://ip-api.com/json";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// openweather_api_key = "..."
/// cities_url = "https://cities.example.com/api/cities"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub openweather_api_key: Option<String>,

    /// Base URL of the OpenWeather API; defaults to the public endpoint.
    pub weather_url: Option<String>,

    /// Full URL of the city search endpoint. Has no default.
    pub cities_url: Option<String>,

    /// IP geolocation endpoint; defaults to ip-api.com.
    pub geo_url: Option<String>,

    /// Where favorites are kept; defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn api_key(&self) -> Result<&str> {
        self.openweather_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather configure` and enter your API key."
                )
            })
    }

    pub fn weather_url(&self) -> &str {
        self.weather_url.as_deref().unwrap_or(DEFAULT_WEATHER_URL)
    }

    pub fn geo_url(&self) -> &str {
        self.geo_url.as_deref().unwrap_or(DEFAULT_GEO_URL)
    }

    pub fn cities_url(&self) -> Result<&str> {
        self.cities_url.as_deref().ok_or_else(|| {
            anyhow!(
                "No city search endpoint configured.\n\
                 Hint: run `weather configure` and enter the city API URL."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather_api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    /// Favorites storage per `data_dir`, or the platform default.
    pub fn favorites_storage(&self) -> Result<FileStore> {
        match &self.data_dir {
            Some(dir) => Ok(FileStore::new(dir)),
            None => FileStore::in_data_dir().context("Failed to locate favorites storage"),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-favorites", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(!cfg.is_configured());
    }

    #[test]
    fn blank_api_key_is_not_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert!(!cfg.is_configured());
    }

    #[test]
    fn urls_fall_back_to_defaults() {
        let cfg = Config::default();

        assert_eq!(cfg.weather_url(), DEFAULT_WEATHER_URL);
        assert_eq!(cfg.geo_url(), DEFAULT_GEO_URL);
        assert!(cfg.cities_url().is_err());
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.cities_url = Some("http://localhost/cities".into());
        cfg.data_dir = Some(dir.path().join("data"));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.api_key().unwrap(), "OPEN_KEY");
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "openweather_api_key = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn favorites_storage_uses_data_dir_override() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/tmp/weather-data")),
            ..Config::default()
        };

        let storage = cfg.favorites_storage().unwrap();
        assert_eq!(storage.dir(), Path::new("/tmp/weather-data"));
    }
}
