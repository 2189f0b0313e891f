use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Everything the weather client needs, resolved once at construction.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub api_key: String,
    pub base_url: String,
    pub geo_base_url: String,
}

impl ApiSettings {
    /// Settings against the public OpenWeather endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// data_dir = "/home/me/.weather"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,

    /// Overrides the platform data directory used for favorites.
    pub data_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_geo_base_url() -> String {
    DEFAULT_GEO_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            geo_base_url: default_geo_base_url(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Resolve client settings, failing with a hint when no key is configured.
    pub fn api_settings(&self) -> Result<ApiSettings> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather-tracker configure` and enter your API key."
                )
            })?;

        Ok(ApiSettings {
            api_key: api_key.to_string(),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            geo_base_url: self.geo_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding local state such as favorites.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-tracker", "weather-tracker")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_settings_errors_when_key_missing() {
        let cfg = Config::default();
        let err = cfg.api_settings().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `weather-tracker configure`"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.api_settings().is_err());
    }

    #[test]
    fn set_api_key_produces_settings_with_default_endpoints() {
        let mut cfg = Config::default();
        cfg.set_api_key(" KEY ".into());

        let settings = cfg.api_settings().expect("key is set");
        assert_eq!(settings.api_key, "KEY");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.geo_base_url, DEFAULT_GEO_BASE_URL);
    }

    #[test]
    fn toml_fills_missing_endpoints_with_defaults() {
        let cfg = Config::from_toml(r#"api_key = "abc""#).expect("valid toml");
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let cfg = Config::from_toml(
            r#"
            api_key = "abc"
            base_url = "http://localhost:8080/data/"
            geo_base_url = "http://localhost:8080/geo/"
            "#,
        )
        .expect("valid toml");

        let settings = cfg.api_settings().expect("key is set");
        assert_eq!(settings.base_url, "http://localhost:8080/data");
        assert_eq!(settings.geo_base_url, "http://localhost:8080/geo");
    }

    #[test]
    fn data_dir_override_wins() {
        let cfg = Config { data_dir: Some(PathBuf::from("/tmp/wt")), ..Config::default() };
        assert_eq!(cfg.data_dir().expect("override"), PathBuf::from("/tmp/wt"));
    }
}
