use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::{Path, PathBuf};

use crate::api::ApiClientConfig;
use crate::models::{DEATHS_SHOWN, HOUSES_SHOWN};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// When false the selected world is only kept for the lifetime of the process.
    pub enabled: bool,
    pub database_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub houses_shown: usize,
    pub deaths_shown: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Party Finder".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
            },
            api: ApiSettings {
                base_url: "https://api.tibiadata.com/v4".to_string(),
                timeout_seconds: 30,
                user_agent: format!("party-finder/{}", env!("CARGO_PKG_VERSION")),
            },
            storage: StorageSettings {
                enabled: true,
                database_url: default_database_url(),
            },
            display: DisplaySettings {
                houses_shown: HOUSES_SHOWN,
                deaths_shown: DEATHS_SHOWN,
            },
        }
    }
}

/// `sqlite://<config dir>/party-finder/selection.db`, or the working directory
/// when the platform has no config dir.
fn default_database_url() -> String {
    let dir = dirs::config_dir()
        .map(|p| p.join("party-finder"))
        .unwrap_or_else(|| PathBuf::from("."));
    format!("sqlite://{}", dir.join("selection.db").display())
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PARTY_FINDER").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("PARTY_FINDER").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api.base_url.clone(),
            timeout_seconds: self.api.timeout_seconds,
            user_agent: self.api.user_agent.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if reqwest::Url::parse(&self.api.base_url).is_err() {
            return Err(format!("API base URL is not a valid URL: {}", self.api.base_url));
        }

        if self.api.timeout_seconds == 0 {
            return Err("API timeout must be greater than zero".to_string());
        }

        if self.display.houses_shown == 0 || self.display.deaths_shown == 0 {
            return Err("Display caps for houses and deaths must be at least 1".to_string());
        }

        if self.storage.enabled && !self.storage.database_url.starts_with("sqlite:") {
            return Err(format!(
                "Only sqlite storage is supported, got {}",
                self.storage.database_url
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.display.houses_shown, 3);
        assert!(settings.storage.database_url.starts_with("sqlite://"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.api.timeout_seconds = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.api.base_url = "::nope::".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.storage.database_url = "postgres://localhost/db".to_string();
        assert!(settings.validate().is_err());

        settings.storage.enabled = false;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("party-finder-settings-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[api]\ntimeout_seconds = 7\n\n[storage]\nenabled = false").unwrap();
        drop(file);

        let settings = Settings::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.api.timeout_seconds, 7);
        assert!(!settings.storage.enabled);
        assert_eq!(settings.api.base_url, "https://api.tibiadata.com/v4");
    }
}
