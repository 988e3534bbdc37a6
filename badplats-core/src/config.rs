use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.pirateweather.net";
pub const DEFAULT_UNITS: &str = "si";
pub const DEFAULT_LANG: &str = "sv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the Dark Sky compatible weather provider.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unit system passed to the provider, "si" gives °C.
    #[serde(default = "default_units")]
    pub units: String,

    /// Language of the summary text.
    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .field("lang", &self.lang)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_units() -> String {
    DEFAULT_UNITS.to_string()
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ProviderConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: default_base_url(),
            units: default_units(),
            lang: default_lang(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Overrides the location of the favorites file.
    pub favorites_path: Option<PathBuf>,

    /// Example TOML:
    /// [provider]
    /// api_key = "..."
    pub provider: Option<ProviderConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
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

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("se", "badplatser", "badplats")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Set or replace the API key, keeping any other provider settings.
    pub fn set_api_key(&mut self, api_key: String) {
        match self.provider.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => self.provider = Some(ProviderConfig::new(api_key)),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.provider
            .as_ref()
            .map(|p| p.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn is_provider_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_api_key() {
        let cfg = Config::default();
        assert_eq!(cfg.api_key(), None);
        assert!(!cfg.is_provider_configured());
    }

    #[test]
    fn set_api_key_creates_provider_with_defaults() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        let provider = cfg.provider.as_ref().expect("provider must exist");
        assert_eq!(provider.api_key, "KEY");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.units, "si");
        assert_eq!(provider.lang, "sv");
        assert!(cfg.is_provider_configured());
    }

    #[test]
    fn set_api_key_keeps_other_provider_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key("OLD".into());
        if let Some(p) = cfg.provider.as_mut() {
            p.base_url = "http://localhost:9999".into();
        }

        cfg.set_api_key("NEW".into());

        let provider = cfg.provider.as_ref().expect("provider must exist");
        assert_eq!(provider.api_key, "NEW");
        assert_eq!(provider.base_url, "http://localhost:9999");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("SUPERSECRETKEY".into());

        let debug = format!("{cfg:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("SUPERSECRETKEY"));
    }

    #[test]
    fn empty_api_key_counts_as_unconfigured() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());
        assert!(!cfg.is_provider_configured());
    }

    #[test]
    fn optional_provider_fields_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("[provider]\napi_key = \"abc\"\n").expect("valid toml");
        let provider = cfg.provider.expect("provider section");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_keeps_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.favorites_path = Some(dir.path().join("fav.json"));
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "provider = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
