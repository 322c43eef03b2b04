//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for hashmaster
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub hashtopolis: HashtopolisConfig,
    pub hashes_com: ServiceConfig,
    pub hashmob: ServiceConfig,
    pub kraken: KrakenConfig,
    pub http: HttpSettings,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HashtopolisConfig {
    pub url: Option<String>,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
    /// Directory for per-request error logs (disabled when unset)
    pub error_log_dir: Option<PathBuf>,
}

/// URL and key of a hosted service; the URL falls back to the public site
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub url: Option<String>,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KrakenConfig {
    pub url: String,
}

impl Default for KrakenConfig {
    fn default() -> Self {
        Self {
            url: hashmaster_hashes_com::kraken::DEFAULT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Whole-request timeout in seconds
    pub timeout: u64,
    pub connect_timeout: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let defaults = hashmaster_core::HttpConfig::default();
        Self {
            timeout: defaults.timeout.as_secs(),
            connect_timeout: defaults.connect_timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub chunk_size_mb: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size_mb: hashmaster_hashtopolis::DEFAULT_CHUNK_SIZE_MB,
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

/// `config.json` layout of the earlier script:
/// `{"settings": {"hashtopolis": {"url": .., "api_key": ..}, "hashes_com": .., "hashmob_net": ..}}`
#[derive(Debug, Deserialize)]
struct LegacyConfig {
    settings: LegacySettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacySettings {
    hashtopolis: ServiceConfig,
    hashes_com: ServiceConfig,
    hashmob_net: ServiceConfig,
}

impl From<LegacyConfig> for Config {
    fn from(legacy: LegacyConfig) -> Self {
        let settings = legacy.settings;
        Self {
            hashtopolis: HashtopolisConfig {
                url: settings.hashtopolis.url,
                api_key: settings.hashtopolis.api_key,
                error_log_dir: None,
            },
            hashes_com: settings.hashes_com,
            hashmob: settings.hashmob_net,
            ..Default::default()
        }
    }
}

/// Value of a required setting, or an error naming its TOML key
fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .with_context(|| format!("`{key}` is not set in the configuration"))
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./hashmaster.toml (current directory)
    /// 2. ~/.config/hashmaster/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("hashmaster.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "hashmaster") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file (`.json` is read as the legacy layout)
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            let legacy: LegacyConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Config::from(legacy)
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        };

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn hashtopolis_client(&self) -> Result<hashmaster_hashtopolis::Client> {
        let url = required(&self.hashtopolis.url, "hashtopolis.url")?;
        let key = required(&self.hashtopolis.api_key, "hashtopolis.api_key")?;
        let client = hashmaster_hashtopolis::Client::new(url, key);
        Ok(match &self.hashtopolis.error_log_dir {
            Some(dir) => client.with_error_log_dir(dir),
            None => client,
        })
    }

    pub fn hashes_com_client(&self) -> Result<hashmaster_hashes_com::Client> {
        let url = self
            .hashes_com
            .url
            .as_deref()
            .unwrap_or(hashmaster_hashes_com::DEFAULT_URL);
        let key = required(&self.hashes_com.api_key, "hashes_com.api_key")?;
        Ok(hashmaster_hashes_com::Client::new(url, key))
    }

    /// HashMob works without a key for public listings
    pub fn hashmob_client(&self) -> hashmaster_hashmob::Client {
        let url = self
            .hashmob
            .url
            .as_deref()
            .unwrap_or(hashmaster_hashmob::DEFAULT_URL);
        hashmaster_hashmob::Client::new(url, self.hashmob.api_key.clone().unwrap_or_default())
    }

    pub fn kraken(&self) -> hashmaster_hashes_com::Kraken {
        hashmaster_hashes_com::Kraken::new(self.kraken.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.http.timeout, 300);
        assert_eq!(config.http.connect_timeout, 30);
        assert_eq!(config.import.chunk_size_mb, 10);
        assert_eq!(config.kraken.url, "https://api.kraken.com");
        assert!(config.hashtopolis.url.is_none());
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("HASHMASTER_TEST_VAR", "test_value");
        assert_eq!(
            expand_env_var("${HASHMASTER_TEST_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("HASHMASTER_TEST_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[hashtopolis]
url = "http://10.100.100.200:80"
api_key = "abc"
error_log_dir = "/tmp/htp-errors"

[hashmob]
api_key = "mob"

[http]
timeout = 600

[import]
chunk_size_mb = 25
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.hashtopolis.url.as_deref(), Some("http://10.100.100.200:80"));
        assert_eq!(config.hashtopolis.error_log_dir, Some(PathBuf::from("/tmp/htp-errors")));
        assert_eq!(config.hashmob.api_key.as_deref(), Some("mob"));
        assert_eq!(config.http.timeout, 600);
        assert_eq!(config.http.connect_timeout, 30);
        assert_eq!(config.import.chunk_size_mb, 25);
        assert!(config.hashtopolis_client().is_ok());
    }

    #[test]
    fn missing_key_names_setting() {
        let config: Config = toml::from_str("[hashtopolis]\nurl = \"http://x\"\n").unwrap();
        let err = config.hashtopolis_client().unwrap_err();
        assert!(err.to_string().contains("hashtopolis.api_key"));
        let err = config.hashes_com_client().unwrap_err();
        assert!(err.to_string().contains("hashes_com.api_key"));
    }

    #[test]
    fn legacy_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"settings": {
                "hashtopolis": {"url": "http://10.0.0.1", "api_key": "h"},
                "hashes_com": {"url": "https://hashes.com", "api_key": "c"},
                "hashmob_net": {"url": "https://hashmob.net", "api_key": "m"}
            }}"#,
        )
        .unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.hashtopolis.api_key.as_deref(), Some("h"));
        assert_eq!(config.hashes_com.api_key.as_deref(), Some("c"));
        assert_eq!(config.hashmob.url.as_deref(), Some("https://hashmob.net"));
        assert_eq!(config.import.chunk_size_mb, 10);
    }
}
