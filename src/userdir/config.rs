use crate::error::{DirectoryError, Result};
use crate::persistence::DEFAULT_STORAGE_KEY;
use crate::remote::DEFAULT_API_BASE_URL;
use crate::store::validate_key;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

const CONFIG_FILENAME: &str = "config.json";
/// Blob key that would land on `config.json` in a file-backed store.
const CONFIG_STEM: &str = "config";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const CONFIG_KEYS: &[&str] = &["api-url", "timeout", "storage-key", "auto-refresh"];

/// Configuration for the directory, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Base URL of the remote user API; `/users` is appended.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout for remote fetches, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Key the user collection is persisted under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Refresh from the remote API before listing.
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_auto_refresh() -> bool {
    true
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_key: default_storage_key(),
            auto_refresh: true,
        }
    }
}

impl DirectoryConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DirectoryError::Io)?;
        let mut config: DirectoryConfig =
            serde_json::from_str(&content).map_err(DirectoryError::Serialization)?;
        if config.storage_key == CONFIG_STEM {
            warn!(
                key = %config.storage_key,
                "storage key collides with the config file, using the default"
            );
            config.storage_key = default_storage_key();
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DirectoryError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(DirectoryError::Serialization)?;
        fs::write(config_path, content).map_err(DirectoryError::Io)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api-url" => Some(self.api_base_url.clone()),
            "timeout" => Some(self.timeout_secs.to_string()),
            "storage-key" => Some(self.storage_key.clone()),
            "auto-refresh" => Some(self.auto_refresh.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "api-url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!("api-url must be an http(s) URL, got {}", value));
                }
                self.api_base_url = value.trim_end_matches('/').to_string();
            }
            "timeout" => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| format!("timeout must be a whole number of seconds, got {}", value))?;
                if secs == 0 {
                    return Err("timeout must be at least 1 second".to_string());
                }
                self.timeout_secs = secs;
            }
            "storage-key" => {
                validate_key(value).map_err(|e| e.to_string())?;
                if value == CONFIG_STEM {
                    return Err(format!("storage-key {} is reserved for the config file", value));
                }
                self.storage_key = value.to_string();
            }
            "auto-refresh" => {
                self.auto_refresh = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(format!("auto-refresh must be true or false, got {}", value)),
                };
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}
