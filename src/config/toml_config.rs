use crate::utils::error::{HubError, Result};
use crate::utils::validation::{
    validate_device_path, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";
pub const MAX_LIST_DEPTH: u32 = 16;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub device: DeviceSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSection {
    #[serde(default = "default_url")]
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_upload_destination")]
    pub upload_destination: String,
    #[serde(default = "default_list_root")]
    pub list_root: String,
    #[serde(default = "default_list_depth")]
    pub list_depth: u32,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            upload_destination: default_upload_destination(),
            list_root: default_list_root(),
            list_depth: default_list_depth(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_DEVICE_URL.to_string()
}

fn default_upload_destination() -> String {
    crate::app::pages::storage::DEFAULT_UPLOAD_DESTINATION.to_string()
}

fn default_list_root() -> String {
    crate::app::pages::storage::DEFAULT_LIST_ROOT.to_string()
}

fn default_list_depth() -> u32 {
    crate::app::pages::storage::DEFAULT_LIST_DEPTH
}

impl ConsoleConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HubError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HubError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HUB_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HubError::ConfigError {
            message: format!("bad substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.device.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for ConsoleConfig {
    fn validate(&self) -> Result<()> {
        validate_url("device.url", &self.device.url)?;
        if let Some(timeout) = self.device.timeout_seconds {
            validate_range("device.timeout_seconds", timeout, 1, 600)?;
        }
        validate_non_empty_string("storage.upload_destination", &self.storage.upload_destination)?;
        validate_device_path("storage.upload_destination", &self.storage.upload_destination)?;
        validate_device_path("storage.list_root", &self.storage.list_root)?;
        validate_range("storage.list_depth", self.storage.list_depth, 0, MAX_LIST_DEPTH)?;
        Ok(())
    }
}
