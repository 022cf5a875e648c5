//! 配置文件
//!
//! 默认路径为 `<config_dir>/posetrack/config.toml`：
//!
//! ```toml
//! [store]
//! environment = "1@0,0,2.5|2@1.5,0,2.5"
//! placement = "0,0,0.1;0,0,0,1"
//!
//! [network]
//! filter = "all-usb"        # 或 "1209:7470"
//!
//! [session]
//! horizon_ms = 60
//! interval_ms = 200
//! skip_initialization = true
//! raw = false
//!
//! [sdk]
//! verbosity = "warn"
//! ```
//!
//! 所有段落都可省略，缺省值如上。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use posetrack_protocol::{DeviceFilter, ProtocolError, SdkVerbosity};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// 配置文件错误
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid setting: {0}")]
    Invalid(#[from] ProtocolError),

    #[error("Cannot determine the user configuration directory")]
    NoConfigDir,
}

/// 默认配置文件路径
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    let mut path = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    path.push("posetrack");
    path.push("config.toml");
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// `"all-usb"` 或 `"vid:pid"`
    pub filter: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            filter: DeviceFilter::AllUsb.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// 外推时长（毫秒）
    pub horizon_ms: u64,
    /// 输出间隔（毫秒）
    pub interval_ms: u64,
    pub skip_initialization: bool,
    /// 输出原始位姿而不是外推位姿
    pub raw: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            horizon_ms: 60,
            interval_ms: 200,
            skip_initialization: true,
            raw: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSettings {
    pub verbosity: String,
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            verbosity: "warn".to_string(),
        }
    }
}

/// 完整配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 命名字符串值（environment / placement 编码）
    pub store: BTreeMap<String, String>,
    pub network: NetworkSettings,
    pub session: SessionSettings,
    pub sdk: SdkSettings,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 加载配置；文件不存在时返回默认配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 保存配置（自动创建父目录）
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        debug!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn filter(&self) -> Result<DeviceFilter, SettingsError> {
        Ok(self.network.filter.parse()?)
    }

    pub fn verbosity(&self) -> Result<SdkVerbosity, SettingsError> {
        Ok(self.sdk.verbosity.parse()?)
    }
}
