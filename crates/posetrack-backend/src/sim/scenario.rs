//! 模拟场景配置（TOML）
//!
//! ```toml
//! radius_m = 0.25
//!
//! [[devices]]
//! id = 1
//! serial = "PT-0001"
//! boot_polls = 40
//!
//! [[devices]]
//! id = 2
//! serial = "PT-0002"
//! session_length = 12
//! ```

use std::collections::HashSet;
use std::path::Path;

use posetrack_protocol::DeviceStatus;
use serde::{Deserialize, Serialize};

use crate::BackendError;

/// 模拟设备默认 vendor id
pub const SIM_VENDOR_ID: u16 = 0x1209;
/// 模拟设备默认 product id
pub const SIM_PRODUCT_ID: u16 = 0x7470;

/// 一个模拟场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimScenario {
    /// 为 false 时模拟服务加载失败
    #[serde(default = "default_true")]
    pub available: bool,

    /// 模拟运动的圆周半径（米）
    #[serde(default = "default_radius")]
    pub radius_m: f64,

    /// 每个会话开头处于惯性数据初始化阶段的读数个数
    #[serde(default = "default_initialization_readings")]
    pub initialization_readings: u32,

    /// 设备列表（枚举顺序）
    #[serde(default)]
    pub devices: Vec<SimDevice>,
}

/// 一个模拟设备
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimDevice {
    /// 设备句柄值（不能为 0）
    pub id: u64,

    pub serial: String,

    #[serde(default = "default_product_name")]
    pub product_name: String,

    #[serde(default = "default_firmware")]
    pub firmware: String,

    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,

    #[serde(default = "default_product_id")]
    pub product_id: u16,

    /// 初始状态；`boot_polls > 0` 时被 `Booting` 覆盖
    #[serde(default = "default_status")]
    pub status: DeviceStatus,

    /// 启动完成前需要经过的修订号轮询次数
    #[serde(default)]
    pub boot_polls: u32,

    /// 每个会话产生的读数个数
    #[serde(default = "default_session_length")]
    pub session_length: u32,

    /// 追踪子系统是否支持该设备
    #[serde(default = "default_true")]
    pub tracking_capable: bool,
}

fn default_true() -> bool {
    true
}

fn default_radius() -> f64 {
    0.25
}

fn default_initialization_readings() -> u32 {
    2
}

fn default_product_name() -> String {
    "Simulated Tracker".to_string()
}

fn default_firmware() -> String {
    "1.0.0-sim".to_string()
}

fn default_vendor_id() -> u16 {
    SIM_VENDOR_ID
}

fn default_product_id() -> u16 {
    SIM_PRODUCT_ID
}

fn default_status() -> DeviceStatus {
    DeviceStatus::Idle
}

fn default_session_length() -> u32 {
    25
}

impl SimDevice {
    /// 默认参数的空闲设备
    pub fn idle(id: u64, serial: impl Into<String>) -> Self {
        Self {
            id,
            serial: serial.into(),
            product_name: default_product_name(),
            firmware: default_firmware(),
            vendor_id: SIM_VENDOR_ID,
            product_id: SIM_PRODUCT_ID,
            status: DeviceStatus::Idle,
            boot_polls: 0,
            session_length: default_session_length(),
            tracking_capable: true,
        }
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_boot_polls(mut self, polls: u32) -> Self {
        self.boot_polls = polls;
        self
    }

    pub fn with_session_length(mut self, readings: u32) -> Self {
        self.session_length = readings;
        self
    }
}

impl Default for SimScenario {
    /// 演示场景：一台设备正在启动，另一台已空闲
    fn default() -> Self {
        Self {
            available: true,
            radius_m: default_radius(),
            initialization_readings: default_initialization_readings(),
            devices: vec![
                SimDevice::idle(1, "PT-0001").with_boot_polls(400),
                SimDevice::idle(2, "PT-0002"),
            ],
        }
    }
}

impl SimScenario {
    pub fn from_toml_str(content: &str) -> Result<Self, BackendError> {
        toml::from_str(content).map_err(|e| BackendError::Scenario(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| BackendError::Scenario(format!("{}: {}", path.display(), e)))
    }

    /// 检查设备 id 合法且不重复
    pub fn validate(&self) -> Result<(), BackendError> {
        if !self.radius_m.is_finite() || self.radius_m < 0.0 {
            return Err(BackendError::Scenario(format!(
                "radius_m must be a non-negative number, got {}",
                self.radius_m
            )));
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.id == 0 {
                return Err(BackendError::Scenario(format!(
                    "device {:?} uses reserved id 0",
                    device.serial
                )));
            }
            if !seen.insert(device.id) {
                return Err(BackendError::Scenario(format!(
                    "duplicate device id {}",
                    device.id
                )));
            }
        }
        Ok(())
    }
}
