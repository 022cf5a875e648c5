//! 设备与网络相关类型

use std::fmt;
use std::str::FromStr;

use num_enum::TryFromPrimitive;

use crate::ProtocolError;

/// 网络上追踪设备的不透明标识
///
/// 句柄的生命周期由网络服务管理，客户端只做比较与传递。
/// `DeviceHandle::NONE` 表示"没有设备"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceHandle(pub u64);

impl DeviceHandle {
    /// 哨兵值：没有设备
    pub const NONE: DeviceHandle = DeviceHandle(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:04x}", self.0)
    }
}

/// 网络修订号
///
/// 设备拓扑或状态变化时由传输层递增。客户端只关心它是否与上次观察到的值不同。
pub type Revision = u64;

/// 设备状态
///
/// 只有 `Idle` 的设备可以启动追踪任务。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum DeviceStatus {
    Idle = 0,
    Booting = 1,
    Tracking = 2,
    Updating = 3,
    Error = 4,
    Unknown = 0xFF,
}

impl DeviceStatus {
    /// 从原始状态码转换（未知码返回错误）
    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        Self::try_from(code).map_err(|_| ProtocolError::UnknownStatus(code))
    }

    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Booting => "booting",
            Self::Tracking => "tracking",
            Self::Updating => "updating",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 设备上可读取的字符串属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceProperty {
    SerialNumber,
    ProductName,
    FirmwareVersion,
}

/// 网络作用域（创建网络时使用的设备过滤器）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceFilter {
    /// 所有 USB 设备
    #[default]
    AllUsb,
    /// 指定 vendor/product id
    UsbId { vendor_id: u16, product_id: u16 },
}

impl DeviceFilter {
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        match *self {
            DeviceFilter::AllUsb => true,
            DeviceFilter::UsbId {
                vendor_id: v,
                product_id: p,
            } => v == vendor_id && p == product_id,
        }
    }
}

impl FromStr for DeviceFilter {
    type Err = ProtocolError;

    /// 解析 `"all-usb"` 或 `"vid:pid"`（十六进制，可带 `0x` 前缀）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all-usb") {
            return Ok(DeviceFilter::AllUsb);
        }

        let invalid = || ProtocolError::InvalidFilter(s.to_string());
        let (vid, pid) = s.split_once(':').ok_or_else(invalid)?;
        let parse_hex = |v: &str| {
            let v = v.trim();
            let v = v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")).unwrap_or(v);
            u16::from_str_radix(v, 16).map_err(|_| invalid())
        };

        Ok(DeviceFilter::UsbId {
            vendor_id: parse_hex(vid)?,
            product_id: parse_hex(pid)?,
        })
    }
}

impl fmt::Display for DeviceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceFilter::AllUsb => f.write_str("all-usb"),
            DeviceFilter::UsbId {
                vendor_id,
                product_id,
            } => write!(f, "{:04x}:{:04x}", vendor_id, product_id),
        }
    }
}

/// SDK 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SdkVerbosity {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for SdkVerbosity {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ProtocolError::InvalidVerbosity(s.to_string())),
        }
    }
}
