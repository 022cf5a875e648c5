//! # Posetrack Protocol
//!
//! 追踪 SDK 的数据类型定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `device`: 设备句柄、网络修订号、设备状态与网络过滤器
//! - `spatial`: 位置、四元数、Placement 与 Environment
//! - `pose`: 稳定阶段与位姿读数
//!
//! 本 crate 只描述数据，不包含任何 IO。服务接口见 `posetrack-backend`。

pub mod device;
pub mod pose;
pub mod spatial;

// 重新导出常用类型
pub use device::*;
pub use pose::*;
pub use spatial::*;

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// 未知的设备状态码
    #[error("Unknown device status code: {0}")]
    UnknownStatus(u8),

    /// 未知的稳定阶段码
    #[error("Unknown stability stage code: {0}")]
    UnknownStage(u8),

    /// 无法解析的网络过滤器
    #[error("Invalid device filter: {0:?} (expected \"all-usb\" or \"vid:pid\" in hex)")]
    InvalidFilter(String),

    /// 无法解析的日志级别
    #[error("Invalid SDK verbosity: {0:?}")]
    InvalidVerbosity(String),
}
